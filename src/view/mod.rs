//! Client-side state of the web page, modelled as plain state machines.
//!
//! None of these talk to the network; the page shell drives them and
//! performs the requests.

pub mod form;
pub mod results;
pub mod transcript;

use thiserror::Error;

pub use form::PreferenceForm;
pub use results::RecommendationView;
pub use transcript::ChatTranscript;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("a request is already in flight")]
    Busy,
    #[error("nothing is in flight")]
    Idle,
    #[error("message is empty")]
    BlankMessage,
    #[error("no recommendation at position {0}")]
    NoSuchEntry(usize),
    #[error("at most {0} cars can be compared")]
    SelectionFull(usize),
    #[error("select at least two cars to compare")]
    NotEnoughSelected,
}
