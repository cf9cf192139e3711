pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod keepalive;
pub mod models;
pub mod relay;
pub mod scorer;
pub mod server;
pub mod service;
pub mod transport;
pub mod validation;
pub mod view;

pub use crate::config::Config;
pub use crate::error::{AdvisorError, Result};
pub use crate::extract::{LineSelection, extract_recommendations, normalize_record_literal};
pub use crate::server::{build_router, build_state};
