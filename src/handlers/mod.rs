//! HTTP handlers for the car-advisor endpoints
pub mod chat;
pub mod page;
pub mod recommend;

#[cfg(test)]
mod test_handlers;

use crate::relay::ChatRelay;
use crate::service::RecommendationService;
use crate::validation::InputValidator;
use std::sync::Arc;

/// State shared by all handlers. Everything in it is immutable.
#[derive(Clone)]
pub struct AppState {
    pub(crate) recommender: Arc<RecommendationService>,
    pub(crate) relay: Arc<ChatRelay>,
    pub(crate) validator: Arc<InputValidator>,
}

impl AppState {
    pub fn new(recommender: RecommendationService, relay: ChatRelay) -> Self {
        Self {
            recommender: Arc::new(recommender),
            relay: Arc::new(relay),
            validator: Arc::new(InputValidator::new()),
        }
    }
}
