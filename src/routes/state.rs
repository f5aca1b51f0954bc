use std::sync::Arc;

use crate::{
    db::Catalog,
    services::{PosterService, Recommender},
};

/// Shared application state
///
/// Everything here is read-only after startup, so handlers share it without locks.
pub struct AppState {
    pub recommender: Recommender,
    pub posters: PosterService,
}

impl AppState {
    pub fn new(recommender: Recommender, posters: PosterService) -> Self {
        Self {
            recommender,
            posters,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.recommender.catalog()
    }
}

pub type SharedState = Arc<AppState>;
