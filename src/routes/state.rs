use std::sync::Arc;

use crate::{
    db::MovieStore,
    services::{ai::AiClient, tmdb::MetadataGateway},
};

/// Collaborators shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub gateway: Arc<dyn MetadataGateway>,
    pub ai: Arc<dyn AiClient>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MovieStore>,
        gateway: Arc<dyn MetadataGateway>,
        ai: Arc<dyn AiClient>,
    ) -> Self {
        Self { store, gateway, ai }
    }
}
