use crate::client::ApiClient;
use crate::config::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config: Arc::new(config),
            api,
        }
    }
}
