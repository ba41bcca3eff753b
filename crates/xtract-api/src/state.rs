//! Application state shared by all handlers.

use std::sync::Arc;
use xtract_core::Config;
use xtract_services::ConversionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub conversion: Arc<ConversionService>,
}

impl AppState {
    pub fn new(config: Config, conversion: ConversionService) -> Self {
        Self {
            config,
            conversion: Arc::new(conversion),
        }
    }
}
