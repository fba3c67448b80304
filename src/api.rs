//! HTTP API
//!
//! Two audiences: the browser (page, start/end fragments) and the voice
//! provider, which calls the tool endpoints while a call is running.

mod handlers;
mod pages;
mod types;


pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::bootstrap::CallBootstrap;
use crate::scheduling::SchedulingSink;
use crate::stages::StageRegistry;
use std::sync::Arc;

/// Application state shared across handlers. Everything in it is read-only.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StageRegistry>,
    pub bootstrap: Arc<CallBootstrap>,
    pub scheduler: Arc<dyn SchedulingSink>,
}

impl AppState {
    pub fn new(
        registry: Arc<StageRegistry>,
        bootstrap: CallBootstrap,
        scheduler: Arc<dyn SchedulingSink>,
    ) -> Self {
        Self {
            registry,
            bootstrap: Arc::new(bootstrap),
            scheduler,
        }
    }
}
