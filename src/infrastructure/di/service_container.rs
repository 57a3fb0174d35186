//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::QueryService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, StdinPrompt, TitlePrompt};

/// Container holding application settings, I/O boundaries and services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive title input
    pub prompt: Arc<dyn TitlePrompt>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(StdinPrompt))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompt: Arc<dyn TitlePrompt>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            prompt,
        }
    }

    /// Query service bound to this container's filesystem and settings.
    pub fn query_service(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.fs), Arc::clone(&self.settings))
    }
}
