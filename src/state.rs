//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::forward::{ForwardError, ForwardingClient};
use crate::hook::UploadHook;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    client: ForwardingClient,
    hook: UploadHook,
}

impl AppState {
    /// Create a new application state
    ///
    /// Builds one HTTP client shared by the routes and the upload hook.
    pub fn new(config: Config) -> Result<Self, ForwardError> {
        let client = ForwardingClient::new(config.lightrag.timeout())?;
        let hook = UploadHook::new(client.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                hook,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the LightRAG client
    pub fn client(&self) -> &ForwardingClient {
        &self.inner.client
    }

    /// Get the upload hook
    pub fn hook(&self) -> &UploadHook {
        &self.inner.hook
    }
}
