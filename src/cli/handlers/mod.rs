mod init;
mod plan;
mod send;
mod split;
mod users;
mod utils;

pub use init::handle_init;
pub use plan::{PlanParams, handle_plan};
pub use send::{SendParams, handle_send};
pub use split::handle_split;
pub use users::handle_users;

use crate::backend::HttpBackend;
use crate::config::ApportionConfig;
use anyhow::{Context, Result};

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: ApportionConfig,
    pub token: Option<String>,
}

impl CommandContext {
    /// `api_url` overrides the backend URL from the config file.
    pub fn new(mut config: ApportionConfig, api_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = api_url {
            config.backend.url = url;
        }
        Self { config, token }
    }

    pub fn http_backend(&self) -> Result<HttpBackend> {
        let settings = &self.config.backend;
        HttpBackend::new(&settings.url, self.token.clone(), settings.timeout())
            .with_context(|| format!("Failed to set up backend client for {}", settings.url))
    }
}
