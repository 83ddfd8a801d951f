pub mod app_config;
pub mod credentials;
pub mod rpc_config;

use thiserror::Error;

/// Fatal-to-the-run configuration failures. Application and network config
/// degrade to defaults elsewhere; only a broken credential setup surfaces
/// through here.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("credential file not found or unreadable: {0}")]
    MissingCredentialFile(String),
    #[error("no valid wallet entries found in {0}")]
    NoValidWallets(String),
}
