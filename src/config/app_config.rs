const DEFAULT_PROJECT_NAME: &str = "EVM Balance Checker";
const DEFAULT_WALLET_PROXY_FILE: &str = "walletProxy/walletProxy";
const DEFAULT_RPC_CONFIG_FILE: &str = "rpc-config.json";

/// Application settings. Built once in `main` and passed down; core
/// components never reach for ambient configuration.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub project_name: String,
    pub wallet_proxy_file: String,
    pub rpc_config_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_owned(),
            wallet_proxy_file: DEFAULT_WALLET_PROXY_FILE.to_owned(),
            rpc_config_file: DEFAULT_RPC_CONFIG_FILE.to_owned(),
        }
    }
}

impl AppConfig {
    /// Loads `Config.{toml,json,...}` from the working directory when
    /// present. A missing, unreadable, or malformed file is not fatal: the
    /// run continues on defaults with a warning.
    pub fn load() -> Self {
        Self::load_from("Config")
    }

    fn load_from(base_name: &str) -> Self {
        match Self::read(base_name) {
            Ok(config) => config,
            Err(error) => {
                log::warn!(
                    "Could not load application config, using defaults: {}",
                    error
                );
                Self::default()
            }
        }
    }

    fn read(base_name: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("project_name", DEFAULT_PROJECT_NAME)?
            .set_default("wallet_proxy_file", DEFAULT_WALLET_PROXY_FILE)?
            .set_default("rpc_config_file", DEFAULT_RPC_CONFIG_FILE)?
            .add_source(config::File::with_name(base_name).required(false))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        // Assumes no Config.* in the test working directory.
        let config = AppConfig::load();
        assert_eq!(config.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(config.wallet_proxy_file, DEFAULT_WALLET_PROXY_FILE);
        assert_eq!(config.rpc_config_file, DEFAULT_RPC_CONFIG_FILE);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let path = std::env::temp_dir().join("evm-balance-checker-valid-config.toml");
        std::fs::write(&path, "project_name = \"Custom Checker\"").unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap());
        assert_eq!(config.project_name, "Custom Checker");
        assert_eq!(config.wallet_proxy_file, DEFAULT_WALLET_PROXY_FILE);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_config_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("evm-balance-checker-invalid-config.toml");
        std::fs::write(&path, "project_name = [\"not\", \"a\", \"string\"]").unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap());
        assert_eq!(config.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(config.wallet_proxy_file, DEFAULT_WALLET_PROXY_FILE);
        assert_eq!(config.rpc_config_file, DEFAULT_RPC_CONFIG_FILE);

        let _ = std::fs::remove_file(&path);
    }
}
