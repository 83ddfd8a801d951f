use std::path::Path;

use error_stack::{Report, Result, ResultExt};

use super::ConfigError;
use crate::blockchain::wallet::{parse_wallet_proxy_records, WalletProxyRecord};

/// Loads and validates the credential source. Malformed lines inside the file
/// are skipped with diagnostics; a missing file or zero valid records is a
/// hard stop for the run.
pub fn load_wallet_proxy_records(path: &Path) -> Result<Vec<WalletProxyRecord>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .change_context_lazy(|| ConfigError::MissingCredentialFile(path.display().to_string()))
        .attach_printable("create the file with format: privatekey|host:port:login:pass")?;

    let records = parse_wallet_proxy_records(&content);
    if records.is_empty() {
        return Err(Report::new(ConfigError::NoValidWallets(
            path.display().to_string(),
        )));
    }

    Ok(records)
}
