use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("private key is not valid hex")]
    InvalidKeyHex,
    #[error("private key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidKeyScalar,
    #[error("proxy port is out of range: {0}")]
    InvalidProxyPort(String),
}

/// Authenticated forward proxy, scoped to exactly one wallet. Never shared
/// across wallets so each keeps a distinct apparent network origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCredential {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ProxyCredential {
    /// "host:port" form used in report output; credentials stay out of it.
    pub fn descriptor(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One wallet for the duration of a run: the 32-byte secret plus the address
/// derived from it, computed once at construction.
#[derive(Debug, Clone)]
pub struct WalletIdentity {
    secret_hex: String,
    address: String,
}

impl WalletIdentity {
    /// Accepts the secret with or without a `0x`/`0X` prefix; stores the bare
    /// canonical hex and caches the checksummed address.
    pub fn from_secret_hex(secret: &str) -> Result<Self, WalletError> {
        let secret_hex = normalize_secret_hex(secret);
        let address = derive_address(&secret_hex)?;
        Ok(Self {
            secret_hex,
            address,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn secret_hex(&self) -> &str {
        &self.secret_hex
    }
}

fn normalize_secret_hex(secret: &str) -> String {
    let trimmed = secret.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_owned()
}

/// Standard EVM address derivation: secp256k1 public key, Keccak-256 of the
/// uncompressed point without its 0x04 marker, last 20 bytes, EIP-55 case.
fn derive_address(secret_hex: &str) -> Result<String, WalletError> {
    let secret_bytes = hex::decode(secret_hex).map_err(|_| WalletError::InvalidKeyHex)?;
    if secret_bytes.len() != 32 {
        return Err(WalletError::InvalidKeyLength(secret_bytes.len()));
    }

    let signing_key =
        SigningKey::from_slice(&secret_bytes).map_err(|_| WalletError::InvalidKeyScalar)?;
    let public_key = signing_key.verifying_key().to_encoded_point(false);
    let hash = Keccak256::digest(&public_key.as_bytes()[1..]);

    Ok(checksum_address(&hash[12..]))
}

/// EIP-55 mixed-case checksum encoding of a 20-byte address.
fn checksum_address(address_bytes: &[u8]) -> String {
    let lower = hex::encode(address_bytes);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// One validated credential-file record: a wallet and the proxy all of its
/// RPC traffic routes through.
#[derive(Debug, Clone)]
pub struct WalletProxyRecord {
    pub wallet: WalletIdentity,
    pub proxy: ProxyCredential,
}

/// Parses one `secret|host:port:user:pass` record. Used by the credential
/// source; malformed lines are reported by line number and skipped there.
pub fn parse_wallet_proxy_line(line: &str) -> Result<WalletProxyRecord, String> {
    let mut parts = line.splitn(2, '|');
    let secret = parts.next().unwrap_or_default().trim();
    let proxy_part = match parts.next() {
        Some(part) => part.trim(),
        None => return Err("expected format: privatekey|host:port:login:pass".to_owned()),
    };

    let proxy_fields: Vec<&str> = proxy_part.split(':').collect();
    if proxy_fields.len() != 4 {
        return Err("invalid proxy format (expected: host:port:login:pass)".to_owned());
    }

    let port: u16 = proxy_fields[1]
        .parse()
        .map_err(|_| format!("invalid proxy port: {}", proxy_fields[1]))?;
    if port == 0 {
        return Err("proxy port must be 1-65535".to_owned());
    }

    let wallet =
        WalletIdentity::from_secret_hex(secret).map_err(|error| format!("bad private key: {}", error))?;

    Ok(WalletProxyRecord {
        wallet,
        proxy: ProxyCredential {
            host: proxy_fields[0].to_owned(),
            port,
            username: proxy_fields[2].to_owned(),
            password: proxy_fields[3].to_owned(),
        },
    })
}

/// Parses the whole credential source. Blank lines and `#` comments are
/// ignored; malformed lines are skipped with a diagnostic. Zero valid records
/// is the caller's hard stop, not ours.
pub fn parse_wallet_proxy_records(content: &str) -> Vec<WalletProxyRecord> {
    let mut records = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_wallet_proxy_line(line) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("Skipped line {}: {}", index + 1, reason);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference derivation vectors: secret 1 and the well-known first
    // dev-node account secret.
    const SECRET_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const SECRET_DEV: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_reference_addresses() {
        let wallet = WalletIdentity::from_secret_hex(SECRET_ONE).unwrap();
        assert_eq!(wallet.address(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");

        let wallet = WalletIdentity::from_secret_hex(SECRET_DEV).unwrap();
        assert_eq!(wallet.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[test]
    fn derivation_is_deterministic_and_prefix_insensitive() {
        let bare = WalletIdentity::from_secret_hex(SECRET_DEV).unwrap();
        let prefixed = WalletIdentity::from_secret_hex(&format!("0x{}", SECRET_DEV)).unwrap();
        let upper_prefixed = WalletIdentity::from_secret_hex(&format!("0X{}", SECRET_DEV)).unwrap();

        assert_eq!(bare.address(), prefixed.address());
        assert_eq!(bare.address(), upper_prefixed.address());
        assert_eq!(bare.secret_hex(), SECRET_DEV);
        assert_eq!(prefixed.secret_hex(), SECRET_DEV);
    }

    #[test]
    fn rejects_bad_secrets() {
        assert_eq!(
            WalletIdentity::from_secret_hex("zzzz").unwrap_err(),
            WalletError::InvalidKeyHex
        );
        assert_eq!(
            WalletIdentity::from_secret_hex("abcd").unwrap_err(),
            WalletError::InvalidKeyLength(2)
        );
        // Zero is not a valid secp256k1 scalar.
        let zero = "0".repeat(64);
        assert_eq!(
            WalletIdentity::from_secret_hex(&zero).unwrap_err(),
            WalletError::InvalidKeyScalar
        );
    }

    #[test]
    fn parses_well_formed_record() {
        let line = format!("0x{}|10.0.0.1:8080:alice:s3cret", SECRET_DEV);
        let record = parse_wallet_proxy_line(&line).unwrap();

        assert_eq!(record.wallet.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(record.proxy.host, "10.0.0.1");
        assert_eq!(record.proxy.port, 8080);
        assert_eq!(record.proxy.username, "alice");
        assert_eq!(record.proxy.password, "s3cret");
        assert_eq!(record.proxy.descriptor(), "10.0.0.1:8080");
    }

    #[test]
    fn skips_malformed_lines_but_keeps_valid_ones() {
        let content = format!(
            "# wallets\n\n{}|10.0.0.1:8080:alice:s3cret\n{}|10.0.0.2:8080:bob\n",
            SECRET_DEV, SECRET_ONE
        );
        let records = parse_wallet_proxy_records(&content);

        // The second line is missing the proxy's 4-field structure.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].proxy.username, "alice");
    }

    #[test]
    fn rejects_missing_separator_and_bad_port() {
        assert!(parse_wallet_proxy_line("no-separator-here").is_err());

        let no_port = format!("{}|10.0.0.1:notaport:alice:pw", SECRET_DEV);
        assert!(parse_wallet_proxy_line(&no_port).is_err());

        let zero_port = format!("{}|10.0.0.1:0:alice:pw", SECRET_DEV);
        assert!(parse_wallet_proxy_line(&zero_port).is_err());
    }

    #[test]
    fn empty_source_yields_no_records() {
        assert!(parse_wallet_proxy_records("").is_empty());
        assert!(parse_wallet_proxy_records("# only a comment\n\n").is_empty());
    }
}
