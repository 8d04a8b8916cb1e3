//! JSON-RPC submission configuration.
//!
//! Defaults target the Sepolia verifier deployment through Infura. Override
//! via environment variables or explicit construction for other networks
//! and for tests.

use acp_core::CircuitFamily;
use url::Url;
use zeroize::Zeroizing;

/// Default JSON-RPC provider base URL.
pub const DEFAULT_RPC_URL: &str = "https://sepolia.infura.io/v3/";
/// Verifier contract for CA-circuit proofs.
pub const DEFAULT_VERIFIER_CA: &str = "0x6d8f199B5fA030DCD4b6Afce600B35AdeB78d155";
/// Verifier contract for end-entity-circuit proofs.
pub const DEFAULT_VERIFIER_EE: &str = "0x67477571a91A19C4B5aC3836132Dc3A8812E944b";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Verifier contract addresses, one per circuit family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierAddresses {
    pub ca: String,
    pub ee: String,
}

impl VerifierAddresses {
    /// Validate and build. Addresses are `0x` followed by 40 hex digits.
    pub fn new(ca: impl Into<String>, ee: impl Into<String>) -> Result<Self, ConfigError> {
        let (ca, ee) = (ca.into(), ee.into());
        validate_address(&ca)?;
        validate_address(&ee)?;
        Ok(Self { ca, ee })
    }

    /// Addresses from `ACP_VERIFIER_CA` / `ACP_VERIFIER_EE`, falling back
    /// to the default deployment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            std::env::var("ACP_VERIFIER_CA").unwrap_or_else(|_| DEFAULT_VERIFIER_CA.to_string()),
            std::env::var("ACP_VERIFIER_EE").unwrap_or_else(|_| DEFAULT_VERIFIER_EE.to_string()),
        )
    }

    /// Destination for a proof of `family`. Untagged proofs go to the CA verifier.
    pub fn for_family(&self, family: Option<CircuitFamily>) -> &str {
        match family {
            Some(CircuitFamily::EndEntity) => &self.ee,
            Some(CircuitFamily::Ca) | None => &self.ca,
        }
    }
}

impl Default for VerifierAddresses {
    fn default() -> Self {
        Self {
            ca: DEFAULT_VERIFIER_CA.to_string(),
            ee: DEFAULT_VERIFIER_EE.to_string(),
        }
    }
}

/// How a batch of proofs is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionMode {
    /// One request at a time, in proof order.
    #[default]
    Sequential,
    /// One task per proof; results are still reported in proof order.
    Concurrent,
}

/// Configuration for submitting proofs over JSON-RPC.
///
/// Custom `Debug` implementation redacts `api_key`; the key is also the
/// final path segment of [`RpcConfig::endpoint`], so never log the endpoint.
#[derive(Clone)]
pub struct RpcConfig {
    /// Provider base URL, e.g. `https://sepolia.infura.io/v3/`.
    pub base_url: Url,
    /// Provider API key, appended to the base URL as a path segment.
    pub api_key: Zeroizing<String>,
    pub verifiers: VerifierAddresses,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub mode: SubmissionMode,
}

impl std::fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("verifiers", &self.verifiers)
            .field("timeout_secs", &self.timeout_secs)
            .field("mode", &self.mode)
            .finish()
    }
}

impl RpcConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ACP_RPC_URL` (default: `https://sepolia.infura.io/v3/`)
    /// - `ACP_RPC_API_KEY` (required)
    /// - `ACP_VERIFIER_CA` (default: [`DEFAULT_VERIFIER_CA`])
    /// - `ACP_VERIFIER_EE` (default: [`DEFAULT_VERIFIER_EE`])
    /// - `ACP_RPC_TIMEOUT_SECS` (default: 30)
    /// - `ACP_SUBMIT_CONCURRENT` (`true`/`1` to enable; default: sequential)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ACP_RPC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let verifiers = VerifierAddresses::from_env()?;

        let concurrent = std::env::var("ACP_SUBMIT_CONCURRENT")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            base_url: env_url("ACP_RPC_URL", DEFAULT_RPC_URL)?,
            api_key: Zeroizing::new(api_key),
            verifiers,
            timeout_secs: std::env::var("ACP_RPC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            mode: if concurrent {
                SubmissionMode::Concurrent
            } else {
                SubmissionMode::Sequential
            },
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?,
            api_key: Zeroizing::new("test-key".to_string()),
            verifiers: VerifierAddresses::default(),
            timeout_secs: 5,
            mode: SubmissionMode::Sequential,
        })
    }

    /// Full JSON-RPC endpoint: base URL and API key joined by exactly one `/`.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let key = self.api_key.trim_start_matches('/');
        let joined = Zeroizing::new(format!("{base}/{key}"));
        // The parse error text never includes the input, so the key stays out of it.
        Url::parse(&joined).map_err(|e| ConfigError::InvalidUrl("endpoint".to_string(), e.to_string()))
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn validate_address(address: &str) -> Result<(), ConfigError> {
    let valid = address
        .strip_prefix("0x")
        .is_some_and(|digits| digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidAddress(address.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ACP_RPC_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid contract address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = RpcConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.api_key.as_str(), "test-key");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.endpoint().unwrap().as_str(), "http://127.0.0.1:9000/test-key");
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let mut cfg = RpcConfig::local_mock("https://sepolia.infura.io/v3/").unwrap();
        cfg.api_key = Zeroizing::new("/abc123".into());
        assert_eq!(cfg.endpoint().unwrap().as_str(), "https://sepolia.infura.io/v3/abc123");

        cfg.base_url = Url::parse("https://sepolia.infura.io/v3").unwrap();
        cfg.api_key = Zeroizing::new("abc123".into());
        assert_eq!(cfg.endpoint().unwrap().as_str(), "https://sepolia.infura.io/v3/abc123");
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut cfg = RpcConfig::local_mock("http://127.0.0.1:9000").unwrap();
        cfg.api_key = Zeroizing::new("super-secret-key".into());
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn verifier_routing_by_family() {
        let v = VerifierAddresses::default();
        assert_eq!(v.for_family(Some(CircuitFamily::Ca)), DEFAULT_VERIFIER_CA);
        assert_eq!(v.for_family(Some(CircuitFamily::EndEntity)), DEFAULT_VERIFIER_EE);
        assert_eq!(v.for_family(None), DEFAULT_VERIFIER_CA);
    }

    #[test]
    fn addresses_are_validated() {
        assert!(VerifierAddresses::new(DEFAULT_VERIFIER_CA, DEFAULT_VERIFIER_EE).is_ok());
        assert!(matches!(
            VerifierAddresses::new("0x1234", DEFAULT_VERIFIER_EE),
            Err(ConfigError::InvalidAddress(_))
        ));
        let no_prefix = DEFAULT_VERIFIER_CA.trim_start_matches("0x");
        assert!(VerifierAddresses::new(DEFAULT_VERIFIER_CA, no_prefix).is_err());
        let bad_digit = format!("0x{}", "g".repeat(40));
        assert!(VerifierAddresses::new(bad_digit, DEFAULT_VERIFIER_EE).is_err());
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("ACP_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }
}
