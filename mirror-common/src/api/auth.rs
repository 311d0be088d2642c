//! Admin request authentication
//!
//! Every admin request carries `timestamp` (Unix epoch milliseconds) and
//! `hash` (SHA-256, 64 lowercase hex chars). POST and PUT send both in the
//! JSON body; GET and DELETE send them as query parameters.
//!
//! The hash covers the canonical JSON of the request object with `hash`
//! blanked to 64 zeros, followed by the shared secret in decimal. The secret
//! lives in the key-value store under [`SHARED_SECRET_KEY`]; a secret of 0
//! turns checking off.
//!
//! Pure functions and store access only. HTTP wiring lives in the service.

use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::store::KeyValueStore;

/// Store key holding the shared secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Oldest accepted request, relative to now
pub const MAX_TIMESTAMP_AGE_MS: i64 = 1000;

/// Furthest accepted clock skew into the future
pub const MAX_TIMESTAMP_DRIFT_MS: i64 = 1;

const BLANK_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Error)]
pub enum ApiAuthError {
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    #[error("Invalid hash")]
    InvalidHash { provided: String, calculated: String },

    #[error("Missing timestamp field")]
    MissingTimestamp,

    #[error("Missing hash field")]
    MissingHash,

    /// Request could not be read as JSON or query parameters
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// Shared secret could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Shared secret from the store; a random one is created on first use
///
/// Accepts a JSON number or a decimal string, so the secret can be set by
/// hand (e.g. `"0"` to turn checking off).
pub async fn load_shared_secret(store: &dyn KeyValueStore) -> Result<i64, ApiAuthError> {
    let stored = store
        .get(SHARED_SECRET_KEY)
        .await
        .map_err(|e| ApiAuthError::Storage(e.to_string()))?;

    let Some(value) = stored else {
        return initialize_shared_secret(store).await;
    };

    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ApiAuthError::Storage(format!("'{}' is not an integer: {}", SHARED_SECRET_KEY, value))
    })
}

/// Store a fresh non-zero secret and return it
pub async fn initialize_shared_secret(store: &dyn KeyValueStore) -> Result<i64, ApiAuthError> {
    let secret = {
        let mut rng = rand::thread_rng();
        std::iter::repeat_with(|| rng.gen::<i64>())
            .find(|candidate| *candidate != 0)
            .unwrap_or(1)
    };

    store
        .set(SHARED_SECRET_KEY, &Value::from(secret))
        .await
        .map_err(|e| ApiAuthError::Storage(e.to_string()))?;
    Ok(secret)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Accept timestamps up to [`MAX_TIMESTAMP_AGE_MS`] old and at most
/// [`MAX_TIMESTAMP_DRIFT_MS`] ahead of the local clock
///
/// ```
/// use mirror_common::api::auth::validate_timestamp;
/// use std::time::{SystemTime, UNIX_EPOCH};
///
/// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64;
/// assert!(validate_timestamp(now - 400).is_ok());
/// assert!(validate_timestamp(now - 3000).is_err());
/// ```
pub fn validate_timestamp(timestamp: i64) -> Result<(), ApiAuthError> {
    let now = now_millis();
    let age = now - timestamp;

    let reason = if age > MAX_TIMESTAMP_AGE_MS {
        format!("{}ms old (limit {}ms)", age, MAX_TIMESTAMP_AGE_MS)
    } else if age < -MAX_TIMESTAMP_DRIFT_MS {
        format!("{}ms ahead of server clock (limit {}ms)", -age, MAX_TIMESTAMP_DRIFT_MS)
    } else {
        return Ok(());
    };

    Err(ApiAuthError::InvalidTimestamp {
        timestamp,
        now,
        reason,
    })
}

/// Hash of `request` under `shared_secret`
///
/// Whatever `hash` the request carries is blanked first, so the value a
/// client sends never feeds into its own check.
///
/// ```
/// use mirror_common::api::auth::calculate_hash;
/// use serde_json::json;
///
/// let request = json!({"status": "active", "timestamp": 1730000000000i64, "hash": ""});
/// let hash = calculate_hash(&request, 42);
/// assert_eq!(hash.len(), 64);
/// assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn calculate_hash(request: &Value, shared_secret: i64) -> String {
    let mut blanked = request.clone();
    if let Value::Object(fields) = &mut blanked {
        fields.insert("hash".to_string(), Value::from(BLANK_HASH));
    }

    let digest = Sha256::new()
        .chain_update(to_canonical_json(&blanked))
        .chain_update(shared_secret.to_string())
        .finalize();

    digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
        let _ = write!(hex, "{:02x}", byte);
        hex
    })
}

/// Compact JSON with object keys in sorted order
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, field)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(&Value::String(key.clone()), out);
                out.push(':');
                write_canonical(field, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // Scalars already serialize compactly
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Compare a client hash against the expected one
pub fn validate_hash(provided: &str, request: &Value, shared_secret: i64) -> Result<(), ApiAuthError> {
    let calculated = calculate_hash(request, shared_secret);
    if provided == calculated {
        Ok(())
    } else {
        Err(ApiAuthError::InvalidHash {
            provided: provided.to_string(),
            calculated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_timestamp_window() {
        let now = now_millis();
        assert!(validate_timestamp(now).is_ok());
        assert!(validate_timestamp(now - 900).is_ok());
        assert!(validate_timestamp(now - 5000).is_err());
        assert!(validate_timestamp(now + 100).is_err());
    }

    #[test]
    fn test_hash_ignores_provided_hash_value() {
        let secret = 42;
        let a = json!({"timestamp": 1730000000000i64, "hash": "aaa"});
        let b = json!({"timestamp": 1730000000000i64, "hash": "bbb"});
        assert_eq!(calculate_hash(&a, secret), calculate_hash(&b, secret));
        assert_ne!(calculate_hash(&a, secret), calculate_hash(&a, secret + 1));
    }

    #[test]
    fn test_validate_hash_round_trip() {
        let body = json!({"status": "confirmed", "timestamp": 1730000000000i64, "hash": ""});
        let hash = calculate_hash(&body, 99);
        assert!(validate_hash(&hash, &body, 99).is_ok());
        assert!(matches!(
            validate_hash(BLANK_HASH, &body, 99),
            Err(ApiAuthError::InvalidHash { .. })
        ));
    }

    #[test]
    fn test_canonical_json_sorted_and_compact() {
        let canonical = to_canonical_json(&json!({"z": [1, 2], "a": {"y": null, "b": "q\"x"}}));
        assert_eq!(canonical, r#"{"a":{"b":"q\"x","y":null},"z":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_shared_secret_generated_once() {
        let store = MemoryStore::new();
        let first = load_shared_secret(&store).await.unwrap();
        assert_ne!(first, 0);
        let second = load_shared_secret(&store).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shared_secret_accepts_string_value() {
        let store = MemoryStore::new();
        store.set(SHARED_SECRET_KEY, &json!("0")).await.unwrap();
        assert_eq!(load_shared_secret(&store).await.unwrap(), 0);
    }
}
