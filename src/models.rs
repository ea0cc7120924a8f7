//! Request and response models for the bridge API.
//!
//! All models use serde for serialization/deserialization.
//! Key values are always carried as a tagged `TypedValue` variant resolved
//! from the store's TYPE response, never inferred from JSON shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Connection Profiles
// ============================================================================

/// A named set of connection parameters for reaching a Redis instance.
///
/// `name` is the primary key: saving a profile with an existing name
/// overwrites it in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Key Values
// ============================================================================

/// A sorted-set member with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

/// Tagged value payload for one key, by Redis data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum TypedValue {
    String(String),
    List(Vec<String>),
    Set(Vec<String>),
    Zset(Vec<ScoredMember>),
    Hash(HashMap<String, String>),
}

impl TypedValue {
    /// Redis type name for this value, as TYPE reports it.
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "string",
            TypedValue::List(_) => "list",
            TypedValue::Set(_) => "set",
            TypedValue::Zset(_) => "zset",
            TypedValue::Hash(_) => "hash",
        }
    }
}

/// Everything the UI shows for a single key.
///
/// `ttl` is remaining seconds, or -1 for no expiry. `memory_bytes` is
/// MEMORY USAGE output; None when the server doesn't report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyDetail {
    pub value: TypedValue,
    pub ttl: i64,
    pub memory_bytes: Option<i64>,
}

// ============================================================================
// Bridge Requests / Responses
// ============================================================================

/// Uniform response envelope for every bridge operation.
///
/// Failures take the same shape with `success: false` and an `error`
/// message (see `AppError::into_response`).
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Success with no payload.
    pub fn done() -> Self {
        Envelope {
            success: true,
            data: None,
        }
    }
}

/// Request to delete a saved profile by name.
#[derive(Debug, Deserialize)]
pub struct DeleteProfileRequest {
    pub name: String,
}

/// Request for one incremental scan page.
///
/// `restart` (or a pattern different from the running session's) starts a
/// fresh scan from cursor "0".
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub pattern: Option<String>,
    pub count: Option<u64>,
    #[serde(default)]
    pub restart: bool,
}

/// One page of scanned keys.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub keys: Vec<String>,
    pub cursor: String,
    pub has_more: bool,
}

/// Request for a bulk pattern search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub pattern: Option<String>,
}

/// Bulk search result. `complete` is false when the result cap truncated
/// the scan before the cursor cycle finished.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub keys: Vec<String>,
    pub complete: bool,
}

/// Request naming a single key (details, delete).
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

/// Request to write a key.
///
/// `ttl`: positive seconds sets an expiry, -1 removes any expiry, absent
/// leaves the expiry alone.
#[derive(Debug, Deserialize)]
pub struct SetKeyRequest {
    pub key: String,
    pub value: TypedValue,
    pub ttl: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_value_tagged_serialization() {
        let value = TypedValue::Zset(vec![ScoredMember {
            member: "a".to_string(),
            score: 1.5,
        }]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["kind"], "zset");
        assert_eq!(json["payload"][0]["member"], "a");
        assert_eq!(json["payload"][0]["score"], 1.5);
    }

    #[test]
    fn test_typed_value_roundtrip() {
        let value = TypedValue::List(vec!["x".to_string(), "y".to_string()]);
        let json = serde_json::to_string(&value).unwrap();
        let back: TypedValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.kind(), "list");
    }

    #[test]
    fn test_profile_debug_redacts_password() {
        let profile = ConnectionProfile {
            name: "local".to_string(),
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: Some("hunter2".to_string()),
        };
        let debug = format!("{:?}", profile);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_profile_optional_fields_omitted() {
        let profile = ConnectionProfile {
            name: "local".to_string(),
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("username").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_envelope_done_omits_data() {
        let json = serde_json::to_value(Envelope::done()).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
    }
}
