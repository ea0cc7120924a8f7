//! Live Redis connection and typed key operations.
//!
//! A gateway holds at most one connection; `connect` drops any prior
//! connection before opening the next, so the process never has two live
//! store connections. All operations are async over a multiplexed
//! connection and use redis::AsyncCommands.

use crate::error::AppError;
use crate::models::{ConnectionProfile, KeyDetail, ScoredMember, TypedValue};
use crate::scan::{KeySource, ScanPage};
use redis::AsyncCommands;
use std::time::Duration;

/// Wraps the single live Redis connection.
pub struct StoreGateway {
    conn: Option<redis::aio::MultiplexedConnection>,
    connect_timeout: Duration,
}

impl StoreGateway {
    pub fn new(connect_timeout: Duration) -> Self {
        StoreGateway {
            conn: None,
            connect_timeout,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Connect to the store described by `profile`, replacing any live
    /// connection. The connection is verified with PING before it is kept.
    pub async fn connect(&mut self, profile: &ConnectionProfile) -> Result<(), AppError> {
        // Tear down the old connection first; never two live at once.
        self.conn = None;

        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(profile.host.clone(), profile.port),
            redis: redis::RedisConnectionInfo {
                username: profile.username.clone(),
                password: profile.password.clone(),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info).map_err(|e| AppError::Connect(e.to_string()))?;
        let mut conn = tokio::time::timeout(
            self.connect_timeout,
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            AppError::Connect(format!(
                "timed out connecting to {}:{}",
                profile.host, profile.port
            ))
        })?
        .map_err(|e| AppError::Connect(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| AppError::Connect(e.to_string()))?;

        self.conn = Some(conn);
        Ok(())
    }

    /// Drop the live connection, if any. No resources are held beyond the
    /// in-memory handle.
    pub fn disconnect(&mut self) {
        self.conn = None;
    }

    fn conn(&mut self) -> Result<&mut redis::aio::MultiplexedConnection, AppError> {
        self.conn.as_mut().ok_or(AppError::NotConnected)
    }

    /// Read a key's full detail: typed value, TTL, and memory usage.
    ///
    /// The value type is resolved once from TYPE and drives which read
    /// command runs. A missing key is NotFound.
    pub async fn get_typed_value(&mut self, key: &str) -> Result<KeyDetail, AppError> {
        let con = self.conn()?;

        let kind: String = redis::cmd("TYPE").arg(key).query_async(con).await?;
        let value = match kind.as_str() {
            "string" => {
                let v: Option<String> = con.get(key).await?;
                // The key can expire between TYPE and GET.
                TypedValue::String(v.ok_or_else(|| AppError::NotFound(key.to_string()))?)
            }
            "list" => TypedValue::List(con.lrange(key, 0, -1).await?),
            "set" => TypedValue::Set(con.smembers(key).await?),
            "zset" => {
                let members: Vec<(String, f64)> = con.zrange_withscores(key, 0, -1).await?;
                TypedValue::Zset(
                    members
                        .into_iter()
                        .map(|(member, score)| ScoredMember { member, score })
                        .collect(),
                )
            }
            "hash" => TypedValue::Hash(con.hgetall(key).await?),
            "none" => return Err(AppError::NotFound(key.to_string())),
            other => {
                return Err(AppError::Upstream(format!(
                    "unsupported value type '{}' for key {}",
                    other, key
                )))
            }
        };

        let ttl: i64 = con.ttl(key).await?;
        let memory_bytes: Option<i64> = redis::cmd("MEMORY")
            .arg("USAGE")
            .arg(key)
            .query_async(con)
            .await?;

        Ok(KeyDetail {
            value,
            ttl,
            memory_bytes,
        })
    }

    /// Write a key with a typed value.
    ///
    /// Collection types are replaced wholesale (DEL then rebuild) so the
    /// stored value matches the payload exactly. `ttl`: positive seconds
    /// sets an expiry, -1 removes any expiry, None leaves it alone.
    pub async fn set_typed_value(
        &mut self,
        key: &str,
        value: &TypedValue,
        ttl: Option<i64>,
    ) -> Result<(), AppError> {
        let con = self.conn()?;

        match value {
            TypedValue::String(s) => {
                con.set::<_, _, ()>(key, s).await?;
            }
            TypedValue::List(items) => {
                con.del::<_, ()>(key).await?;
                if !items.is_empty() {
                    con.rpush::<_, _, ()>(key, items).await?;
                }
            }
            TypedValue::Set(members) => {
                con.del::<_, ()>(key).await?;
                if !members.is_empty() {
                    con.sadd::<_, _, ()>(key, members).await?;
                }
            }
            TypedValue::Zset(members) => {
                con.del::<_, ()>(key).await?;
                if !members.is_empty() {
                    let scored: Vec<(f64, &str)> = members
                        .iter()
                        .map(|m| (m.score, m.member.as_str()))
                        .collect();
                    con.zadd_multiple::<_, _, _, ()>(key, &scored).await?;
                }
            }
            TypedValue::Hash(fields) => {
                con.del::<_, ()>(key).await?;
                if !fields.is_empty() {
                    let pairs: Vec<(&str, &str)> = fields
                        .iter()
                        .map(|(f, v)| (f.as_str(), v.as_str()))
                        .collect();
                    con.hset_multiple::<_, _, _, ()>(key, &pairs).await?;
                }
            }
        }

        match ttl {
            Some(secs) if secs > 0 => {
                con.expire::<_, ()>(key, secs).await?;
            }
            Some(-1) => {
                con.persist::<_, ()>(key).await?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Delete a key. Deleting a missing key is a no-op.
    pub async fn delete(&mut self, key: &str) -> Result<(), AppError> {
        let con = self.conn()?;
        con.del::<_, ()>(key).await?;
        Ok(())
    }
}

impl KeySource for StoreGateway {
    /// One SCAN page. The cursor stays an opaque string end to end; "0"
    /// marks cycle completion.
    async fn scan_page(
        &mut self,
        cursor: &str,
        pattern: &str,
        count: u64,
    ) -> Result<ScanPage, AppError> {
        let con = self.conn()?;
        let (cursor, keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(con)
            .await?;
        Ok(ScanPage { cursor, keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan;

    #[tokio::test]
    async fn test_operations_require_connection() {
        let mut gateway = StoreGateway::new(Duration::from_secs(1));
        assert!(!gateway.is_connected());

        let err = gateway.get_typed_value("k").await;
        assert!(matches!(err, Err(AppError::NotConnected)));

        let err = gateway.delete("k").await;
        assert!(matches!(err, Err(AppError::NotConnected)));

        let err = gateway
            .set_typed_value("k", &TypedValue::String("v".to_string()), None)
            .await;
        assert!(matches!(err, Err(AppError::NotConnected)));
    }

    #[tokio::test]
    async fn test_scan_without_connection_is_not_connected() {
        let mut gateway = StoreGateway::new(Duration::from_secs(1));
        let mut session = scan::ScanSession::start("*");
        let err = scan::fetch_next_page(&mut gateway, &mut session, 10).await;
        assert!(matches!(err, Err(AppError::NotConnected)));
        // Session stays retryable after the failure.
        assert_eq!(session.cursor(), "0");
        assert!(!session.exhausted());
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_gateway_disconnected() {
        let mut gateway = StoreGateway::new(Duration::from_millis(200));
        let profile = ConnectionProfile {
            name: "unreachable".to_string(),
            host: "127.0.0.1".to_string(),
            // Reserved port with nothing listening.
            port: 1,
            username: None,
            password: None,
        };

        let err = gateway.connect(&profile).await;
        assert!(matches!(err, Err(AppError::Connect(_))));
        assert!(!gateway.is_connected());
    }
}
