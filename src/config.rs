use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_addr: SocketAddr,

    // Profile storage
    pub profiles_path: PathBuf,

    // Scanning
    pub scan_page_size: u64,
    pub search_max_keys: usize,

    // Store connection
    pub connect_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Server — the bridge is for a local desktop UI, so default to
        // loopback only
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:4100".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Profile storage
        let profiles_path = PathBuf::from(
            env::var("PROFILES_PATH").unwrap_or_else(|_| "data/connections.json".to_string()),
        );

        // Scanning
        let scan_page_size = parse_env_or_default("SCAN_PAGE_SIZE", 50)?;
        if scan_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "SCAN_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let search_max_keys = parse_env_or_default("SEARCH_MAX_KEYS", 1000)?;
        if search_max_keys == 0 {
            return Err(ConfigError::InvalidValue(
                "SEARCH_MAX_KEYS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        // Store connection
        let connect_timeout_secs = parse_env_or_default("CONNECT_TIMEOUT_SECS", 5)?;

        Ok(Config {
            bind_addr,
            profiles_path,
            scan_page_size,
            search_max_keys,
            connect_timeout_secs,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("BIND_ADDR");
        env::remove_var("PROFILES_PATH");
        env::remove_var("SCAN_PAGE_SIZE");
        env::remove_var("SEARCH_MAX_KEYS");
        env::remove_var("CONNECT_TIMEOUT_SECS");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:4100");
        assert_eq!(config.profiles_path, PathBuf::from("data/connections.json"));
        assert_eq!(config.scan_page_size, 50);
        assert_eq!(config.search_max_keys, 1000);
        assert_eq!(config.connect_timeout_secs, 5);

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_zero_scan_page_size_rejected() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SCAN_PAGE_SIZE", "0");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SCAN_PAGE_SIZE"
        ));

        clear_test_env();
    }

    #[test]
    fn test_zero_search_cap_rejected() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("SEARCH_MAX_KEYS", "0");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SEARCH_MAX_KEYS"
        ));

        clear_test_env();
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("BIND_ADDR", "0.0.0.0:9000");
        env::set_var("PROFILES_PATH", "/tmp/profiles.json");
        env::set_var("SCAN_PAGE_SIZE", "200");
        env::set_var("SEARCH_MAX_KEYS", "5000");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.profiles_path, PathBuf::from("/tmp/profiles.json"));
        assert_eq!(config.scan_page_size, 200);
        assert_eq!(config.search_max_keys, 5000);

        clear_test_env();
    }
}
