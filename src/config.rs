use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the recognition service
    pub recognition_url: String,
    /// Upper bound on each recognition call
    pub recognition_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            recognition_url: "http://localhost:5000".to_string(),
            recognition_timeout: Duration::from_secs(10),
        }
    }
}

pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let bind_addr = non_empty_var("PROCTOR_BIND_ADDR")
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!(value = %v, "Invalid PROCTOR_BIND_ADDR, using default");
                    None
                }
            })
            .unwrap_or(default.bind_addr);

        Self {
            bind_addr,
            recognition_url: non_empty_var("RECOGNITION_URL").unwrap_or(default.recognition_url),
            recognition_timeout: non_empty_var("RECOGNITION_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default.recognition_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for name in ["PROCTOR_BIND_ADDR", "RECOGNITION_URL", "RECOGNITION_TIMEOUT"] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.recognition_url, "http://localhost:5000");
        assert_eq!(config.recognition_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_overrides_and_fallbacks() {
        clear();
        std::env::set_var("PROCTOR_BIND_ADDR", "127.0.0.1:9000");
        std::env::set_var("RECOGNITION_URL", " http://vision:5000 ");
        std::env::set_var("RECOGNITION_TIMEOUT", "0");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.recognition_url, "http://vision:5000");
        assert_eq!(config.recognition_timeout, Duration::from_secs(10));

        std::env::set_var("PROCTOR_BIND_ADDR", "not-an-address");
        std::env::set_var("RECOGNITION_TIMEOUT", "3");
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.recognition_timeout, Duration::from_secs(3));
        clear();
    }
}
