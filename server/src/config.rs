use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub request_timeout: Duration,
    /// Directory of `<type>.json` schemas registered at startup
    pub schema_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            schema_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source.
    ///
    /// `BIND_ADDRESS` takes precedence over `HOST`/`PORT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(address) => address
                .parse::<SocketAddr>()
                .map_err(|_| anyhow::anyhow!("Invalid BIND_ADDRESS: {}", address))?,
            None => {
                let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
                let port = match lookup("PORT") {
                    Some(port) => port
                        .parse::<u16>()
                        .map_err(|_| anyhow::anyhow!("Invalid PORT: {}", port))?,
                    None => DEFAULT_PORT,
                };
                format!("{host}:{port}")
                    .parse::<SocketAddr>()
                    .map_err(|_| anyhow::anyhow!("Invalid HOST: {}", host))?
            }
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(secs) => match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => anyhow::bail!(
                    "Invalid REQUEST_TIMEOUT_SECS: {}. Must be a positive integer",
                    secs
                ),
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let schema_dir = lookup("SCHEMA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_address,
            request_timeout,
            schema_dir,
        })
    }
}
