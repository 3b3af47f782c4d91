use std::path::PathBuf;
use std::time::Duration;

/// Dev server options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "127.0.0.1", "0.0.0.0")
    pub address: String,

    /// Port to listen on (e.g., 4000)
    pub port: u16,

    /// Page to generate on startup
    pub page: Option<String>,

    /// Directory whose changes trigger a refresh
    pub watch_dir: Option<PathBuf>,

    /// How long a preview request waits for its generation
    pub render_timeout: Duration,

    /// Quiet period before a burst of file events triggers one refresh
    pub debounce: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: "127.0.0.1".to_string(),
            port: 4000,
            page: None,
            watch_dir: None,
            render_timeout: Duration::from_secs(30),
            debounce: Duration::from_millis(200),
        }
    }
}

impl ServerConfig {
    pub fn new(address: &str, port: u16) -> Self {
        ServerConfig {
            address: address.to_string(),
            port,
            ..Default::default()
        }
    }

    /// `address:port`
    pub fn address_string(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.address_string())
    }
}
