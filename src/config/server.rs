use std::thread;

/// Server configuration for HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Allowed CORS origin; `*` allows any
    pub cors_allowed_origin: String,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            host,
            port,
            workers: cores * 2,
            cors_allowed_origin: "*".to_string(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
