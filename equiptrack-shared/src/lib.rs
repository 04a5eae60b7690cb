use std::net::TcpListener;

use rand::Rng;

pub mod datefmt;
pub mod file;
pub mod file_type;

pub struct AddrInfo {
    pub addr: String,
    pub port: u16,
    pub https: bool,
}

impl AddrInfo {
    pub fn as_url(&self) -> String {
        let scheme = match self.https {
            true => "https",
            false => "http",
        };
        format!("{}://{}:{}", scheme, self.addr, self.port)
    }

    pub fn as_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    pub fn from_env() -> Self {
        let https = match std::env::var("EQUIPTRACK_HTTPS") {
            Ok(val) => val == "true",
            Err(_) => false,
        };

        let port: u16 = match std::env::var("EQUIPTRACK_PORT") {
            Ok(val) => val.parse().unwrap_or(8379),
            Err(_) => 8379,
        };

        Self {
            addr: std::env::var("EQUIPTRACK_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            https,
        }
    }

    pub fn test() -> Self {
        // select a random free port
        let mut rng = rand::rng();

        let mut port: u16 = rng.random_range(32768..65535);
        loop {
            if TcpListener::bind(format!("127.0.0.1:{}", port)).is_ok() {
                break;
            }
            port = rng.random_range(32768..65535);
        }

        Self {
            https: false,
            addr: "127.0.0.1".to_string(),
            port,
        }
    }
}
