//! Connection settings for a [`Client`](crate::Client).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::codec::DEFAULT_MAX_FRAME_SIZE;
use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 6379;

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    HostPort { host: String, port: u16 },
    UnixSocket(PathBuf),
}

impl Endpoint {
    pub fn host(host: impl Into<String>) -> Self {
        Endpoint::HostPort {
            host: host.into(),
            port: DEFAULT_PORT,
        }
    }

    pub fn host_port(host: impl Into<String>, port: u16) -> Self {
        Endpoint::HostPort {
            host: host.into(),
            port,
        }
    }

    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Endpoint::UnixSocket(path.into())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::HostPort { host, port } => write!(f, "{}:{}", host, port),
            Endpoint::UnixSocket(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// How the connection identifies itself after the transport is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authentication {
    #[default]
    None,
    /// Sends `AUTH [username] password` right after every connect.
    AutoAuth {
        username: Option<String>,
        password: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------
    pub endpoint: Endpoint,

    /// Budget for opening the transport. Authentication is not included.
    pub connect_timeout: Duration,

    /// Bounds how long a single reply may take. `None` waits forever.
    pub read_timeout: Option<Duration>,

    /// Enables TCP keep-alive probes. Ignored for Unix sockets.
    pub keep_alive: bool,

    // -------------------------------------------------------------------------
    // Protocol
    // -------------------------------------------------------------------------
    pub authentication: Authentication,

    /// Largest reply the decoder buffers before failing (in bytes)
    pub max_frame_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::host_port("127.0.0.1", DEFAULT_PORT),
            connect_timeout: Duration::from_secs(5),
            read_timeout: None,
            keep_alive: false,
            authentication: Authentication::None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.config.keep_alive = keep_alive;
        self
    }

    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.config.authentication = authentication;
        self
    }

    /// Shorthand for [`Authentication::AutoAuth`].
    pub fn auto_auth(mut self, username: Option<String>, password: impl Into<String>) -> Self {
        self.config.authentication = Authentication::AutoAuth {
            username,
            password: password.into(),
        };
        self
    }

    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Validates and returns the config.
    pub fn build(self) -> Result<Config> {
        let config = self.config;

        if config.connect_timeout.is_zero() {
            return Err(Error::Config("connect timeout must be greater than zero".into()));
        }
        if config.read_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(Error::Config("read timeout must be greater than zero".into()));
        }
        if config.max_frame_size == 0 {
            return Err(Error::Config("max frame size must be greater than zero".into()));
        }
        if let Endpoint::HostPort { host, .. } = &config.endpoint {
            if host.is_empty() {
                return Err(Error::Config("host must not be empty".into()));
            }
        }

        Ok(config)
    }
}
