pub mod client;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod info;
pub mod types;

pub use client::Client;
pub use config::{Authentication, Config, Endpoint};
pub use error::Error;
pub use frame::Frame;

pub type Result<T> = std::result::Result<T, Error>;
