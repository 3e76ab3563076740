pub mod client;
pub mod error;

pub use client::{parse_timestamps, Environment, RemoteClient};
pub use error::RemoteError;
