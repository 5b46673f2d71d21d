//! An async client for the [mcsrvstat.us](https://api.mcsrvstat.us/)
//! Minecraft server status API.
//!
//! ```no_run
//! # async fn run() -> Result<(), mcsrvstat::ClientError> {
//! let client = mcsrvstat::Client::new()?;
//! let status = client.status("play.example.com").await?;
//!
//! println!(
//!     "{} of {} player(s) online",
//!     status.players.online, status.players.max
//! );
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod status;
pub mod transport;

pub use client::{Client, ClientConfig, ClientError, ClientOption, ConfigFn};
pub use status::Status;
pub use transport::{BoxError, Transport};
