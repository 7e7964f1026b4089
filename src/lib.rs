//! Typed async client for the [Globalping](https://globalping.io) API.
//!
//! Submit ping, traceroute, MTR, DNS and HTTP measurements, wait for them to
//! finish, list probes and query rate limits.
//!
//! ```no_run
//! use globalping::{ClientConfig, Globalping, MeasurementRequest, Outcome};
//!
//! # async fn run() -> Result<(), globalping::GlobalpingError> {
//! let client = Globalping::new(ClientConfig::from_env())?;
//!
//! let created = client
//!     .create_measurement(&MeasurementRequest::ping("example.com"))
//!     .await?;
//! let id = match created {
//!     Outcome::Success(reply) => reply.data.id,
//!     Outcome::Failure(reply) => {
//!         eprintln!("rejected: {}", reply.data.error.message);
//!         return Ok(());
//!     }
//! };
//!
//! let finished = client.await_measurement(&id).await?.into_result()?;
//! println!("{} probes answered", finished.data.results.len());
//! # Ok(())
//! # }
//! ```
//!
//! Structured API errors come back as [`Outcome::Failure`] by default; set
//! [`ErrorPolicy::ThrowApiErrors`] to get them as [`GlobalpingError::Api`].
//! Unrecognized error bodies, network failures and timeouts are always `Err`.

mod api;
mod client;
mod config;
mod error;
mod guards;
mod invoker;
mod normalize;
mod outcome;
mod poller;
mod types;

pub use client::Globalping;
pub use config::{ClientConfig, ErrorPolicy, RequestOptions, TOKEN_ENV_VAR};
pub use error::GlobalpingError;
pub use guards::{
    assert_http_status, assert_measurement_finished, assert_measurement_type, is_http_status,
    is_measurement_finished, is_measurement_type,
};
pub use normalize::normalize;
pub use outcome::{Outcome, RawResponse, Reply, RequestInfo, ResponseInfo};
pub use poller::{POLL_BUDGET, POLL_INTERVAL};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
