//! Reelgen Client SDK.
//!
//! This crate provides a client library for applications to interact with the
//! reelgen generation API.
//!
//! # Example
//!
//! ```no_run
//! use reelgen_client::{GenerateRequest, ReelgenClient};
//!
//! # async fn example() -> Result<(), reelgen_client::ClientError> {
//! let client = ReelgenClient::new("http://reelgen.media-system.svc:8080");
//!
//! // Submit a text-to-video generation as the signed-in user
//! let accepted = client.generate_video("user-jwt", GenerateRequest {
//!     prompt: "A red fox trotting through fresh snow".to_string(),
//!     model: "wave-v2".to_string(),
//!     duration_seconds: None,
//!     output_format: None,
//! }).await?;
//!
//! println!("Job {} is {}", accepted.job_id, accepted.status.as_str());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, ReelgenClient};
pub use error::ClientError;
pub use types::*;
