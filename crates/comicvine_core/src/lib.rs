//! Core data types for the ComicVine API client.
//!
//! This crate provides the request and response types shared by the limiter,
//! the cache and the HTTP pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod descriptor;
mod endpoint;
mod file;
mod method;
mod response;
mod telemetry;

pub use descriptor::{RequestData, RequestDescriptor, RequestOptions};
pub use endpoint::Endpoint;
pub use file::FilePart;
pub use method::{DataType, Method};
pub use response::ApiResponse;
pub use telemetry::{init_telemetry, shutdown_telemetry};
