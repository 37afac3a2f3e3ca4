mod client;
mod endpoints;
mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Axis, LatestNode, NodeCount, NodeDetails, NodeRecord, NodeSummary, StatRow};
