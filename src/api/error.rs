use thiserror::Error;

/// Why a request against the node API did not produce a value.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: gloo_net::Error,
	},
	#[error("{url} answered HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("could not decode response from {url}: {reason}")]
	Decode { url: String, reason: String },
}
