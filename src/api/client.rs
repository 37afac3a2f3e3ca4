use gloo_net::http::Request;
use log::debug;
use serde::de::DeserializeOwned;

use super::endpoints::Endpoint;
use super::error::ApiError;
use super::types::{
	Axis, LatestNode, NodeCount, NodeDetails, NodeRecord, NodeSummary, StatRow, StatisticsPayload,
};
use crate::config::{ApiConfig, ApiFlavor};

/// Thin GET-only client for the node API.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
	flavor: ApiFlavor,
	latest_limit: u32,
}

impl ApiClient {
	pub fn new(config: &ApiConfig) -> Self {
		Self {
			base_url: config.base_url.clone(),
			flavor: config.flavor,
			latest_limit: config.latest_limit,
		}
	}

	pub fn url(&self, endpoint: &Endpoint) -> String {
		format!("{}{}", self.base_url, endpoint.path(self.flavor))
	}

	pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
		let url = self.url(endpoint);
		debug!("GET {url}");

		let response = Request::get(&url)
			.send()
			.await
			.map_err(|source| ApiError::Transport {
				url: url.clone(),
				source,
			})?;

		if !response.ok() {
			return Err(ApiError::Status {
				url,
				status: response.status(),
			});
		}

		response.json::<T>().await.map_err(|e| ApiError::Decode {
			url,
			reason: e.to_string(),
		})
	}

	pub async fn nodes(&self) -> Result<Vec<NodeSummary>, ApiError> {
		self.get_json(&Endpoint::Nodes).await
	}

	pub async fn node_count(&self) -> Result<NodeCount, ApiError> {
		self.get_json(&Endpoint::NodeCount).await
	}

	pub async fn latest_nodes(&self) -> Result<Vec<LatestNode>, ApiError> {
		self.get_json(&Endpoint::LatestNodes {
			limit: self.latest_limit,
		})
		.await
	}

	pub async fn node_details(&self, node_id: &str) -> Result<NodeDetails, ApiError> {
		self.get_json(&Endpoint::NodeDetails(node_id.to_string()))
			.await
	}

	/// Distinct values of `axis`, nulls dropped.
	pub async fn values(&self, axis: Axis) -> Result<Vec<String>, ApiError> {
		let values: Vec<Option<String>> = self.get_json(&Endpoint::Values(axis)).await?;
		Ok(values.into_iter().flatten().collect())
	}

	pub async fn statistics(&self, axis: Axis) -> Result<Vec<StatRow>, ApiError> {
		let payload: StatisticsPayload = self.get_json(&Endpoint::Statistics(axis)).await?;
		Ok(payload.into_rows(axis))
	}

	pub async fn graph_countries(&self) -> Result<Vec<String>, ApiError> {
		let values: Vec<Option<String>> = self.get_json(&Endpoint::GraphCountries).await?;
		Ok(values.into_iter().flatten().collect())
	}

	pub async fn relationships(&self, country: &str) -> Result<Vec<NodeRecord>, ApiError> {
		self.get_json(&Endpoint::Relationships(country.to_string()))
			.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn url_joins_base_and_flavored_path() {
		let config = ApiConfig::from_vars(Some("http://localhost:5001/"), Some("legacy"), None, None);
		let client = ApiClient::new(&config);
		assert_eq!(
			client.url(&Endpoint::NodeCount),
			"http://localhost:5001/get-node-count"
		);
	}

	#[test]
	fn latest_limit_reaches_rest_route() {
		let config = ApiConfig::from_vars(None, Some("rest"), None, Some("7"));
		let client = ApiClient::new(&config);
		assert_eq!(
			client.url(&Endpoint::LatestNodes {
				limit: client.latest_limit
			}),
			"http://127.0.0.1:5001/nodes/latest?limit=7"
		);
	}
}
