//! Route table for both API deployments.

use urlencoding::encode;

use super::types::Axis;
use crate::config::ApiFlavor;

/// A GET route of the node API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Nodes,
	NodeCount,
	LatestNodes { limit: u32 },
	NodeDetails(String),
	Values(Axis),
	Statistics(Axis),
	GraphCountries,
	Relationships(String),
}

impl Endpoint {
	/// Path relative to the API base URL, parameters percent-encoded.
	pub fn path(&self, flavor: ApiFlavor) -> String {
		use ApiFlavor::*;

		match (self, flavor) {
			(Self::Nodes, Legacy) => "/get-nodes".into(),
			(Self::Nodes, Rest) => "/nodes".into(),
			(Self::NodeCount, Legacy) => "/get-node-count".into(),
			(Self::NodeCount, Rest) => "/nodes/count".into(),
			(Self::LatestNodes { .. }, Legacy) => "/get-latest-nodes".into(),
			(Self::LatestNodes { limit }, Rest) => format!("/nodes/latest?limit={limit}"),
			(Self::NodeDetails(id), Legacy) => format!("/get-node-details/{}", encode(id)),
			(Self::NodeDetails(id), Rest) => format!("/nodes/details/{}", encode(id)),
			(Self::Values(axis), Legacy) => match axis {
				Axis::Os => "/get-os-types",
				Axis::Client => "/get-client-types",
				Axis::Isp => "/get-isps",
				Axis::Country => "/get-countries",
			}
			.into(),
			(Self::Values(axis), Rest) => match axis {
				Axis::Os => "/nodes/operating-systems",
				Axis::Client => "/nodes/clients",
				Axis::Isp => "/nodes/isps",
				Axis::Country => "/nodes/countries",
			}
			.into(),
			(Self::Statistics(axis), Legacy) => {
				format!("/get-relationship-percentage/{}", axis.key_prefix())
			}
			(Self::Statistics(axis), Rest) => format!("/statistics/{}", axis.slug()),
			(Self::GraphCountries, _) => "/nodes/countries".into(),
			(Self::Relationships(country), Legacy) => format!("/nodes/country/{}", encode(country)),
			(Self::Relationships(country), Rest) => {
				format!("/nodes/relationships/{}", encode(country))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legacy_routes() {
		let f = ApiFlavor::Legacy;
		assert_eq!(Endpoint::Nodes.path(f), "/get-nodes");
		assert_eq!(Endpoint::LatestNodes { limit: 10 }.path(f), "/get-latest-nodes");
		assert_eq!(Endpoint::Values(Axis::Client).path(f), "/get-client-types");
		assert_eq!(
			Endpoint::Statistics(Axis::Os).path(f),
			"/get-relationship-percentage/OS_"
		);
		assert_eq!(Endpoint::Relationships("DE".into()).path(f), "/nodes/country/DE");
	}

	#[test]
	fn rest_routes() {
		let f = ApiFlavor::Rest;
		assert_eq!(Endpoint::NodeCount.path(f), "/nodes/count");
		assert_eq!(Endpoint::LatestNodes { limit: 25 }.path(f), "/nodes/latest?limit=25");
		assert_eq!(Endpoint::Values(Axis::Os).path(f), "/nodes/operating-systems");
		assert_eq!(Endpoint::Statistics(Axis::Isp).path(f), "/statistics/isp");
		assert_eq!(Endpoint::GraphCountries.path(f), "/nodes/countries");
	}

	#[test]
	fn path_parameters_are_encoded() {
		assert_eq!(
			Endpoint::Relationships("United States".into()).path(ApiFlavor::Rest),
			"/nodes/relationships/United%20States"
		);
		assert_eq!(
			Endpoint::NodeDetails("ab/cd".into()).path(ApiFlavor::Legacy),
			"/get-node-details/ab%2Fcd"
		);
	}
}
