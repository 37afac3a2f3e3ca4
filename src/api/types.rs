//! Wire types of the node API.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Deserialize;

/// One of the four node attributes the dashboards slice by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
	Os,
	Client,
	Isp,
	Country,
}

impl Axis {
	pub const ALL: [Axis; 4] = [Axis::Os, Axis::Client, Axis::Isp, Axis::Country];

	pub fn slug(self) -> &'static str {
		match self {
			Self::Os => "os",
			Self::Client => "client",
			Self::Isp => "isp",
			Self::Country => "country",
		}
	}

	/// Key prefix used by the percentage endpoint (`OS_linux`).
	pub fn key_prefix(self) -> &'static str {
		match self {
			Self::Os => "OS_",
			Self::Client => "CLIENT_",
			Self::Isp => "ISP_",
			Self::Country => "COUNTRY_",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::Os => "Operating System",
			Self::Client => "Client",
			Self::Isp => "ISP",
			Self::Country => "Country",
		}
	}
}

/// Ports come back as numbers from one deployment and strings from another.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Port {
	Number(u64),
	Text(String),
}

impl fmt::Display for Port {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(n) => write!(f, "{n}"),
			Self::Text(s) => f.write_str(s),
		}
	}
}

/// A discovered node as listed by `/nodes`. Also the shape of the details endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeSummary {
	pub node_id: String,
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<Port>,
	#[serde(rename = "OS", default)]
	pub os: Option<String>,
	#[serde(default)]
	pub client: Option<String>,
	#[serde(default)]
	pub country: Option<String>,
	#[serde(rename = "ISP", default)]
	pub isp: Option<String>,
	#[serde(default)]
	pub latitude: Option<f64>,
	#[serde(default)]
	pub longitude: Option<f64>,
	/// Hours the node was unreachable during the last day.
	#[serde(default)]
	pub status: Option<f64>,
	#[serde(default)]
	pub created_at: Option<String>,
}

pub type NodeDetails = NodeSummary;

impl NodeSummary {
	/// Attribute value for `axis`, empty when the API sent null.
	pub fn attribute(&self, axis: Axis) -> &str {
		let value = match axis {
			Axis::Os => &self.os,
			Axis::Client => &self.client,
			Axis::Isp => &self.isp,
			Axis::Country => &self.country,
		};
		value.as_deref().unwrap_or_default()
	}

	/// `(latitude, longitude)` when both are present and finite.
	pub fn coordinates(&self) -> Option<(f64, f64)> {
		match (self.latitude, self.longitude) {
			(Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
			_ => None,
		}
	}

	pub fn enode(&self) -> String {
		enode_url(&self.node_id, self.host.as_deref(), self.port.as_ref())
	}

	/// Share of the last 24 hours the node was reachable, in percent.
	pub fn uptime_percent(&self) -> Option<f64> {
		self.status
			.map(|hours_down| (100.0 - hours_down * 100.0 / 24.0).clamp(0.0, 100.0))
	}
}

fn enode_url(id: &str, host: Option<&str>, port: Option<&Port>) -> String {
	let port = port.map(Port::to_string).unwrap_or_default();
	format!("enode://{id}@{}:{port}", host.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodeCount {
	#[serde(rename = "NumberOfNodes")]
	pub nodes: u64,
	#[serde(rename = "NumberOfCountries", default)]
	pub countries: Option<u64>,
	#[serde(rename = "NumberOfISPs", default)]
	pub isps: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LatestNode {
	pub node_id: String,
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<Port>,
	#[serde(default)]
	pub country: Option<String>,
	#[serde(default)]
	pub client: Option<String>,
	#[serde(rename = "OS", default)]
	pub os: Option<String>,
	#[serde(rename = "ISP", default)]
	pub isp: Option<String>,
	#[serde(default)]
	pub minutes_ago: Option<f64>,
	#[serde(default)]
	pub created_at: Option<String>,
	#[serde(default)]
	enode: Option<String>,
}

impl LatestNode {
	pub fn enode(&self) -> String {
		match &self.enode {
			Some(enode) if !enode.is_empty() => enode.clone(),
			_ => enode_url(&self.node_id, self.host.as_deref(), self.port.as_ref()),
		}
	}

	/// "12 minutes ago", falling back to the creation timestamp.
	pub fn age(&self) -> String {
		match (self.minutes_ago, &self.created_at) {
			(Some(m), _) => format!("{} minutes ago", m.round() as i64),
			(None, Some(at)) => format!("added {at}"),
			(None, None) => String::new(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Named {
	pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NodeRef {
	pub id: String,
}

/// One `country -> isp -> os -> client -> node` path from the relationship endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
	pub c: Named,
	pub isp: Named,
	pub os: Named,
	pub client: Named,
	pub n: NodeRef,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatRow {
	pub label: String,
	pub percentage: f64,
	pub count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct KeyedRow {
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub count: Option<u64>,
	pub percentage: f64,
}

/// Both statistics shapes the API has served.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatisticsPayload {
	/// `{"os": [{"type": "linux", "count": 3, "percentage": 60.0}]}`
	Keyed(HashMap<String, Vec<KeyedRow>>),
	/// `{"OS_linux": 60.0}`
	Percentages(BTreeMap<String, f64>),
}

impl StatisticsPayload {
	/// Flattens to rows sorted by percentage, largest first.
	pub fn into_rows(self, axis: Axis) -> Vec<StatRow> {
		let mut rows: Vec<StatRow> = match self {
			Self::Keyed(mut by_axis) => {
				let keyed = match by_axis.remove(axis.slug()) {
					Some(rows) => rows,
					None => by_axis.into_values().flatten().collect(),
				};
				keyed
					.into_iter()
					.map(|r| StatRow {
						label: r.kind.unwrap_or_else(|| "Unknown".into()),
						percentage: r.percentage,
						count: r.count,
					})
					.collect()
			}
			Self::Percentages(map) => map
				.into_iter()
				.map(|(key, percentage)| StatRow {
					label: key
						.split_once('_')
						.map(|(_, rest)| rest.to_string())
						.unwrap_or(key),
					percentage,
					count: None,
				})
				.collect(),
		};
		rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
		rows
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn node_summary_tolerates_nulls_and_string_ports() {
		let node: NodeSummary = serde_json::from_value(json!({
			"NodeId": "abc",
			"Host": "10.0.0.1",
			"Port": "30303",
			"OS": null,
			"Client": "Geth/v1.13",
			"Country": "Germany",
			"ISP": "Hetzner Online GmbH",
			"Latitude": 50.1,
			"Longitude": 8.6
		}))
		.unwrap();

		assert_eq!(node.attribute(Axis::Os), "");
		assert_eq!(node.attribute(Axis::Isp), "Hetzner Online GmbH");
		assert_eq!(node.coordinates(), Some((50.1, 8.6)));
		assert_eq!(node.enode(), "enode://abc@10.0.0.1:30303");
	}

	#[test]
	fn missing_coordinates_are_none() {
		let node: NodeSummary = serde_json::from_value(json!({"NodeId": "x", "Latitude": 1.0})).unwrap();
		assert_eq!(node.coordinates(), None);
	}

	#[test]
	fn uptime_from_status_hours() {
		let node: NodeDetails =
			serde_json::from_value(json!({"NodeId": "x", "Status": 6})).unwrap();
		assert_eq!(node.uptime_percent(), Some(75.0));
	}

	#[test]
	fn latest_node_prefers_served_enode() {
		let served: LatestNode = serde_json::from_value(json!({
			"NodeId": "a", "Host": "h", "Port": 1, "Enode": "enode://served", "MinutesAgo": 4.4
		}))
		.unwrap();
		assert_eq!(served.enode(), "enode://served");
		assert_eq!(served.age(), "4 minutes ago");

		let derived: LatestNode =
			serde_json::from_value(json!({"NodeId": "a", "Host": "h", "Port": 1})).unwrap();
		assert_eq!(derived.enode(), "enode://a@h:1");
	}

	#[test]
	fn node_count_without_optional_totals() {
		let count: NodeCount = serde_json::from_value(json!({"NumberOfNodes": 12})).unwrap();
		assert_eq!(count.nodes, 12);
		assert_eq!(count.isps, None);
	}

	#[test]
	fn relationship_record_ignores_extra_fields() {
		let record: NodeRecord = serde_json::from_value(json!({
			"root": {"name": "World"},
			"c": {"name": "DE"},
			"isp": {"name": "Hetzner"},
			"os": {"name": "linux"},
			"client": {"name": "geth"},
			"n": {"id": "n1", "host": "1.2.3.4"}
		}))
		.unwrap();
		assert_eq!(record.n.id, "n1");
		assert_eq!(record.c.name, "DE");
	}

	#[test]
	fn keyed_statistics_are_sorted() {
		let payload: StatisticsPayload = serde_json::from_value(json!({
			"os": [
				{"type": "windows", "count": 1, "percentage": 10.0},
				{"type": "linux", "count": 9, "percentage": 90.0}
			]
		}))
		.unwrap();
		let rows = payload.into_rows(Axis::Os);
		assert_eq!(rows[0].label, "linux");
		assert_eq!(rows[0].count, Some(9));
		assert_eq!(rows[1].label, "windows");
	}

	#[test]
	fn flat_percentages_drop_the_key_prefix() {
		let payload: StatisticsPayload = serde_json::from_value(json!({
			"CLIENT_geth": 55.5,
			"CLIENT_besu": 20.0,
			"CLIENT_open_ethereum": 24.5
		}))
		.unwrap();
		let rows = payload.into_rows(Axis::Client);
		let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
		assert_eq!(labels, ["geth", "open_ethereum", "besu"]);
	}
}
