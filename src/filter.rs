//! Attribute filters for the map markers.
//!
//! Each axis has a fixed table of named buckets. A bucket matches when its
//! rule holds for the lowercased attribute; `Others` matches when no named
//! bucket of that axis does. Country is matched exactly against the value
//! the API reports.

use crate::api::{Axis, NodeSummary};

pub const ALL: &str = "all";
pub const OTHERS: &str = "Others";

#[derive(Clone, Copy, Debug)]
pub enum Rule {
	AnyOf(&'static [&'static str]),
	AllOf(&'static [&'static str]),
}

impl Rule {
	fn holds(self, lowered: &str) -> bool {
		match self {
			Self::AnyOf(needles) => needles.iter().any(|n| lowered.contains(n)),
			Self::AllOf(needles) => needles.iter().all(|n| lowered.contains(n)),
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct Bucket {
	pub label: &'static str,
	pub rule: Rule,
}

const fn any(label: &'static str, needles: &'static [&'static str]) -> Bucket {
	Bucket {
		label,
		rule: Rule::AnyOf(needles),
	}
}

const fn all(label: &'static str, needles: &'static [&'static str]) -> Bucket {
	Bucket {
		label,
		rule: Rule::AllOf(needles),
	}
}

pub const OS_BUCKETS: &[Bucket] = &[
	any("Linux", &["linux"]),
	any("Windows", &["windows"]),
	any("MacOS", &["macos"]),
	any("Android", &["android"]),
	any("FreeBSD", &["freebsd"]),
	any("Darwin", &["darwin"]),
];

pub const CLIENT_BUCKETS: &[Bucket] = &[
	any("Geth", &["geth"]),
	any("Nethermind", &["nethermind"]),
	any("Besu", &["besu"]),
	any("Erigon", &["erigon"]),
	any("Reth", &["reth"]),
	any("EthereumJS", &["ethereumjs"]),
];

pub const ISP_BUCKETS: &[Bucket] = &[
	any("Contabo", &["contabo"]),
	any("AWS", &["amazon", "aws"]),
	any("Azure", &["microsoft", "azure"]),
	any("Google", &["google"]),
	any("Alibaba", &["alibaba"]),
	any("Oracle", &["oracle"]),
	any("IBM", &["ibm"]),
	any("Tencent", &["tencent"]),
	any("OVHCloud", &["ovh"]),
	any("DO", &["digitalocean"]),
	any("Linode", &["linode", "akamai"]),
	any("Salesforce", &["salesforce"]),
	all("Huawei", &["huawei", "cloud"]),
	all("Dell", &["dell", "cloud"]),
	any("Vultr", &["vultr"]),
	any("Heroku", &["heroku"]),
	any("Hetzner", &["hetzner"]),
	any("Scaleway", &["scaleway"]),
	any("Upcloud", &["upcloud"]),
	any("Kamatera", &["kamatera"]),
];

/// Named buckets of `axis`; country has none.
pub fn buckets(axis: Axis) -> &'static [Bucket] {
	match axis {
		Axis::Os => OS_BUCKETS,
		Axis::Client => CLIENT_BUCKETS,
		Axis::Isp => ISP_BUCKETS,
		Axis::Country => &[],
	}
}

/// Choices offered in an axis' dropdown, excluding "all".
pub fn options(axis: Axis, countries: &[String]) -> Vec<String> {
	match axis {
		Axis::Country => countries.to_vec(),
		_ => buckets(axis)
			.iter()
			.map(|b| b.label.to_string())
			.chain([OTHERS.to_string()])
			.collect(),
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	All,
	Named(String),
	Others,
}

impl Selection {
	/// Parses a dropdown value; empty and "all" select everything.
	pub fn parse(value: &str) -> Self {
		match value {
			"" | ALL => Self::All,
			OTHERS => Self::Others,
			other => Self::Named(other.to_string()),
		}
	}

	pub fn value(&self) -> &str {
		match self {
			Self::All => ALL,
			Self::Others => OTHERS,
			Self::Named(label) => label,
		}
	}

	fn admits(&self, axis: Axis, raw: &str) -> bool {
		if axis == Axis::Country {
			return match self {
				Self::All => true,
				Self::Named(name) => raw == name.as_str(),
				Self::Others => false,
			};
		}

		let lowered = raw.to_lowercase();
		let table = buckets(axis);
		match self {
			Self::All => true,
			Self::Others => !table.iter().any(|b| b.rule.holds(&lowered)),
			Self::Named(label) => match table.iter().find(|b| b.label == label.as_str()) {
				Some(bucket) => bucket.rule.holds(&lowered),
				None => true,
			},
		}
	}
}

/// One selection per axis, combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerFilter {
	pub os: Selection,
	pub client: Selection,
	pub isp: Selection,
	pub country: Selection,
}

impl MarkerFilter {
	pub fn get(&self, axis: Axis) -> &Selection {
		match axis {
			Axis::Os => &self.os,
			Axis::Client => &self.client,
			Axis::Isp => &self.isp,
			Axis::Country => &self.country,
		}
	}

	pub fn set(&mut self, axis: Axis, selection: Selection) {
		match axis {
			Axis::Os => self.os = selection,
			Axis::Client => self.client = selection,
			Axis::Isp => self.isp = selection,
			Axis::Country => self.country = selection,
		}
	}

	pub fn is_unfiltered(&self) -> bool {
		Axis::ALL.iter().all(|&a| *self.get(a) == Selection::All)
	}

	pub fn matches(&self, node: &NodeSummary) -> bool {
		Axis::ALL
			.iter()
			.all(|&axis| self.get(axis).admits(axis, node.attribute(axis)))
	}

	/// Indices of `nodes` that pass, in input order.
	pub fn visible(&self, nodes: &[NodeSummary]) -> Vec<usize> {
		if self.is_unfiltered() {
			return (0..nodes.len()).collect();
		}
		nodes
			.iter()
			.enumerate()
			.filter(|(_, node)| self.matches(node))
			.map(|(i, _)| i)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(os: &str, client: &str, isp: &str, country: &str) -> NodeSummary {
		NodeSummary {
			node_id: format!("{os}-{client}-{isp}-{country}"),
			host: None,
			port: None,
			os: Some(os.into()),
			client: Some(client.into()),
			country: Some(country.into()),
			isp: Some(isp.into()),
			latitude: None,
			longitude: None,
			status: None,
			created_at: None,
		}
	}

	fn sample() -> Vec<NodeSummary> {
		vec![
			node("Linux-amd64", "Geth/v1.14.0", "Amazon.com, Inc.", "United States"),
			node("windows", "Nethermind/1.25", "Hetzner Online GmbH", "Germany"),
			node("darwin-arm64", "besu/v24", "Huawei Cloud", "China"),
			node("plan9", "lighthouse", "Comcast", "United States"),
		]
	}

	fn filter(os: &str, client: &str, isp: &str, country: &str) -> MarkerFilter {
		MarkerFilter {
			os: Selection::parse(os),
			client: Selection::parse(client),
			isp: Selection::parse(isp),
			country: Selection::parse(country),
		}
	}

	#[test]
	fn all_everywhere_keeps_everything() {
		let nodes = sample();
		let f = MarkerFilter::default();
		assert!(f.is_unfiltered());
		assert_eq!(f.visible(&nodes), [0, 1, 2, 3]);
	}

	#[test]
	fn conflicting_axis_excludes() {
		let nodes = sample();
		// Windows OS never matches the linux node, whatever else matches.
		let f = filter("Windows", "Geth", "AWS", "United States");
		assert!(!f.matches(&nodes[0]));
		assert_eq!(f.visible(&nodes), Vec::<usize>::new());
	}

	#[test]
	fn matching_is_case_insensitive_substring() {
		let nodes = sample();
		assert_eq!(filter("Linux", ALL, ALL, ALL).visible(&nodes), [0]);
		assert_eq!(filter(ALL, "Besu", ALL, ALL).visible(&nodes), [2]);
		assert_eq!(filter(ALL, ALL, "AWS", ALL).visible(&nodes), [0]);
	}

	#[test]
	fn all_of_rules_need_every_needle() {
		let nodes = vec![
			node("linux", "geth", "Huawei Technologies", "China"),
			node("linux", "geth", "Huawei Cloud Service", "China"),
		];
		assert_eq!(filter(ALL, ALL, "Huawei", ALL).visible(&nodes), [1]);
		assert_eq!(filter(ALL, ALL, OTHERS, ALL).visible(&nodes), [0]);
	}

	#[test]
	fn others_is_the_complement_of_named_buckets() {
		let nodes = sample();
		assert_eq!(filter(OTHERS, ALL, ALL, ALL).visible(&nodes), [3]);
		assert_eq!(filter(ALL, OTHERS, ALL, ALL).visible(&nodes), [3]);
		assert_eq!(filter(ALL, ALL, OTHERS, ALL).visible(&nodes), [3]);
	}

	#[test]
	fn country_is_exact() {
		let nodes = sample();
		assert_eq!(filter(ALL, ALL, ALL, "United States").visible(&nodes), [0, 3]);
		assert_eq!(filter(ALL, ALL, ALL, "united states").visible(&nodes), Vec::<usize>::new());
	}

	#[test]
	fn unknown_label_behaves_like_all() {
		let nodes = sample();
		assert_eq!(filter("Solaris", ALL, ALL, ALL).visible(&nodes), [0, 1, 2, 3]);
	}

	#[test]
	fn null_attributes_fall_into_others() {
		let mut bare = node("", "", "", "");
		bare.os = None;
		assert!(filter(OTHERS, OTHERS, OTHERS, ALL).matches(&bare));
		assert!(!filter("Linux", ALL, ALL, ALL).matches(&bare));
	}

	#[test]
	fn options_end_with_others() {
		let os = options(Axis::Os, &[]);
		assert_eq!(os.first().map(String::as_str), Some("Linux"));
		assert_eq!(os.last().map(String::as_str), Some(OTHERS));

		let countries = vec!["Germany".to_string()];
		assert_eq!(options(Axis::Country, &countries), countries);
	}
}
