//! Folds relationship records into the world → country → ISP → OS → client → node tree.

use std::collections::HashSet;

use crate::api::NodeRecord;
use crate::components::force_graph::{GraphData, GraphLink, GraphNode};

pub const ROOT_ID: &str = "World";

const LEAF_LABEL_CHARS: usize = 10;

/// Tree depth of a graph node; the discriminant is the render group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
	World = 1,
	Country = 2,
	Isp = 3,
	Os = 4,
	Client = 5,
	Node = 6,
}

impl Level {
	pub const ALL: [Level; 6] = [
		Level::World,
		Level::Country,
		Level::Isp,
		Level::Os,
		Level::Client,
		Level::Node,
	];

	pub fn group(self) -> u32 {
		self as u32
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::World => "World",
			Self::Country => "Country",
			Self::Isp => "ISP",
			Self::Os => "Operating System",
			Self::Client => "Client",
			Self::Node => "Node",
		}
	}
}

/// Builds a fresh tree from `records`; ids seen before are reused, never relinked.
pub fn build_hierarchy(records: &[NodeRecord]) -> GraphData {
	let mut builder = HierarchyBuilder::new();
	for record in records {
		builder.push(record);
	}
	builder.data
}

struct HierarchyBuilder {
	data: GraphData,
	seen: HashSet<String>,
}

impl HierarchyBuilder {
	fn new() -> Self {
		let mut builder = Self {
			data: GraphData::default(),
			seen: HashSet::new(),
		};
		builder.seen.insert(ROOT_ID.to_string());
		builder.data.nodes.push(GraphNode {
			id: ROOT_ID.to_string(),
			label: Some(ROOT_ID.to_string()),
			color: None,
			group: Level::World.group(),
		});
		builder
	}

	fn push(&mut self, record: &NodeRecord) {
		let country = record.c.name.clone();
		let isp = format!("{country}-{}", record.isp.name);
		let os = format!("{isp}-{}", record.os.name);
		let client = format!("{os}-{}", record.client.name);

		self.ensure(ROOT_ID, &country, &record.c.name, Level::Country);
		self.ensure(&country, &isp, &record.isp.name, Level::Isp);
		self.ensure(&isp, &os, &record.os.name, Level::Os);
		self.ensure(&os, &client, &record.client.name, Level::Client);
		self.ensure(&client, &record.n.id, &leaf_label(&record.n.id), Level::Node);
	}

	fn ensure(&mut self, parent: &str, id: &str, label: &str, level: Level) {
		if !self.seen.insert(id.to_string()) {
			return;
		}
		self.data.nodes.push(GraphNode {
			id: id.to_string(),
			label: Some(label.to_string()),
			color: None,
			group: level.group(),
		});
		self.data.links.push(GraphLink {
			source: parent.to_string(),
			target: id.to_string(),
		});
	}
}

// Node ids are 128 hex chars.
fn leaf_label(id: &str) -> String {
	match id.char_indices().nth(LEAF_LABEL_CHARS) {
		Some((cut, _)) => format!("{}…", &id[..cut]),
		None => id.to_string(),
	}
}
