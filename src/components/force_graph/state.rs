use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;

const RING_SPACING: f64 = 80.0;

/// d3's category10, indexed by `group % 10`.
const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const HIT_RADIUS: f64 = 12.0;

pub fn group_color(group: u32) -> &'static str {
	COLORS[group as usize % COLORS.len()]
}

/// Drawn radius per tree depth; deeper nodes are smaller.
pub fn radius_for(group: u32) -> f64 {
	match group {
		1 => 12.0,
		2 => 9.0,
		3 => 7.5,
		4 => 6.5,
		5 => 5.5,
		_ => 4.0,
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub radius: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 250.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.85,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		// Seed each depth on its own ring so the layout starts close to a tree.
		let mut per_group: HashMap<u32, (usize, usize)> = HashMap::new();
		for node in &data.nodes {
			per_group.entry(node.group).or_default().1 += 1;
		}

		for node in &data.nodes {
			let color = node
				.color
				.clone()
				.unwrap_or_else(|| group_color(node.group).into());
			let (rank, count) = per_group
				.get_mut(&node.group)
				.map(|slot| {
					slot.0 += 1;
					(slot.0 - 1, slot.1)
				})
				.unwrap_or((0, 1));
			let angle = (rank as f64) * 2.0 * PI / count.max(1) as f64;
			let ring = RING_SPACING * node.group.saturating_sub(1) as f64;
			let (x, y) = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: node.group == 1,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color,
					radius: radius_for(node.group),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS.max(node.data.user_data.radius) {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Swaps in a new graph, keeping the current pan and zoom.
	pub fn replace_data(&mut self, data: &GraphData) {
		let transform = std::mem::take(&mut self.transform);
		*self = Self::new(data, self.width, self.height);
		self.transform = transform;
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{GraphLink, GraphNode};

	fn data() -> GraphData {
		let node = |id: &str, group| GraphNode {
			id: id.into(),
			label: Some(id.into()),
			color: None,
			group,
		};
		let link = |source: &str, target: &str| GraphLink {
			source: source.into(),
			target: target.into(),
		};
		GraphData {
			nodes: vec![node("World", 1), node("DE", 2), node("FR", 2)],
			links: vec![link("World", "DE"), link("World", "FR"), link("DE", "missing")],
		}
	}

	#[test]
	fn links_to_unknown_ids_are_dropped() {
		let state = ForceGraphState::new(&data(), 800.0, 600.0);
		assert_eq!(state.node_count(), 3);
		assert_eq!(state.edges.len(), 2);
	}

	#[test]
	fn root_is_anchored_at_origin() {
		let state = ForceGraphState::new(&data(), 800.0, 600.0);
		let mut root = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id == "World" {
				root = Some((node.x(), node.y(), node.data.is_anchor));
			}
		});
		assert_eq!(root, Some((0.0, 0.0, true)));
	}

	#[test]
	fn colors_follow_the_group() {
		assert_eq!(group_color(1), "#ff7f0e");
		assert_eq!(group_color(11), group_color(1));
		assert!(radius_for(1) > radius_for(6));
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		let mut root_idx = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id == "World" {
				root_idx = Some(node.index());
			}
		});
		state.set_hover(root_idx);
		assert_eq!(state.hover.neighbors.len(), 2);
		assert!(state.has_active_highlight());
	}

	#[test]
	fn replacing_data_keeps_the_view() {
		let mut state = ForceGraphState::new(&data(), 800.0, 600.0);
		state.transform.k = 2.5;
		state.replace_data(&GraphData::default());
		assert_eq!(state.transform.k, 2.5);
		assert_eq!(state.node_count(), 0);
	}
}
