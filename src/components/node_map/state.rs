use std::collections::BTreeMap;

use crate::api::NodeSummary;

pub const CLUSTER_CELL: f64 = 40.0;
pub const MARKER_RADIUS: f64 = 4.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 64.0;
const CLICK_SLOP: f64 = 4.0;

/// A node with a position, `index` points into the dashboard node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
	pub index: usize,
	pub lat: f64,
	pub lon: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
	pub x: f64,
	pub y: f64,
	pub members: Vec<usize>,
}

impl Cluster {
	pub fn radius(&self) -> f64 {
		match self.members.len() {
			0 | 1 => MARKER_RADIUS,
			n => 10.0 + 2.0 * (n as f64).log2(),
		}
	}

	pub fn single(&self) -> Option<usize> {
		match self.members.as_slice() {
			[only] => Some(*only),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What a released pointer amounted to.
#[derive(Clone, Debug, PartialEq)]
pub enum Release {
	None,
	Select(usize),
	ZoomedIn,
	/// A cluster no zoom level can split. The first member is the one to
	/// select; clicking the same stack again moves on to the next.
	Choose(Vec<usize>),
}

pub struct MapState {
	points: Vec<MapPoint>,
	pub clusters: Vec<Cluster>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub dirty: bool,
	stack: Option<(Vec<usize>, usize)>,
}

impl MapState {
	pub fn new(width: f64, height: f64) -> Self {
		let mut state = Self {
			points: Vec::new(),
			clusters: Vec::new(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			dirty: true,
			stack: None,
		};
		state.reset_view();
		state
	}

	/// Whole world fitted to the width, centred vertically.
	pub fn reset_view(&mut self) {
		self.transform = ViewTransform {
			x: 0.0,
			y: (self.height - self.width / 2.0) / 2.0,
			k: MIN_ZOOM,
		};
		self.recluster();
	}

	/// Keeps the nodes in `visible` that have coordinates.
	pub fn set_points(&mut self, nodes: &[NodeSummary], visible: &[usize]) {
		self.points = visible
			.iter()
			.filter_map(|&index| {
				let (lat, lon) = nodes.get(index)?.coordinates()?;
				Some(MapPoint { index, lat, lon })
			})
			.collect();
		self.hover = None;
		self.recluster();
	}

	pub fn point_count(&self) -> usize {
		self.points.len()
	}

	/// Equirectangular projection at zoom 1, in canvas pixels.
	pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
		let world = self.width;
		(
			(lon.clamp(-180.0, 180.0) + 180.0) / 360.0 * world,
			(90.0 - lat.clamp(-90.0, 90.0)) / 180.0 * world / 2.0,
		)
	}

	pub fn to_screen(&self, lat: f64, lon: f64) -> (f64, f64) {
		let (wx, wy) = self.project(lat, lon);
		(
			wx * self.transform.k + self.transform.x,
			wy * self.transform.k + self.transform.y,
		)
	}

	/// Buckets on-screen points into a `CLUSTER_CELL` grid.
	pub fn recluster(&mut self) {
		let mut cells: BTreeMap<(i64, i64), (f64, f64, Vec<usize>)> = BTreeMap::new();
		let margin = CLUSTER_CELL;

		for p in &self.points {
			let (sx, sy) = self.to_screen(p.lat, p.lon);
			if sx < -margin || sy < -margin || sx > self.width + margin || sy > self.height + margin {
				continue;
			}
			let key = (
				(sx / CLUSTER_CELL).floor() as i64,
				(sy / CLUSTER_CELL).floor() as i64,
			);
			let cell = cells.entry(key).or_insert((0.0, 0.0, Vec::new()));
			cell.0 += sx;
			cell.1 += sy;
			cell.2.push(p.index);
		}

		self.clusters = cells
			.into_values()
			.map(|(sum_x, sum_y, members)| {
				let n = members.len() as f64;
				Cluster {
					x: sum_x / n,
					y: sum_y / n,
					members,
				}
			})
			.collect();
		self.hover = None;
		self.dirty = true;
	}

	pub fn cluster_at(&self, sx: f64, sy: f64) -> Option<usize> {
		self.clusters.iter().position(|c| {
			let (dx, dy) = (c.x - sx, c.y - sy);
			(dx * dx + dy * dy).sqrt() <= c.radius() + 3.0
		})
	}

	pub fn set_hover(&mut self, cluster: Option<usize>) {
		if self.hover != cluster {
			self.hover = cluster;
			self.dirty = true;
		}
	}

	/// Zooms by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.recluster();
	}

	pub fn press(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			let hovered = self.cluster_at(sx, sy);
			self.set_hover(hovered);
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if !self.pan.moved && dx.hypot(dy) < CLICK_SLOP {
			return;
		}
		self.pan.moved = true;
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
		self.recluster();
	}

	/// Ends a press. A press that did not move is a click on whatever is under it.
	pub fn release(&mut self, sx: f64, sy: f64) -> Release {
		let was_click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		if !was_click {
			return Release::None;
		}
		let Some(hit) = self.cluster_at(sx, sy) else {
			return Release::None;
		};
		let cluster = &self.clusters[hit];
		if let Some(index) = cluster.single() {
			self.stack = None;
			return Release::Select(index);
		}
		if self.transform.k >= MAX_ZOOM || self.co_located(&cluster.members) {
			let members = cluster.members.clone();
			return Release::Choose(self.next_in_stack(members));
		}
		let (cx, cy) = (cluster.x, cluster.y);
		self.stack = None;
		self.zoom_at(cx, cy, 2.0);
		Release::ZoomedIn
	}

	/// Whether every member sits on exactly the same coordinates.
	fn co_located(&self, members: &[usize]) -> bool {
		let mut coords = self
			.points
			.iter()
			.filter(|p| members.contains(&p.index))
			.map(|p| (p.lat, p.lon));
		match coords.next() {
			Some(first) => coords.all(|c| c == first),
			None => false,
		}
	}

	/// Rotates `members` so repeated clicks on one stack walk through it.
	fn next_in_stack(&mut self, mut members: Vec<usize>) -> Vec<usize> {
		let turn = match &self.stack {
			Some((last, turn)) if *last == members => (turn + 1) % members.len(),
			_ => 0,
		};
		self.stack = Some((members.clone(), turn));
		members.rotate_left(turn);
		members
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.recluster();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(id: &str, lat: f64, lon: f64) -> NodeSummary {
		NodeSummary {
			node_id: id.into(),
			host: None,
			port: None,
			os: None,
			client: None,
			country: None,
			isp: None,
			latitude: Some(lat),
			longitude: Some(lon),
			status: None,
			created_at: None,
		}
	}

	fn state_with(nodes: &[NodeSummary]) -> MapState {
		let mut state = MapState::new(720.0, 360.0);
		let all: Vec<usize> = (0..nodes.len()).collect();
		state.set_points(nodes, &all);
		state
	}

	#[test]
	fn projection_corners() {
		let state = MapState::new(720.0, 360.0);
		assert_eq!(state.project(90.0, -180.0), (0.0, 0.0));
		assert_eq!(state.project(-90.0, 180.0), (720.0, 360.0));
		assert_eq!(state.to_screen(0.0, 0.0), (360.0, 180.0));
	}

	#[test]
	fn nearby_nodes_share_a_cluster() {
		let nodes = [at("a", 50.1, 8.6), at("b", 50.2, 8.7), at("c", -33.9, 151.2)];
		let state = state_with(&nodes);
		assert_eq!(state.clusters.len(), 2);
		let sizes: Vec<usize> = state.clusters.iter().map(|c| c.members.len()).collect();
		assert!(sizes.contains(&2));
		assert!(sizes.contains(&1));
	}

	#[test]
	fn nodes_without_coordinates_or_hidden_are_skipped() {
		let mut nowhere = at("x", 0.0, 0.0);
		nowhere.latitude = None;
		let nodes = [at("a", 10.0, 10.0), nowhere, at("b", -10.0, -10.0)];
		let mut state = MapState::new(720.0, 360.0);
		state.set_points(&nodes, &[0, 1]);
		assert_eq!(state.point_count(), 1);
	}

	#[test]
	fn zoom_splits_clusters_and_is_clamped() {
		let nodes = [at("a", 50.1, 8.6), at("b", 50.9, 9.9)];
		let mut state = state_with(&nodes);
		assert_eq!(state.clusters.len(), 1);

		let (cx, cy) = (state.clusters[0].x, state.clusters[0].y);
		state.zoom_at(cx, cy, 32.0);
		assert_eq!(state.clusters.len(), 2);

		state.zoom_at(cx, cy, 1000.0);
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.zoom_at(cx, cy, 0.0001);
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn click_on_single_marker_selects_it() {
		let nodes = [at("a", 0.0, 0.0)];
		let mut state = state_with(&nodes);
		let (x, y) = (state.clusters[0].x, state.clusters[0].y);
		state.press(x, y);
		assert_eq!(state.release(x, y), Release::Select(0));
	}

	#[test]
	fn click_on_cluster_zooms_in() {
		let nodes = [at("a", 0.0, 0.0), at("b", 0.1, 0.1)];
		let mut state = state_with(&nodes);
		let (x, y) = (state.clusters[0].x, state.clusters[0].y);
		state.press(x, y);
		assert_eq!(state.release(x, y), Release::ZoomedIn);
		assert_eq!(state.transform.k, 2.0);
	}

	#[test]
	fn clicks_on_a_stack_walk_through_its_members() {
		let nodes = [at("a", 50.1109, 8.6821), at("b", 50.1109, 8.6821)];
		let mut state = state_with(&nodes);
		assert_eq!(state.clusters.len(), 1);
		let (x, y) = (state.clusters[0].x, state.clusters[0].y);

		state.press(x, y);
		assert_eq!(state.release(x, y), Release::Choose(vec![0, 1]));
		assert_eq!(state.transform.k, MIN_ZOOM);

		state.press(x, y);
		assert_eq!(state.release(x, y), Release::Choose(vec![1, 0]));
		state.press(x, y);
		assert_eq!(state.release(x, y), Release::Choose(vec![0, 1]));
	}

	#[test]
	fn unsplittable_cluster_at_max_zoom_offers_its_members() {
		let nodes = [at("a", 12.5, 12.5), at("b", 12.5001, 12.5001)];
		let mut state = state_with(&nodes);
		let (x, y) = (state.clusters[0].x, state.clusters[0].y);
		state.zoom_at(x, y, MAX_ZOOM);
		assert_eq!(state.clusters.len(), 1);

		let (x, y) = (state.clusters[0].x, state.clusters[0].y);
		state.press(x, y);
		assert_eq!(state.release(x, y), Release::Choose(vec![0, 1]));
	}

	#[test]
	fn drag_pans_instead_of_clicking() {
		let nodes = [at("a", 0.0, 0.0)];
		let mut state = state_with(&nodes);
		let (x, y) = (state.clusters[0].x, state.clusters[0].y);
		state.press(x, y);
		state.drag(x + 50.0, y);
		assert_eq!(state.release(x + 50.0, y), Release::None);
		assert_eq!(state.transform.x, 50.0);
	}
}
