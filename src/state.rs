//! Dashboard state shared through Leptos context.
//!
//! Components read through the accessors and change things only through the
//! update methods, so every mutation has a name.

use leptos::prelude::*;
use log::{error, info};

use crate::api::{Axis, LatestNode, NodeCount, NodeDetails, NodeSummary, StatRow};
use crate::filter::{MarkerFilter, Selection};

const THEME_KEY: &str = "dark-mode";

/// Values of the auxiliary panels, replaced wholesale on each refresh.
#[derive(Clone, Copy)]
pub struct PanelSignals {
	pub node_count: RwSignal<Option<NodeCount>>,
	pub latest: RwSignal<Vec<LatestNode>>,
	pub details: RwSignal<Option<NodeDetails>>,
	statistics: [RwSignal<Vec<StatRow>>; 4],
}

impl PanelSignals {
	fn new() -> Self {
		Self {
			node_count: RwSignal::new(None),
			latest: RwSignal::new(Vec::new()),
			details: RwSignal::new(None),
			statistics: std::array::from_fn(|_| RwSignal::new(Vec::new())),
		}
	}

	pub fn statistics(&self, axis: Axis) -> RwSignal<Vec<StatRow>> {
		self.statistics[axis_slot(axis)]
	}
}

fn axis_slot(axis: Axis) -> usize {
	match axis {
		Axis::Os => 0,
		Axis::Client => 1,
		Axis::Isp => 2,
		Axis::Country => 3,
	}
}

#[derive(Clone, Copy)]
pub struct DashboardState {
	dark_mode: RwSignal<bool>,
	nodes: RwSignal<Vec<NodeSummary>>,
	countries: RwSignal<Vec<String>>,
	pending: RwSignal<MarkerFilter>,
	applied: RwSignal<MarkerFilter>,
	selected: RwSignal<Option<String>>,
	pub panels: PanelSignals,
}

impl DashboardState {
	pub fn new() -> Self {
		Self {
			dark_mode: RwSignal::new(load_dark_mode()),
			nodes: RwSignal::new(Vec::new()),
			countries: RwSignal::new(Vec::new()),
			pending: RwSignal::new(MarkerFilter::default()),
			applied: RwSignal::new(MarkerFilter::default()),
			selected: RwSignal::new(None),
			panels: PanelSignals::new(),
		}
	}

	pub fn dark_mode(&self) -> Signal<bool> {
		self.dark_mode.into()
	}

	pub fn toggle_theme(&self) {
		let dark = !self.dark_mode.get_untracked();
		self.dark_mode.set(dark);
		store_dark_mode(dark);
		info!("Switched to {} theme", if dark { "dark" } else { "light" });
	}

	pub fn nodes(&self) -> Signal<Vec<NodeSummary>> {
		self.nodes.into()
	}

	pub fn replace_nodes(&self, nodes: Vec<NodeSummary>) {
		self.nodes.try_set(nodes);
	}

	pub fn countries(&self) -> Signal<Vec<String>> {
		self.countries.into()
	}

	pub fn replace_countries(&self, countries: Vec<String>) {
		self.countries.try_set(countries);
	}

	/// Dropdown state; only takes effect after [`Self::apply_filters`].
	pub fn pending_filter(&self) -> Signal<MarkerFilter> {
		self.pending.into()
	}

	pub fn set_filter(&self, axis: Axis, selection: Selection) {
		self.pending.update(|f| f.set(axis, selection));
	}

	pub fn apply_filters(&self) {
		let filter = self.pending.get_untracked();
		info!("Applying filter {filter:?}");
		self.applied.set(filter);
	}

	/// Indices into [`Self::nodes`] that pass the applied filter.
	pub fn visible(&self) -> Memo<Vec<usize>> {
		let (nodes, applied) = (self.nodes, self.applied);
		Memo::new(move |_| applied.with(|f| nodes.with(|n| f.visible(n))))
	}

	pub fn selected(&self) -> Signal<Option<String>> {
		self.selected.into()
	}

	pub fn select_node(&self, node_id: Option<String>) {
		self.selected.set(node_id);
	}
}

impl Default for DashboardState {
	fn default() -> Self {
		Self::new()
	}
}

pub fn provide_dashboard_state() -> DashboardState {
	let state = DashboardState::new();
	provide_context(state);
	state
}

pub fn use_dashboard_state() -> DashboardState {
	use_context::<DashboardState>().unwrap_or_else(provide_dashboard_state)
}

fn parse_dark_mode(stored: Option<&str>) -> bool {
	stored == Some("enabled")
}

fn storage() -> Option<web_sys::Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

fn load_dark_mode() -> bool {
	let stored = storage().and_then(|s| s.get_item(THEME_KEY).ok().flatten());
	parse_dark_mode(stored.as_deref())
}

fn store_dark_mode(dark: bool) {
	let Some(storage) = storage() else {
		error!("localStorage unavailable, theme not saved");
		return;
	};
	let value = if dark { "enabled" } else { "disabled" };
	if let Err(e) = storage.set_item(THEME_KEY, value) {
		error!("Saving theme failed: {e:?}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_enabled_means_dark() {
		assert!(parse_dark_mode(Some("enabled")));
		assert!(!parse_dark_mode(Some("disabled")));
		assert!(!parse_dark_mode(Some("true")));
		assert!(!parse_dark_mode(None));
	}

	#[test]
	fn statistics_slots_are_distinct() {
		let mut slots: Vec<usize> = Axis::ALL.iter().map(|&a| axis_slot(a)).collect();
		slots.sort_unstable();
		slots.dedup();
		assert_eq!(slots.len(), 4);
	}
}
