use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use super::Shell;
use crate::api::{ApiClient, ApiError, Axis};
use crate::components::node_map::NodeMapCanvas;
use crate::components::panels::{
	FilterBar, LatestNodesPanel, NodeCountPanel, NodeDetailsPanel, StatisticsPanel,
};
use crate::config::use_config;
use crate::refresh::{self, Panel, RefreshPlan};
use crate::state::{DashboardState, PanelSignals, use_dashboard_state};

async fn refresh_panel(client: ApiClient, panels: PanelSignals, panel: Panel) -> Result<(), ApiError> {
	match panel {
		Panel::NodeCount => {
			panels.node_count.try_set(Some(client.node_count().await?));
		}
		Panel::LatestNodes => {
			panels.latest.try_set(client.latest_nodes().await?);
		}
		Panel::Statistics(axis) => {
			panels.statistics(axis).try_set(client.statistics(axis).await?);
		}
	}
	Ok(())
}

async fn load_markers(client: ApiClient, state: DashboardState) -> Result<(), ApiError> {
	let nodes = client.nodes().await?;
	info!("Loaded {} nodes", nodes.len());
	state.replace_nodes(nodes);
	Ok(())
}

async fn load_countries(client: ApiClient, state: DashboardState) -> Result<(), ApiError> {
	state.replace_countries(client.values(Axis::Country).await?);
	Ok(())
}

async fn load_details(client: ApiClient, state: DashboardState, node_id: String) {
	match client.node_details(&node_id).await {
		Ok(details) => {
			let still_selected = state
				.selected()
				.try_with_untracked(|s| s.as_deref() == Some(node_id.as_str()))
				.unwrap_or(false);
			if still_selected {
				state.panels.details.try_set(Some(details));
			} else {
				debug!("Dropping details for {node_id}, selection moved on");
			}
		}
		Err(e) => warn!("Loading details for {node_id} failed: {e}"),
	}
}

/// World map of nodes with filters, statistics and the live panels.
#[component]
pub fn MapPage() -> impl IntoView {
	let state = use_dashboard_state();
	let config = use_config();
	let client = ApiClient::new(&config);

	spawn_local({
		let client = client.clone();
		async move {
			if let Err(e) = load_markers(client.clone(), state).await {
				warn!("Loading nodes failed: {e}");
			}
			if let Err(e) = load_countries(client, state).await {
				warn!("Loading countries failed: {e}");
			}
		}
	});

	let refreshing = refresh::start(&RefreshPlan::dashboard(config.refresh_interval), {
		let (client, panels) = (client.clone(), state.panels);
		move |panel| refresh_panel(client.clone(), panels, panel)
	});
	on_cleanup(move || refreshing.stop());

	let nodes = state.nodes();
	let on_select = Callback::new(move |index: usize| {
		let Some(node_id) = nodes.with_untracked(|n| n.get(index).map(|n| n.node_id.clone())) else {
			return;
		};
		state.select_node(Some(node_id.clone()));
		spawn_local(load_details(client.clone(), state, node_id));
	});

	view! {
		<Shell title="Node map">
			<div class="dashboard">
				<aside class="sidebar">
					<NodeCountPanel />
					<FilterBar />
					<NodeDetailsPanel />
					<LatestNodesPanel />
				</aside>
				<main class="map-area">
					<NodeMapCanvas
						nodes=nodes
						visible=state.visible()
						dark=state.dark_mode()
						on_select=on_select
					/>
				</main>
				<aside class="statistics">
					{Axis::ALL
						.map(|axis| view! { <StatisticsPanel axis=axis /> })
						.into_iter()
						.collect_view()}
				</aside>
			</div>
		</Shell>
	}
}
