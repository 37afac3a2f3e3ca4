use futures::future::join_all;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use super::Shell;
use crate::api::{ApiClient, NodeRecord};
use crate::components::chrome::GraphLegend;
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::config::use_config;
use crate::graph_model::build_hierarchy;
use crate::refresh::Generation;
use crate::state::use_dashboard_state;

/// Checked countries, kept in the order of the full list.
fn toggle_country(all: &[String], chosen: &[String], country: &str, checked: bool) -> Vec<String> {
	all.iter()
		.filter(|c| {
			if c.as_str() == country {
				checked
			} else {
				chosen.contains(*c)
			}
		})
		.cloned()
		.collect()
}

/// Relationship records of every country that answered, in request order.
async fn fetch_records(client: &ApiClient, countries: &[String]) -> Vec<NodeRecord> {
	let results = join_all(countries.iter().map(|c| client.relationships(c))).await;
	countries
		.iter()
		.zip(results)
		.filter_map(|(country, result)| match result {
			Ok(records) => Some(records),
			Err(e) => {
				warn!("Skipping {country}: {e}");
				None
			}
		})
		.flatten()
		.collect()
}

/// Country to ISP to OS to client to node hierarchy of the selected countries.
#[component]
pub fn GraphPage() -> impl IntoView {
	let dark = use_dashboard_state().dark_mode();
	let client = ApiClient::new(&use_config());
	let countries = RwSignal::new(Vec::<String>::new());
	let chosen = RwSignal::new(Vec::<String>::new());
	let graph = RwSignal::new(GraphData::default());
	let generation = Generation::default();

	spawn_local({
		let client = client.clone();
		async move {
			match client.graph_countries().await {
				Ok(list) => {
					info!("{} countries available for the graph", list.len());
					countries.try_set(list);
				}
				Err(e) => warn!("Loading graph countries failed: {e}"),
			}
		}
	});

	Effect::new(move |_| {
		let selection = chosen.get();
		let ticket = generation.next();
		let (client, generation) = (client.clone(), generation.clone());
		spawn_local(async move {
			let records = fetch_records(&client, &selection).await;
			if generation.is_current(ticket) {
				graph.try_set(build_hierarchy(&records));
			} else {
				debug!("Dropping graph draw {ticket}, a newer one is pending");
			}
		});
	});

	let country_list = move || {
		countries
			.get()
			.into_iter()
			.map(|country| {
				let checked = {
					let country = country.clone();
					move || chosen.with(|c| c.contains(&country))
				};
				let on_change = {
					let country = country.clone();
					move |ev: leptos::ev::Event| {
						let checked = event_target_checked(&ev);
						let next = countries.with_untracked(|all| {
							chosen.with_untracked(|c| toggle_country(all, c, &country, checked))
						});
						chosen.set(next);
					}
				};
				view! {
					<label class="country-option">
						<input type="checkbox" prop:checked=checked on:change=on_change />
						{country}
					</label>
				}
			})
			.collect_view()
	};

	view! {
		<Shell title="Node graph">
			<div class="dashboard">
				<aside class="sidebar">
					<section class="panel countries">
						<h2>"Countries"</h2>
						{country_list}
					</section>
					<section class="panel">
						<h2>"Legend"</h2>
						<GraphLegend />
						<p class="muted">
							{move || graph.with(|g| format!("{} nodes, {} links", g.nodes.len(), g.links.len()))}
						</p>
					</section>
				</aside>
				<main class="graph-area">
					<ForceGraphCanvas data=graph dark=dark />
				</main>
			</div>
		</Shell>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn checking_keeps_list_order() {
		let all = names(&["BR", "DE", "FR", "US"]);
		let chosen = toggle_country(&all, &names(&["US"]), "DE", true);
		assert_eq!(chosen, names(&["DE", "US"]));
	}

	#[test]
	fn unchecking_removes_only_that_country() {
		let all = names(&["BR", "DE", "FR"]);
		let chosen = toggle_country(&all, &names(&["BR", "DE", "FR"]), "DE", false);
		assert_eq!(chosen, names(&["BR", "FR"]));
	}

	#[test]
	fn unknown_country_is_ignored() {
		let all = names(&["DE"]);
		assert!(toggle_country(&all, &[], "XX", true).is_empty());
	}
}
