//! Header, theme switch and graph legend shared by both dashboards.

use leptos::prelude::*;
use leptos_router::components::A;

use super::force_graph::group_color;
use crate::graph_model::Level;
use crate::state::use_dashboard_state;

#[component]
pub fn ThemeToggle() -> impl IntoView {
	let state = use_dashboard_state();
	let dark = state.dark_mode();

	view! {
		<button class="theme-toggle" on:click=move |_| state.toggle_theme()>
			{move || if dark.get() { "Light mode" } else { "Dark mode" }}
		</button>
	}
}

#[component]
pub fn Header(title: &'static str) -> impl IntoView {
	view! {
		<header class="app-header">
			<h1>{title}</h1>
			<nav>
				<A href="/">"Map"</A>
				<A href="/graph">"Graph"</A>
			</nav>
			<ThemeToggle />
		</header>
	}
}

#[component]
pub fn GraphLegend() -> impl IntoView {
	view! {
		<ul class="legend">
			{Level::ALL
				.map(|level| {
					view! {
						<li class="legend-item">
							<span class="legend-swatch" style:background-color=group_color(level.group())></span>
							{level.title()}
						</li>
					}
				})
				.into_iter()
				.collect_view()}
		</ul>
	}
}
