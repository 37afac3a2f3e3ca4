//! Leptos client-side dashboards for the node network: a world map and a
//! hierarchy graph over the same API.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod filter;
mod graph_model;
mod pages;
mod refresh;
mod state;

// Top-Level pages
use crate::config::{ApiConfig, provide_config};
use crate::pages::graph::GraphPage;
use crate::pages::map::MapPage;
use crate::pages::not_found::NotFound;
use crate::state::provide_dashboard_state;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the two dashboards and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = ApiConfig::from_build_env();
	info!("Using {:?} API at {}", config.flavor, config.base_url);
	provide_config(config);

	let dark = provide_dashboard_state().dark_mode();
	let theme = move || if dark.get() { "dark" } else { "light" };

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme />

		// sets the document title
		<Title text="Node Atlas" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=MapPage />
				<Route path=path!("/graph") view=GraphPage />
			</Routes>
		</Router>
	}
}
