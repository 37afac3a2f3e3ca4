use leptos::prelude::*;

use crate::api::NodeDetails;
use crate::state::use_dashboard_state;

fn row(name: &'static str, value: String) -> impl IntoView {
	view! {
		<p>
			<b>{name} ": "</b>
			{value}
		</p>
	}
}

fn or_dash(value: &Option<String>) -> String {
	value.clone().unwrap_or_else(|| "-".into())
}

fn render_details(d: NodeDetails) -> impl IntoView {
	let coords = d
		.coordinates()
		.map(|(lat, lon)| format!("{lat}, {lon}"))
		.unwrap_or_else(|| "-".into());
	let uptime = d
		.uptime_percent()
		.map(|u| format!("{u:.2}%"))
		.unwrap_or_else(|| "-".into());
	let port = d.port.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".into());

	view! {
		{row("Node ID", d.node_id.clone())}
		{row("Enode", d.enode())}
		{row("Host", or_dash(&d.host))}
		{row("Port", port)}
		{row("Client", or_dash(&d.client))}
		{row("Operating system", or_dash(&d.os))}
		{row("ISP", or_dash(&d.isp))}
		{row("Country", or_dash(&d.country))}
		{row("Coordinates", coords)}
		{row("Uptime", uptime)}
		{row("Added", or_dash(&d.created_at))}
	}
}

#[component]
pub fn NodeDetailsPanel() -> impl IntoView {
	let state = use_dashboard_state();
	let (details, selected) = (state.panels.details, state.selected());

	view! {
		<section class="panel node-details">
			<h2>"Node details"</h2>
			{move || match (selected.get(), details.get()) {
				(None, _) => view! { <p class="muted">"Click a marker to see its details."</p> }.into_any(),
				(Some(id), Some(d)) if d.node_id == id => render_details(d).into_any(),
				(Some(_), _) => view! { <p class="muted">"Loading…"</p> }.into_any(),
			}}
		</section>
	}
}
