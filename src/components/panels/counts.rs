use leptos::prelude::*;

use crate::state::use_dashboard_state;

#[component]
pub fn NodeCountPanel() -> impl IntoView {
	let count = use_dashboard_state().panels.node_count;

	view! {
		<section class="panel node-count">
			<h2>"Network"</h2>
			{move || match count.get() {
				Some(c) => {
					view! {
						<ul class="list-group">
							<li class="list-group-item">
								"Total nodes: " <strong>{c.nodes}</strong>
							</li>
							{c.countries.map(|n| view! { <li class="list-group-item">"Countries: " <strong>{n}</strong></li> })}
							{c.isps.map(|n| view! { <li class="list-group-item">"ISPs: " <strong>{n}</strong></li> })}
						</ul>
					}
						.into_any()
				}
				None => view! { <p class="muted">"Loading…"</p> }.into_any(),
			}}
		</section>
	}
}
