use leptos::prelude::*;

use crate::api::Axis;
use crate::state::use_dashboard_state;

#[component]
pub fn StatisticsPanel(axis: Axis) -> impl IntoView {
	let rows = use_dashboard_state().panels.statistics(axis);

	view! {
		<section class=format!("panel statistics {}-statistics", axis.slug())>
			<h2>{axis.title()}</h2>
			<ul class="list-group">
				{move || {
					rows.get()
						.into_iter()
						.map(|row| {
							let pct = format!("{:.2}%", row.percentage);
							view! {
								<li class="list-group-item">
									<span>{row.label}</span>
									<span class="list-group-progress" style:width=pct.clone()></span>
									<span class="float-right text-muted">{pct}</span>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</section>
	}
}
