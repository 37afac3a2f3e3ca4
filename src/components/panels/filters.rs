use leptos::prelude::*;

use crate::api::Axis;
use crate::filter::{self, Selection, ALL};
use crate::state::use_dashboard_state;

#[component]
fn AxisSelect(axis: Axis) -> impl IntoView {
	let state = use_dashboard_state();
	let countries = state.countries();
	let pending = state.pending_filter();

	let options = move || {
		countries.with(|c| filter::options(axis, c))
			.into_iter()
			.map(|value| {
				let selected = {
					let value = value.clone();
					move || pending.with(|f| f.get(axis).value() == value)
				};
				view! { <option value=value.clone() prop:selected=selected>{value.clone()}</option> }
			})
			.collect_view()
	};

	view! {
		<label class="filter">
			<span>{axis.title()}</span>
			<select
				name=axis.slug()
				on:change=move |ev| state.set_filter(axis, Selection::parse(&event_target_value(&ev)))
			>
				<option value=ALL>"All"</option>
				{options}
			</select>
		</label>
	}
}

#[component]
pub fn FilterBar() -> impl IntoView {
	let state = use_dashboard_state();
	let visible = state.visible();
	let total = state.nodes();

	view! {
		<section class="panel filters">
			<h2>"Filters"</h2>
			{Axis::ALL.map(|axis| view! { <AxisSelect axis=axis /> }).into_iter().collect_view()}
			<button class="apply-filters" on:click=move |_| state.apply_filters()>
				"Apply filters"
			</button>
			<p class="muted">
				{move || format!("{} of {} nodes shown", visible.with(Vec::len), total.with(Vec::len))}
			</p>
		</section>
	}
}
