use leptos::prelude::*;

use crate::components::chrome::Header;

pub mod graph;
pub mod map;
pub mod not_found;

/// Header plus an error boundary around the page body.
#[component]
fn Shell(title: &'static str, children: Children) -> impl IntoView {
	view! {
		<Header title=title />
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{children()}</ErrorBoundary>
	}
}
