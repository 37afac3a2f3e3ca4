use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen_futures::JsFuture;

use crate::api::LatestNode;
use crate::state::use_dashboard_state;

const COPIED_FOR: Duration = Duration::from_secs(2);

async fn copy_to_clipboard(text: &str) -> bool {
	let Some(window) = web_sys::window() else {
		return false;
	};
	let promise = window.navigator().clipboard().write_text(text);
	match JsFuture::from(promise).await {
		Ok(_) => true,
		Err(e) => {
			warn!("Clipboard write failed: {e:?}");
			false
		}
	}
}

#[component]
fn LatestNodeItem(node: LatestNode) -> impl IntoView {
	let copied = RwSignal::new(false);
	let enode = node.enode();
	let on_copy = move |_| {
		let enode = enode.clone();
		spawn_local(async move {
			if copy_to_clipboard(&enode).await {
				copied.try_set(true);
				sleep(COPIED_FOR).await;
				copied.try_set(false);
			}
		});
	};

	view! {
		<li class="list-group-item">
			<span>
				"Country: " {node.country.clone().unwrap_or_default()} <br />
				"Client: " {node.client.clone().unwrap_or_default()} <br />
				"OS: " {node.os.clone().unwrap_or_default()}
			</span>
			<br />
			<span>
				"Enode: "
				<button class="copy-button" disabled=move || copied.get() on:click=on_copy>
					{move || if copied.get() { "Copied" } else { "Copy" }}
				</button>
			</span>
			<br />
			<span class="muted">{node.age()}</span>
		</li>
	}
}

#[component]
pub fn LatestNodesPanel() -> impl IntoView {
	let latest = use_dashboard_state().panels.latest;

	view! {
		<section class="panel latest-nodes">
			<h2>"Latest nodes"</h2>
			<ul class="list-group">
				{move || {
					latest
						.get()
						.into_iter()
						.map(|node| view! { <LatestNodeItem node=node /> })
						.collect_view()
				}}
			</ul>
		</section>
	}
}
