//! Periodic re-fetch of the volatile dashboard panels.
//!
//! Every panel runs its own loop: fetch once on start, then sleep and fetch
//! again. A failed fetch is logged and the panel keeps its last value; the
//! other loops never see it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::future::sleep;
use leptos::task::spawn_local;
use log::{debug, warn};

use crate::api::{ApiError, Axis};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
	NodeCount,
	LatestNodes,
	Statistics(Axis),
}

impl fmt::Display for Panel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NodeCount => f.write_str("node count"),
			Self::LatestNodes => f.write_str("latest nodes"),
			Self::Statistics(axis) => write!(f, "{} statistics", axis.slug()),
		}
	}
}

/// Which panels refresh, and how often.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshPlan {
	entries: Vec<(Panel, Duration)>,
}

impl RefreshPlan {
	/// Counts, latest nodes and the four statistics tables on one interval.
	pub fn dashboard(every: Duration) -> Self {
		let mut entries = vec![(Panel::NodeCount, every), (Panel::LatestNodes, every)];
		entries.extend(Axis::ALL.map(|axis| (Panel::Statistics(axis), every)));
		Self { entries }
	}

	pub fn entries(&self) -> &[(Panel, Duration)] {
		&self.entries
	}
}

/// Shared stop flag for the loops started from one plan.
#[derive(Clone, Debug, Default)]
pub struct RefreshHandle(Arc<AtomicBool>);

impl RefreshHandle {
	pub fn stop(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_stopped(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// Ticket counter for requests whose late results must be dropped.
///
/// Each draw takes a ticket with [`Generation::next`]; by the time its
/// responses arrive only the newest ticket is still current.
#[derive(Clone, Debug, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
	pub fn next(&self) -> u64 {
		self.0.fetch_add(1, Ordering::Relaxed) + 1
	}

	pub fn is_current(&self, ticket: u64) -> bool {
		self.0.load(Ordering::Relaxed) == ticket
	}
}

/// Starts one loop per plan entry. `tick` builds the fetch for a panel.
pub fn start<F, Fut>(plan: &RefreshPlan, tick: F) -> RefreshHandle
where
	F: Fn(Panel) -> Fut + Clone + 'static,
	Fut: Future<Output = Result<(), ApiError>> + 'static,
{
	let handle = RefreshHandle::default();
	for panel_loop in panel_loops(plan, &handle, tick, sleep) {
		spawn_local(panel_loop);
	}
	handle
}

/// The loops behind [`start`], with the wait between ticks supplied by `pause`.
fn panel_loops<F, Fut, P, PFut>(
	plan: &RefreshPlan,
	handle: &RefreshHandle,
	tick: F,
	pause: P,
) -> Vec<LocalBoxFuture<'static, ()>>
where
	F: Fn(Panel) -> Fut + Clone + 'static,
	Fut: Future<Output = Result<(), ApiError>> + 'static,
	P: Fn(Duration) -> PFut + Clone + 'static,
	PFut: Future<Output = ()> + 'static,
{
	plan.entries()
		.iter()
		.map(|&(panel, every)| {
			let (handle, tick, pause) = (handle.clone(), tick.clone(), pause.clone());
			async move {
				while !handle.is_stopped() {
					if let Err(e) = tick(panel).await {
						warn!("Refreshing {panel} failed: {e}");
					}
					pause(every).await;
				}
				debug!("Stopped refreshing {panel}");
			}
			.boxed_local()
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::future::poll_fn;
	use std::rc::Rc;
	use std::task::Poll;

	use futures::executor::LocalPool;
	use futures::task::LocalSpawnExt;

	use super::*;

	/// Gives the other loops a turn, standing in for the timer.
	async fn yield_once() {
		let mut yielded = false;
		poll_fn(|cx| {
			if yielded {
				Poll::Ready(())
			} else {
				yielded = true;
				cx.waker().wake_by_ref();
				Poll::Pending
			}
		})
		.await
	}

	fn run(
		plan: &RefreshPlan,
		handle: &RefreshHandle,
		failures: Rc<Cell<u32>>,
		healthy: Rc<Cell<u32>>,
		stop_after: u32,
	) {
		let tick = move |panel: Panel| {
			let (failures, healthy) = (failures.clone(), healthy.clone());
			async move {
				if panel == Panel::NodeCount {
					failures.set(failures.get() + 1);
					Err(ApiError::Status {
						url: "/nodes/count".into(),
						status: 500,
					})
				} else {
					healthy.set(healthy.get() + 1);
					Ok(())
				}
			}
		};
		let pauses = Rc::new(Cell::new(0));
		let pause = {
			let handle = handle.clone();
			move |_: Duration| {
				pauses.set(pauses.get() + 1);
				if pauses.get() >= stop_after {
					handle.stop();
				}
				yield_once()
			}
		};

		let mut pool = LocalPool::new();
		let spawner = pool.spawner();
		for panel_loop in panel_loops(plan, handle, tick, pause) {
			spawner.spawn_local(panel_loop).expect("spawn refresh loop");
		}
		// Returns only once every loop has exited.
		pool.run();
	}

	fn two_panel_plan() -> RefreshPlan {
		RefreshPlan {
			entries: vec![
				(Panel::NodeCount, Duration::from_secs(30)),
				(Panel::LatestNodes, Duration::from_secs(30)),
			],
		}
	}

	#[test]
	fn dashboard_plan_covers_every_panel_once() {
		let plan = RefreshPlan::dashboard(Duration::from_secs(30));
		let panels: Vec<Panel> = plan.entries().iter().map(|(p, _)| *p).collect();
		assert_eq!(
			panels,
			[
				Panel::NodeCount,
				Panel::LatestNodes,
				Panel::Statistics(Axis::Os),
				Panel::Statistics(Axis::Client),
				Panel::Statistics(Axis::Isp),
				Panel::Statistics(Axis::Country),
			]
		);
		assert!(
			plan.entries()
				.iter()
				.all(|(_, every)| *every == Duration::from_secs(30))
		);
	}

	#[test]
	fn handle_clones_share_the_flag() {
		let handle = RefreshHandle::default();
		let clone = handle.clone();
		assert!(!clone.is_stopped());
		handle.stop();
		assert!(clone.is_stopped());
	}

	#[test]
	fn only_the_newest_ticket_is_current() {
		let generation = Generation::default();
		let first = generation.next();
		assert!(generation.is_current(first));
		let second = generation.clone().next();
		assert!(!generation.is_current(first));
		assert!(generation.is_current(second));
	}

	#[test]
	fn failing_panel_does_not_stall_the_others() {
		let (failures, healthy) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
		let handle = RefreshHandle::default();
		run(&two_panel_plan(), &handle, failures.clone(), healthy.clone(), 10);

		assert!(handle.is_stopped());
		assert!(failures.get() >= 4, "failing panel ticked {} times", failures.get());
		assert!(healthy.get() >= 4, "healthy panel ticked {} times", healthy.get());
		assert!(healthy.get().abs_diff(failures.get()) <= 1);
	}

	#[test]
	fn stopped_handle_ends_every_loop_without_ticking() {
		let (failures, healthy) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
		let handle = RefreshHandle::default();
		handle.stop();
		run(
			&RefreshPlan::dashboard(Duration::from_secs(30)),
			&handle,
			failures.clone(),
			healthy.clone(),
			1,
		);
		assert_eq!((failures.get(), healthy.get()), (0, 0));
	}

	#[test]
	fn no_tick_after_stop() {
		let (failures, healthy) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
		let handle = RefreshHandle::default();
		run(&two_panel_plan(), &handle, failures.clone(), healthy.clone(), 1);
		// The first pause stops the plan; each loop ticks at most once before seeing it.
		assert_eq!(failures.get(), 1);
		assert!(healthy.get() <= 1);
	}

	#[test]
	fn panel_names() {
		assert_eq!(Panel::Statistics(Axis::Isp).to_string(), "isp statistics");
		assert_eq!(Panel::LatestNodes.to_string(), "latest nodes");
	}
}
