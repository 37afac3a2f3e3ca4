use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{MapState, MARKER_RADIUS};

struct Palette {
	sea: &'static str,
	grid: &'static str,
	equator: &'static str,
	marker: &'static str,
	cluster: &'static str,
	text: &'static str,
}

const LIGHT: Palette = Palette {
	sea: "#e8eef7",
	grid: "rgba(80, 100, 140, 0.25)",
	equator: "rgba(80, 100, 140, 0.55)",
	marker: "rgba(0, 0, 255, 0.8)",
	cluster: "rgba(110, 204, 57, 0.75)",
	text: "#1a1a2e",
};

const DARK: Palette = Palette {
	sea: "#1a1a2e",
	grid: "rgba(100, 180, 255, 0.15)",
	equator: "rgba(100, 180, 255, 0.4)",
	marker: "rgba(100, 180, 255, 0.9)",
	cluster: "rgba(139, 147, 179, 0.85)",
	text: "#ededed",
};

pub fn render(state: &MapState, ctx: &CanvasRenderingContext2d, dark: bool) {
	let palette = if dark { &DARK } else { &LIGHT };
	ctx.set_fill_style_str(palette.sea);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_graticule(state, ctx, palette);
	draw_clusters(state, ctx, palette);
}

fn draw_graticule(state: &MapState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	ctx.set_line_width(1.0);

	for lon in (-180..=180).step_by(30) {
		let (x, top) = state.to_screen(90.0, lon as f64);
		let (_, bottom) = state.to_screen(-90.0, lon as f64);
		ctx.set_stroke_style_str(palette.grid);
		ctx.begin_path();
		ctx.move_to(x, top);
		ctx.line_to(x, bottom);
		ctx.stroke();
	}

	for lat in (-90..=90).step_by(30) {
		let (left, y) = state.to_screen(lat as f64, -180.0);
		let (right, _) = state.to_screen(lat as f64, 180.0);
		ctx.set_stroke_style_str(if lat == 0 { palette.equator } else { palette.grid });
		ctx.begin_path();
		ctx.move_to(left, y);
		ctx.line_to(right, y);
		ctx.stroke();
	}
}

fn draw_clusters(state: &MapState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("11px sans-serif");

	for (i, cluster) in state.clusters.iter().enumerate() {
		let hovered = state.hover == Some(i);
		let radius = cluster.radius() * if hovered { 1.25 } else { 1.0 };

		ctx.begin_path();
		let _ = ctx.arc(cluster.x, cluster.y, radius, 0.0, 2.0 * PI);
		match cluster.members.len() {
			1 => {
				ctx.set_fill_style_str(palette.marker);
				ctx.fill();
				if hovered {
					ctx.set_stroke_style_str(palette.text);
					ctx.set_line_width(1.5);
					ctx.stroke();
				}
			}
			n => {
				ctx.set_fill_style_str(palette.cluster);
				ctx.fill();
				ctx.set_fill_style_str(palette.text);
				let _ = ctx.fill_text(&n.to_string(), cluster.x, cluster.y);
			}
		}
	}

	if state.clusters.is_empty() && state.point_count() == 0 {
		ctx.set_fill_style_str(palette.text);
		ctx.set_font(&format!("{}px sans-serif", MARKER_RADIUS * 3.5));
		let _ = ctx.fill_text("No nodes to show", state.width / 2.0, state.height / 2.0);
	}
}
