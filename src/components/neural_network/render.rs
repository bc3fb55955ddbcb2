use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::Camera;
use super::state::{Frame, NeuralNetworkState, NodeAttrs};

const BACKGROUND: &str = "#0D0D12";
const ACCENT: (u8, u8, u8) = (126, 58, 206);
const PARTICLE_SIZE: f64 = 0.1;
const KEYWORD_FONT_SIZE: f64 = 0.8;

fn accent(alpha: f64) -> String {
	let (r, g, b) = ACCENT;
	format!("rgba({r}, {g}, {b}, {alpha})")
}

pub fn render(state: &NeuralNetworkState, ctx: &CanvasRenderingContext2d) {
	let camera = &state.camera;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, camera.width, camera.height);

	let frame = state.frame();
	draw_edges(&frame, camera, ctx);
	draw_particles(&frame, camera, ctx);
	draw_nodes(&frame, camera, ctx);
	draw_keywords(&frame, camera, ctx);
}

fn draw_edges(frame: &Frame, camera: &Camera, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.0);
	for edge in &frame.edges {
		let (Some(a), Some(b)) = (camera.project(edge.start), camera.project(edge.end)) else {
			continue;
		};
		ctx.set_stroke_style_str(&accent(edge.opacity));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_particles(frame: &Frame, camera: &Camera, ctx: &CanvasRenderingContext2d) {
	for particle in frame.particles.iter().filter(|p| p.opacity > 0.0) {
		let Some(p) = camera.project(particle.position) else {
			continue;
		};
		let size = (PARTICLE_SIZE * p.scale).max(1.0);
		ctx.set_fill_style_str(&accent(particle.opacity));
		ctx.fill_rect(p.x - size / 2.0, p.y - size / 2.0, size, size);
	}
}

fn draw_nodes(frame: &Frame, camera: &Camera, ctx: &CanvasRenderingContext2d) {
	// back to front
	let mut visible: Vec<_> = frame
		.nodes
		.iter()
		.filter_map(|n| camera.project(n.position).map(|p| (n, p)))
		.collect();
	visible.sort_by(|(_, a), (_, b)| b.depth.total_cmp(&a.depth));

	for (node, p) in visible {
		let radius = node.size * p.scale;
		if radius < 0.5 {
			continue;
		}
		draw_glow(node, p.x, p.y, radius, ctx);

		// The highlight circles the sphere as the node spins.
		let (rx, ry) = node.rotation;
		let (hx, hy) = (p.x + radius * 0.35 * ry.cos(), p.y - radius * 0.35 * rx.sin().abs());
		let Ok(gradient) = ctx.create_radial_gradient(hx, hy, radius * 0.1, p.x, p.y, radius) else {
			continue;
		};
		let _ = gradient.add_color_stop(0.0, &format!("rgba(220, 190, 255, {})", node.opacity));
		let _ = gradient.add_color_stop(1.0, &accent(node.opacity));
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}
}

fn draw_glow(node: &NodeAttrs, x: f64, y: f64, radius: f64, ctx: &CanvasRenderingContext2d) {
	let glow_radius = radius * (1.0 + node.emissive);
	let alpha = 0.12 * node.emissive * node.opacity;
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, glow_radius) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &accent(alpha));
	let _ = gradient.add_color_stop(1.0, &accent(0.0));
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_keywords(frame: &Frame, camera: &Camera, ctx: &CanvasRenderingContext2d) {
	if frame.keywords.is_empty() {
		return;
	}
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for keyword in &frame.keywords {
		let Some(p) = camera.project(keyword.position) else {
			continue;
		};
		ctx.set_font(&format!("600 {}px sans-serif", KEYWORD_FONT_SIZE * p.scale));
		ctx.set_fill_style_str(&accent(keyword.opacity));
		let _ = ctx.fill_text(keyword.text, p.x, p.y);
	}
}
