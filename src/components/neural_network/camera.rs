use std::f64::consts::PI;

use super::types::Position;

const NEAR: f64 = 0.1;
const MAX_PITCH: f64 = 85.0 * PI / 180.0;

/// A world point mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
	/// Distance from the camera along the view axis.
	pub depth: f64,
}

/// Perspective camera orbiting the origin. Zoom and pan are fixed.
#[derive(Clone, Debug)]
pub struct Camera {
	pub distance: f64,
	pub fov: f64,
	pub yaw: f64,
	pub pitch: f64,
	pub width: f64,
	pub height: f64,
}

#[derive(Clone, Debug, Default)]
pub struct OrbitState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub yaw_start: f64,
	pub pitch_start: f64,
}

impl Camera {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			distance: 15.0,
			fov: 60.0 * PI / 180.0,
			yaw: 0.0,
			pitch: 0.0,
			width,
			height,
		}
	}

	fn focal(&self) -> f64 {
		(self.height / 2.0) / (self.fov / 2.0).tan()
	}

	pub fn project(&self, p: Position) -> Option<Projected> {
		let (sy, cy) = self.yaw.sin_cos();
		let (sp, cp) = self.pitch.sin_cos();
		// world -> view: undo yaw about Y, then pitch about X
		let x = p.x * cy - p.z * sy;
		let z = p.x * sy + p.z * cy;
		let y = p.y * cp - z * sp;
		let z = p.y * sp + z * cp;

		let depth = self.distance - z;
		if depth < NEAR {
			return None;
		}
		let scale = self.focal() / depth;
		Some(Projected {
			x: self.width / 2.0 + x * scale,
			y: self.height / 2.0 - y * scale,
			scale,
			depth,
		})
	}

	pub fn begin_orbit(&self, orbit: &mut OrbitState, sx: f64, sy: f64) {
		*orbit = OrbitState {
			active: true,
			start_x: sx,
			start_y: sy,
			yaw_start: self.yaw,
			pitch_start: self.pitch,
		};
	}

	/// A drag across the full canvas height turns the view once around.
	pub fn orbit_to(&mut self, orbit: &OrbitState, sx: f64, sy: f64) {
		if !orbit.active || self.height <= 0.0 {
			return;
		}
		let per_px = 2.0 * PI / self.height;
		self.yaw = orbit.yaw_start - (sx - orbit.start_x) * per_px;
		self.pitch =
			(orbit.pitch_start - (sy - orbit.start_y) * per_px).clamp(-MAX_PITCH, MAX_PITCH);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
