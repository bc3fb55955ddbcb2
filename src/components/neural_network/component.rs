use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::accumulator::ActivationState;
use super::config::NetworkConfig;
use super::render;
use super::state::{NeuralNetworkState, SceneEvent};

/// Host callbacks plus the teardown flag they are checked against.
#[derive(Clone)]
struct Hooks {
	on_complete: Option<Callback<()>>,
	on_activation_change: Option<Callback<ActivationState>>,
	disposed: Arc<AtomicBool>,
}

impl Hooks {
	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Relaxed)
	}

	fn dispatch(&self, events: Vec<SceneEvent>) {
		for event in events {
			// The owner may already be gone; never call into it.
			if self.is_disposed() {
				return;
			}
			match event {
				SceneEvent::ActivationChanged(state) => {
					if let Some(cb) = self.on_activation_change {
						cb.run(state);
					}
				}
				SceneEvent::Completed => {
					if let Some(cb) = self.on_complete {
						cb.run(());
					}
				}
			}
		}
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()
		.map_err(JsValue::from)
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	// `ElementExt::style` from the leptos prelude shadows the DOM accessor.
	let _ = HtmlElement::style(canvas).set_property("cursor", cursor);
}

type StateSlot = RefCell<Option<NeuralNetworkState>>;
type ResizeSlot = RefCell<Option<Closure<dyn FnMut()>>>;

/// Drops the session and unhooks the resize listener. Safe to call twice.
fn release(state: &StateSlot, resize_cb: &ResizeSlot) {
	if let Some(mut s) = state.borrow_mut().take() {
		s.dispose();
	}
	if let Some(cb) = resize_cb.borrow_mut().take() {
		if let Some(window) = web_sys::window() {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
}

#[component]
pub fn NeuralNetworkCanvas(
	#[prop(optional)] config: Option<NetworkConfig>,
	#[prop(optional, into)] on_complete: Option<Callback<()>>,
	#[prop(optional, into)] on_activation_change: Option<Callback<ActivationState>>,
	/// Completes the animation immediately once it reads true.
	#[prop(optional, into)]
	skip: Option<Signal<bool>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<StateSlot> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<ResizeSlot> = Rc::new(RefCell::new(None));
	let hooks = Hooks {
		on_complete,
		on_activation_change,
		disposed: Arc::new(AtomicBool::new(false)),
	};

	let disposed = hooks.disposed.clone();
	on_cleanup(move || disposed.store(true, Ordering::Relaxed));

	let (state_init, animate_init, resize_cb_init, hooks_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), hooks.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			warn!("No window; neural network canvas disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(err) => {
				warn!("Failed to acquire canvas context: {err:?}");
				return;
			}
		};
		*state_init.borrow_mut() = Some(NeuralNetworkState::new(config.clone(), w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, resize_anim, hooks_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			hooks_init.clone(),
		);
		let mut last_ts: Option<f64> = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |ts: f64| {
			if hooks_anim.is_disposed() {
				release(&state_anim, &resize_anim);
				// The loop closure owns a handle to its own slot. It cannot be
				// dropped while running, so the slot is emptied on the next task.
				let slot = animate_inner.clone();
				set_timeout(move || drop(slot.borrow_mut().take()), Duration::ZERO);
				return;
			}
			let dt = last_ts.map_or(0.0, |prev| (ts - prev) / 1000.0);
			last_ts = Some(ts);

			let events = match *state_anim.borrow_mut() {
				Some(ref mut s) => {
					let events = s.tick(dt);
					render::render(s, &ctx);
					events
				}
				None => Vec::new(),
			};
			hooks_anim.dispatch(events);

			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	if let Some(skip) = skip {
		let (state_skip, hooks_skip) = (state.clone(), hooks.clone());
		Effect::new(move |_| {
			if !skip.get() {
				return;
			}
			let event = state_skip.borrow_mut().as_mut().and_then(|s| s.skip());
			hooks_skip.dispatch(event.into_iter().collect());
		});
	}

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if s.node_at_position(x, y).is_none() {
				s.camera.begin_orbit(&mut s.orbit, x, y);
				set_cursor(&canvas, "grabbing");
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.orbit.active {
				s.camera.orbit_to(&s.orbit, x, y);
				return;
			}
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
			set_cursor(&canvas, if hovered.is_some() { "pointer" } else { "grab" });
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.orbit.active = false;
		}
		if let Some(canvas) = canvas_ref.get() {
			set_cursor(&canvas, "grab");
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.orbit.active = false;
			s.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-network-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use super::*;

	fn counting_hooks(completed: &Arc<AtomicUsize>, changed: &Arc<AtomicUsize>) -> Hooks {
		let (completed, changed) = (completed.clone(), changed.clone());
		Hooks {
			on_complete: Some(Callback::new(move |_: ()| {
				completed.fetch_add(1, Ordering::Relaxed);
			})),
			on_activation_change: Some(Callback::new(move |_: ActivationState| {
				changed.fetch_add(1, Ordering::Relaxed);
			})),
			disposed: Arc::new(AtomicBool::new(false)),
		}
	}

	#[test]
	fn dispatch_reaches_host_until_disposed() {
		let owner = Owner::new();
		owner.with(|| {
			let completed = Arc::new(AtomicUsize::new(0));
			let changed = Arc::new(AtomicUsize::new(0));
			let hooks = counting_hooks(&completed, &changed);

			hooks.dispatch(vec![
				SceneEvent::ActivationChanged(ActivationState::default()),
				SceneEvent::Completed,
			]);
			assert_eq!(changed.load(Ordering::Relaxed), 1);
			assert_eq!(completed.load(Ordering::Relaxed), 1);

			hooks.disposed.store(true, Ordering::Relaxed);
			hooks.dispatch(vec![
				SceneEvent::ActivationChanged(ActivationState::default()),
				SceneEvent::Completed,
			]);
			assert_eq!(changed.load(Ordering::Relaxed), 1);
			assert_eq!(completed.load(Ordering::Relaxed), 1);
		});
	}

	#[test]
	fn dispatch_without_callbacks_is_a_no_op() {
		let hooks = Hooks {
			on_complete: None,
			on_activation_change: None,
			disposed: Arc::new(AtomicBool::new(false)),
		};
		hooks.dispatch(vec![SceneEvent::Completed]);
		assert!(!hooks.is_disposed());
	}

	#[test]
	fn release_drops_the_session_once() {
		let state: StateSlot = RefCell::new(Some(NeuralNetworkState::new(
			NetworkConfig::default(),
			800.0,
			600.0,
		)));
		let resize_cb: ResizeSlot = RefCell::new(None);

		release(&state, &resize_cb);
		assert!(state.borrow().is_none());
		release(&state, &resize_cb);
		assert!(state.borrow().is_none());
	}
}
