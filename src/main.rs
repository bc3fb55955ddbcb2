//! Browser entry point for the Cogniflow onboarding network.

use leptos::prelude::*;
use neural_network_canvas::{App, init_logging};

// Used by the library target only.
use console_error_panic_hook as _;
use console_log as _;
#[cfg(target_arch = "wasm32")]
use getrandom as _;
use leptos_meta as _;
use leptos_router as _;
use log as _;
use rand as _;
use wasm_bindgen as _;
use web_sys as _;

fn main() {
	init_logging();
	mount_to_body(App);
}
