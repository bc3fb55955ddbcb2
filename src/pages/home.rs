use std::time::Duration;

use leptos::prelude::*;
use log::{debug, info, warn};

use crate::components::neural_network::{ActivationState, NeuralNetworkCanvas};

/// How long the intro runs before it can be skipped.
const SKIP_AFTER: Duration = Duration::from_secs(3);

const ACCENT: &str = "#7E3ACE";

/// Onboarding page: the interactive network with its title overlay.
#[component]
pub fn Home() -> impl IntoView {
	let (complete, set_complete) = signal(false);
	let (skip, set_skip) = signal(false);
	let (show_skip, set_show_skip) = signal(false);

	match set_timeout_with_handle(move || set_show_skip.set(true), SKIP_AFTER) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(err) => warn!("Failed to schedule skip button: {err:?}"),
	}

	let on_complete = move |_: ()| set_complete.set(true);
	let on_activation_change = move |state: ActivationState| {
		debug!(
			"{} interactions, {} nodes and {} edges active",
			state.interaction_count(),
			state.active_nodes().len(),
			state.active_edges().len()
		);
	};

	view! {
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
		}>

			<div
				class="fullscreen-graph"
				style="position: relative; width: 100vw; height: 100vh; overflow: hidden; background: #0D0D12; color: white;"
			>
				<NeuralNetworkCanvas
					fullscreen=true
					skip=skip
					on_complete=on_complete
					on_activation_change=on_activation_change
				/>
				<div
					class="graph-overlay"
					style="position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); text-align: center; pointer-events: none;"
				>
					<h1 style="font-size: 2.25rem; font-weight: bold; margin-bottom: 0.5rem;">"Cogniflow"</h1>
					<p class="subtitle" style="font-size: 0.875rem; color: #d1d5db;">
						"Shape your workflow - watch intelligence adapt"
					</p>
					<Show when=move || complete.get()>
						<button
							style=format!(
								"margin-top: 2rem; padding: 0.75rem 2rem; background: {ACCENT}; color: white; border: none; border-radius: 6px; pointer-events: auto; cursor: pointer;",
							)
							on:click=move |_| info!("Entering dashboard")
						>
							"Enter"
						</button>
					</Show>
				</div>

				<Show when=move || show_skip.get() && !complete.get()>
					<button
						style="position: absolute; bottom: 1rem; right: 1rem; font-size: 0.75rem; color: #9ca3af; background: none; border: none; cursor: pointer;"
						on:click=move |_| set_skip.set(true)
					>
						"Skip Animation"
					</button>
				</Show>

				<Show when=move || complete.get()>
					<div style="position: absolute; bottom: 2rem; left: 0; right: 0; display: flex; justify-content: center;">
						<div style="height: 4px; width: 12rem; background: #374151; border-radius: 9999px; overflow: hidden;">
							<div style=format!(
								"height: 100%; width: 100%; background: {ACCENT}; animation: pulse 2s ease-in-out infinite;",
							) />
						</div>
					</div>
				</Show>
			</div>
		</ErrorBoundary>
	}
}
