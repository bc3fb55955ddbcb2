/// A deferred task driven by the session clock instead of the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OneShotTimer {
	#[default]
	Idle,
	Pending {
		due_at: f64,
	},
	Fired,
	Cancelled,
}

impl OneShotTimer {
	/// Arms the timer. Only an idle timer can be armed.
	pub fn schedule(&mut self, now: f64, delay: f64) -> bool {
		if *self != OneShotTimer::Idle {
			return false;
		}
		*self = OneShotTimer::Pending {
			due_at: now + delay.max(0.0),
		};
		true
	}

	/// Returns true exactly once, on the first poll at or after the deadline.
	pub fn poll(&mut self, now: f64) -> bool {
		match *self {
			OneShotTimer::Pending { due_at } if now >= due_at => {
				*self = OneShotTimer::Fired;
				true
			}
			_ => false,
		}
	}

	pub fn cancel(&mut self) {
		if !matches!(self, OneShotTimer::Fired) {
			*self = OneShotTimer::Cancelled;
		}
	}
}
