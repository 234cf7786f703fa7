use std::time::Duration;

use tokio::sync::oneshot;

use crate::types::{Notification, NotificationType, ToastId, ToastPhase};

/// Completes the response handed out when a toast was admitted.
pub type Resolver = oneshot::Sender<Option<String>>;

/// How a toast leaves the live view once its exit animation finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Removal {
	/// Leave the live view only.
	Hide,
	/// Informational timeout: leave the live view and resolve with no value.
	Expire,
	/// Leave both views and resolve with the given value.
	Close(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expiry {
	Dismiss,
	Hide,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AutoHide {
	pub(crate) remaining: Duration,
	pub(crate) on_expiry: Expiry,
}

impl AutoHide {
	pub(crate) fn for_notification(details: &Notification, info_timeout: Duration, auto_hide: Duration) -> Self {
		if details.kind == NotificationType::Information && !details.has_items() {
			Self {
				remaining: details.timeout.unwrap_or(info_timeout),
				on_expiry: Expiry::Dismiss,
			}
		} else {
			Self {
				remaining: auto_hide,
				on_expiry: Expiry::Hide,
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LivePhase {
	Adding,
	Normal,
	Removing { remaining: Duration, removal: Removal },
}

#[derive(Debug)]
pub(crate) struct LiveToast {
	pub(crate) phase: LivePhase,
	pub(crate) timer: Option<AutoHide>,
}

impl LiveToast {
	pub(crate) fn new(timer: AutoHide) -> Self {
		Self {
			phase: LivePhase::Adding,
			timer: Some(timer),
		}
	}

	pub(crate) fn phase(&self) -> ToastPhase {
		match self.phase {
			LivePhase::Adding => ToastPhase::Adding,
			LivePhase::Normal => ToastPhase::Normal,
			LivePhase::Removing { .. } => ToastPhase::Removing,
		}
	}

	pub(crate) fn is_removing(&self) -> bool {
		matches!(self.phase, LivePhase::Removing { .. })
	}

	/// Starts the exit animation. The auto-hide timer no longer applies.
	pub(crate) fn begin_removal(&mut self, removal: Removal, exit: Duration) {
		self.timer = None;
		self.phase = LivePhase::Removing {
			remaining: exit,
			removal,
		};
	}

	/// Advances the phase and timer by `delta`. Returns true if anything observable changed.
	pub(crate) fn update(&mut self, delta: Duration, exit: Duration) -> bool {
		let mut changed = false;
		if self.phase == LivePhase::Adding {
			self.phase = LivePhase::Normal;
			changed = true;
		}

		if let LivePhase::Removing { remaining, .. } = &mut self.phase {
			*remaining = remaining.saturating_sub(delta);
			return changed;
		}

		if let Some(timer) = self.timer.as_mut() {
			timer.remaining = timer.remaining.saturating_sub(delta);
			if timer.remaining.is_zero() {
				let removal = match timer.on_expiry {
					Expiry::Dismiss => Removal::Expire,
					Expiry::Hide => Removal::Hide,
				};
				self.begin_removal(removal, exit);
				changed = true;
			}
		}
		changed
	}

	/// Cuts a running exit animation short. Returns false if the toast is not leaving.
	pub(crate) fn skip_exit(&mut self) -> bool {
		match &mut self.phase {
			LivePhase::Removing { remaining, .. } => {
				*remaining = Duration::ZERO;
				true
			}
			_ => false,
		}
	}

	/// The pending removal once the exit animation has run out.
	pub(crate) fn finished_removal(&self) -> Option<&Removal> {
		match &self.phase {
			LivePhase::Removing { remaining, removal } if remaining.is_zero() => Some(removal),
			_ => None,
		}
	}
}

/// Presence of a toast in the live view.
#[derive(Debug)]
pub(crate) enum Live {
	/// Admitted in do-not-disturb mode.
	NeverShown,
	Present(LiveToast),
	/// Pushed out by newer toasts.
	Evicted,
	/// Dismissed by timeout, escape or hide.
	Hidden,
}

/// Presence of a toast in the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum History {
	Present { is_new: bool },
	Cleared,
}

/// One admitted notification with its live and history state.
#[derive(Debug)]
pub(crate) struct Toast {
	pub(crate) id: ToastId,
	pub(crate) details: Notification,
	pub(crate) live: Live,
	pub(crate) history: History,
	resolver: Option<Resolver>,
}

impl Toast {
	pub(crate) fn new(id: ToastId, details: Notification, live: Live, resolver: Option<Resolver>) -> Self {
		Self {
			id,
			details,
			live,
			history: History::Present { is_new: true },
			resolver,
		}
	}

	pub(crate) fn live(&self) -> Option<&LiveToast> {
		match &self.live {
			Live::Present(live) => Some(live),
			_ => None,
		}
	}

	pub(crate) fn live_mut(&mut self) -> Option<&mut LiveToast> {
		match &mut self.live {
			Live::Present(live) => Some(live),
			_ => None,
		}
	}

	pub(crate) fn is_live(&self) -> bool {
		self.live().is_some()
	}

	pub(crate) fn in_history(&self) -> bool {
		matches!(self.history, History::Present { .. })
	}

	pub(crate) fn is_new(&self) -> bool {
		self.history == History::Present { is_new: true }
	}

	pub(crate) fn is_pending(&self) -> bool {
		self.resolver.is_some()
	}

	/// Resolves the caller's response. Later calls are no-ops.
	pub(crate) fn resolve(&mut self, value: Option<String>) {
		if let Some(resolver) = self.resolver.take() {
			// The caller may have dropped its response; nothing to deliver then.
			let _ = resolver.send(value);
		}
	}
}
