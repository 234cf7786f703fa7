//! Toast bookkeeping for the live and history views.
//!
//! Each admitted notification is one [`Toast`] keyed by [`ToastId`]. The live
//! and history views are projections over that single map, so a toast can be
//! hidden from one view while still present in the other without any
//! cross-list search. Time only moves through [`ToastStore::advance`].

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, trace};

mod toast;

pub use toast::Resolver;
use toast::{AutoHide, History, Live, LiveToast, Removal, Toast};

use crate::settings::NotificationSettings;
use crate::types::{HistoryView, Notification, NotificationType, ToastId, ToastView};

/// Owns every admitted toast and drives their timers.
#[derive(Debug)]
pub struct ToastStore {
	toasts: BTreeMap<ToastId, Toast>,
	next_id: u64,
	settings: NotificationSettings,
}

impl Default for ToastStore {
	fn default() -> Self {
		Self::new(NotificationSettings::default())
	}
}

impl ToastStore {
	/// Creates an empty store. A zero `max_visible` is raised to one.
	pub fn new(mut settings: NotificationSettings) -> Self {
		settings.max_visible = settings.max_visible.max(1);
		Self {
			toasts: BTreeMap::new(),
			next_id: 0,
			settings,
		}
	}

	pub fn settings(&self) -> &NotificationSettings {
		&self.settings
	}

	/// Admits a notification into history and, unless suppressed, the live view.
	///
	/// In silent mode only errors go live. Admission past the live capacity
	/// evicts the oldest live toasts; evicted toasts stay in history and keep
	/// their response pending. An evicted toast that was already closing or
	/// expiring finishes that removal at once.
	pub fn admit(&mut self, details: Notification, silent: bool, resolver: Option<Resolver>) -> ToastId {
		let id = ToastId(self.next_id);
		self.next_id = self.next_id.wrapping_add(1);

		let shown = !silent || details.kind == NotificationType::Error;
		let live = if shown {
			let timer = AutoHide::for_notification(
				&details,
				self.settings.info_timeout,
				self.settings.auto_hide_timeout,
			);
			Live::Present(LiveToast::new(timer))
		} else {
			Live::NeverShown
		};
		debug!(toast = %id, kind = ?details.kind, live = shown, "notification admitted");
		self.toasts.insert(id, Toast::new(id, details, live, resolver));

		if shown {
			self.evict_overflow();
		}
		id
	}

	/// Starts hiding a live toast. History and the response are untouched.
	pub fn hide(&mut self, id: ToastId) -> bool {
		let exit = self.settings.exit_animation;
		let Some(live) = self.toasts.get_mut(&id).and_then(Toast::live_mut) else {
			return false;
		};
		if live.is_removing() {
			return false;
		}
		live.begin_removal(Removal::Hide, exit);
		trace!(toast = %id, "hiding");
		if exit.is_zero() {
			self.finish_removal(id);
		}
		true
	}

	/// Closes a toast and resolves its response with `value`.
	///
	/// A live toast animates out first unless `immediate` is set; otherwise the
	/// toast leaves both views at once.
	pub fn close(&mut self, id: ToastId, value: Option<String>, immediate: bool) -> bool {
		let exit = self.settings.exit_animation;
		let Some(toast) = self.toasts.get_mut(&id) else {
			return false;
		};
		if !immediate && !exit.is_zero() {
			if let Some(live) = toast.live_mut() {
				live.begin_removal(Removal::Close(value), exit);
				trace!(toast = %id, "closing");
				return true;
			}
		}
		self.remove_and_resolve(id, value);
		true
	}

	/// Advances every live toast by `delta`. Returns true if either view changed.
	pub fn advance(&mut self, delta: Duration) -> bool {
		let exit = self.settings.exit_animation;
		let mut changed = false;
		let mut finished = Vec::new();
		for (id, toast) in &mut self.toasts {
			let Some(live) = toast.live_mut() else {
				continue;
			};
			changed |= live.update(delta, exit);
			if live.finished_removal().is_some() {
				finished.push(*id);
			}
		}
		for id in finished {
			self.finish_removal(id);
			changed = true;
		}
		changed
	}

	/// Clears the new-flag of every history entry. Returns true if any was new.
	pub fn mark_seen(&mut self) -> bool {
		let mut changed = false;
		for toast in self.toasts.values_mut() {
			if toast.is_new() {
				toast.history = History::Present { is_new: false };
				changed = true;
			}
		}
		changed
	}

	/// Empties the history and resolves every pending response with no value.
	///
	/// Toasts still in the live view stay there until their own timers or the
	/// user remove them. Returns the number of cleared entries.
	pub fn clear_history(&mut self) -> usize {
		let mut cleared = 0;
		for toast in self.toasts.values_mut() {
			if toast.in_history() {
				toast.history = History::Cleared;
				toast.resolve(None);
				cleared += 1;
			}
		}
		self.toasts.retain(|_, toast| toast.is_live());
		debug!(cleared, "history cleared");
		cleared
	}

	/// Live toasts, newest first.
	pub fn live(&self) -> impl Iterator<Item = ToastView> + '_ {
		self.toasts.values().rev().filter_map(|toast| {
			toast.live().map(|live| ToastView {
				id: toast.id,
				notification: toast.details.clone(),
				phase: live.phase(),
			})
		})
	}

	/// History entries, newest first.
	pub fn history(&self) -> impl Iterator<Item = HistoryView> + '_ {
		self.toasts
			.values()
			.rev()
			.filter(|toast| toast.in_history())
			.map(|toast| HistoryView {
				id: toast.id,
				notification: toast.details.clone(),
				is_new: toast.is_new(),
			})
	}

	pub fn live_count(&self) -> usize {
		self.toasts.values().filter(|toast| toast.is_live()).count()
	}

	pub fn history_count(&self) -> usize {
		self.toasts.values().filter(|toast| toast.in_history()).count()
	}

	pub fn new_count(&self) -> usize {
		self.toasts.values().filter(|toast| toast.is_new()).count()
	}

	/// The newest live toast that is not already leaving.
	pub fn newest_live(&self) -> Option<ToastId> {
		self.toasts
			.values()
			.rev()
			.find(|toast| toast.live().is_some_and(|live| !live.is_removing()))
			.map(|toast| toast.id)
	}

	pub fn contains(&self, id: ToastId) -> bool {
		self.toasts.contains_key(&id)
	}

	/// Returns true while the toast's response has not been resolved.
	pub fn is_pending(&self, id: ToastId) -> bool {
		self.toasts.get(&id).is_some_and(Toast::is_pending)
	}

	fn evict_overflow(&mut self) {
		let overflow: Vec<ToastId> = self
			.toasts
			.values()
			.rev()
			.filter(|toast| toast.is_live())
			.skip(self.settings.max_visible)
			.map(|toast| toast.id)
			.collect();
		for id in overflow {
			let Some(toast) = self.toasts.get_mut(&id) else {
				continue;
			};
			// A toast already leaving completes its removal instead of losing it.
			if toast.live_mut().is_some_and(LiveToast::skip_exit) {
				self.finish_removal(id);
				continue;
			}
			toast.live = Live::Evicted;
			debug!(toast = %id, "evicted from live view");
		}
	}

	fn finish_removal(&mut self, id: ToastId) {
		let Some(removal) = self
			.toasts
			.get(&id)
			.and_then(Toast::live)
			.and_then(|live| live.finished_removal())
			.cloned()
		else {
			return;
		};

		let resolve = match removal {
			Removal::Close(value) => {
				self.remove_and_resolve(id, value);
				return;
			}
			Removal::Expire => true,
			Removal::Hide => false,
		};
		let Some(toast) = self.toasts.get_mut(&id) else {
			return;
		};
		toast.live = Live::Hidden;
		if resolve {
			toast.resolve(None);
		}
		trace!(toast = %id, "left live view");
		if !toast.in_history() {
			self.toasts.remove(&id);
		}
	}

	fn remove_and_resolve(&mut self, id: ToastId, value: Option<String>) {
		if let Some(mut toast) = self.toasts.remove(&id) {
			debug!(toast = %id, value = ?value, "notification closed");
			toast.resolve(value);
		}
	}
}
