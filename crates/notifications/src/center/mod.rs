//! The notification center service.
//!
//! [`NotificationCenter`] is a cheap clonable handle over shared state. All
//! mutations go through one lock, so the live view, the history and the
//! status bar item always change together.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use shellgui_requisitions::{
	DisposableStore, Requisition, RequisitionBus, ShowError, ShowInfo, ShowWarning,
	StatusBarButtonClick, StatusBarClick, Subscription,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::response::NotificationResponse;
use crate::settings::NotificationSettings;
use crate::status::{
	SHOW_HISTORY_COMMAND, StatusBar, StatusBarItem, StatusBarItemSpec, StatusSummary,
	history_caption,
};
use crate::store::ToastStore;
use crate::types::{HistoryView, Notification, NotificationType, ToastId, ToastView};

/// Process-level options of the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CenterOptions {
	/// Running inside a host that shows notifications itself. Show requests
	/// are forwarded to the host first and no status bar item is created.
	pub embedded: bool,
}

struct CenterState {
	store: ToastStore,
	show_history: bool,
	silent: bool,
	status_item: Option<Box<dyn StatusBarItem>>,
}

impl CenterState {
	fn summary(&self) -> StatusSummary {
		StatusSummary::project(
			self.store.history_count(),
			self.store.new_count(),
			self.silent,
			self.show_history,
		)
	}

	fn refresh_status(&mut self) {
		let summary = self.summary();
		if let Some(item) = self.status_item.as_mut() {
			item.set_text(summary.text);
			item.set_tooltip(&summary.tooltip);
		}
	}
}

#[derive(Default)]
struct Lifecycle {
	subscriptions: DisposableStore,
	driver: Option<CancellationToken>,
}

impl Lifecycle {
	fn release(&mut self) {
		let mut subscriptions = std::mem::take(&mut self.subscriptions);
		subscriptions.dispose_all();
		if let Some(driver) = self.driver.take() {
			driver.cancel();
		}
	}
}

struct CenterInner {
	state: Mutex<CenterState>,
	lifecycle: Mutex<Lifecycle>,
	options: CenterOptions,
}

impl Drop for CenterInner {
	fn drop(&mut self) {
		self.lifecycle.get_mut().release();
		if let Some(mut item) = self.state.get_mut().status_item.take() {
			item.dispose();
		}
	}
}

/// Shows toasts, keeps their history and answers show requests from the bus.
#[derive(Clone)]
pub struct NotificationCenter {
	inner: Arc<CenterInner>,
}

impl Default for NotificationCenter {
	fn default() -> Self {
		Self::new(NotificationSettings::default(), CenterOptions::default())
	}
}

impl std::fmt::Debug for NotificationCenter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("NotificationCenter")
			.field("live", &state.store.live_count())
			.field("history", &state.store.history_count())
			.field("show_history", &state.show_history)
			.field("silent", &state.silent)
			.field("embedded", &self.inner.options.embedded)
			.finish()
	}
}

impl NotificationCenter {
	pub fn new(settings: NotificationSettings, options: CenterOptions) -> Self {
		Self {
			inner: Arc::new(CenterInner {
				state: Mutex::new(CenterState {
					store: ToastStore::new(settings),
					show_history: false,
					silent: false,
					status_item: None,
				}),
				lifecycle: Mutex::new(Lifecycle::default()),
				options,
			}),
		}
	}

	fn from_inner(inner: Arc<CenterInner>) -> Self {
		Self { inner }
	}

	pub fn options(&self) -> CenterOptions {
		self.inner.options
	}

	/// Admits a notification and returns a handle to the user's answer.
	pub fn show_notification(&self, details: Notification) -> NotificationResponse {
		let (resolver, receiver) = oneshot::channel();
		let mut state = self.inner.state.lock();
		let silent = state.silent;
		let id = state.store.admit(details, silent, Some(resolver));
		state.refresh_status();
		NotificationResponse::new(id, receiver)
	}

	pub fn show_info(&self, text: impl Into<String>) -> NotificationResponse {
		self.show_notification(Notification::info(text))
	}

	pub fn show_warning(&self, text: impl Into<String>) -> NotificationResponse {
		self.show_notification(Notification::warning(text))
	}

	pub fn show_error(&self, text: impl Into<String>) -> NotificationResponse {
		self.show_notification(Notification::error(text))
	}

	/// Opens or closes the history view. Opening it marks every entry as seen.
	pub fn toggle_history(&self) -> bool {
		let mut state = self.inner.state.lock();
		if !state.show_history {
			state.store.mark_seen();
		}
		state.show_history = !state.show_history;
		state.refresh_status();
		trace!(shown = state.show_history, "history toggled");
		state.show_history
	}

	/// Empties the history; pending responses resolve with `None`.
	pub fn clear_history(&self) -> usize {
		let mut state = self.inner.state.lock();
		let cleared = state.store.clear_history();
		state.refresh_status();
		cleared
	}

	/// Flips do-not-disturb mode and returns the new value.
	pub fn toggle_silent_mode(&self) -> bool {
		let mut state = self.inner.state.lock();
		state.silent = !state.silent;
		state.refresh_status();
		debug!(silent = state.silent, "do-not-disturb toggled");
		state.silent
	}

	pub fn set_silent(&self, silent: bool) {
		let mut state = self.inner.state.lock();
		if state.silent != silent {
			state.silent = silent;
			state.refresh_status();
		}
	}

	/// Closes a toast via its close button; the response resolves with `None`.
	pub fn close_toast(&self, id: ToastId) -> bool {
		self.finish(id, None)
	}

	/// Closes a toast via one of its action buttons.
	pub fn click_item(&self, id: ToastId, label: impl Into<String>) -> bool {
		self.finish(id, Some(label.into()))
	}

	fn finish(&self, id: ToastId, value: Option<String>) -> bool {
		let mut state = self.inner.state.lock();
		let immediate = state.show_history;
		let closed = state.store.close(id, value, immediate);
		if closed {
			state.refresh_status();
		}
		closed
	}

	/// Escape closes the history view if open, otherwise hides the newest live toast.
	pub fn handle_escape(&self) -> bool {
		let mut state = self.inner.state.lock();
		if state.show_history {
			state.show_history = false;
			state.refresh_status();
			return true;
		}
		match state.store.newest_live() {
			Some(id) => state.store.hide(id),
			None => false,
		}
	}

	/// Moves the center's clock forward.
	pub fn advance(&self, delta: Duration) -> bool {
		let mut state = self.inner.state.lock();
		let changed = state.store.advance(delta);
		if changed {
			state.refresh_status();
		}
		changed
	}

	pub fn live_toasts(&self) -> Vec<ToastView> {
		self.inner.state.lock().store.live().collect()
	}

	pub fn history(&self) -> Vec<HistoryView> {
		self.inner.state.lock().store.history().collect()
	}

	pub fn is_silent(&self) -> bool {
		self.inner.state.lock().silent
	}

	pub fn is_history_shown(&self) -> bool {
		self.inner.state.lock().show_history
	}

	pub fn status(&self) -> StatusSummary {
		self.inner.state.lock().summary()
	}

	pub fn history_caption(&self) -> String {
		let state = self.inner.state.lock();
		history_caption(state.store.history_count(), state.store.new_count())
	}

	/// Subscribes the center to `bus` and, outside embedded mode, creates the bell item.
	///
	/// Starting an already started center is a no-op.
	pub fn start(&self, bus: &RequisitionBus, status_bar: Option<&dyn StatusBar>) {
		{
			let mut lifecycle = self.inner.lifecycle.lock();
			if !lifecycle.subscriptions.is_empty() {
				warn!("notification center already started");
				return;
			}
			lifecycle.subscriptions.add(self.subscribe_toggle(bus));
			lifecycle
				.subscriptions
				.add(self.subscribe_show::<ShowInfo>(bus, NotificationType::Information));
			lifecycle
				.subscriptions
				.add(self.subscribe_show::<ShowWarning>(bus, NotificationType::Warning));
			lifecycle
				.subscriptions
				.add(self.subscribe_show::<ShowError>(bus, NotificationType::Error));
		}

		if !self.inner.options.embedded
			&& let Some(bar) = status_bar
		{
			let item = bar.create_item(StatusBarItemSpec::notifications());
			let mut state = self.inner.state.lock();
			state.status_item = Some(item);
			state.refresh_status();
		}
		debug!(embedded = self.inner.options.embedded, "notification center started");
	}

	/// Drops every bus registration, stops the driver and removes the bell item.
	pub fn stop(&self) {
		self.inner.lifecycle.lock().release();
		let item = self.inner.state.lock().status_item.take();
		if let Some(mut item) = item {
			item.dispose();
		}
		debug!("notification center stopped");
	}

	/// Runs the center's clock on the tokio runtime until [`stop`](Self::stop)
	/// or the last handle is dropped. Replaces a previously spawned driver.
	pub fn spawn_driver(&self) -> JoinHandle<()> {
		let token = CancellationToken::new();
		if let Some(previous) = self.inner.lifecycle.lock().driver.replace(token.clone()) {
			previous.cancel();
		}
		let period = self
			.inner
			.state
			.lock()
			.store
			.settings()
			.tick_interval
			.max(Duration::from_millis(1));
		let center = Arc::downgrade(&self.inner);

		tokio::spawn(async move {
			let mut ticks = tokio::time::interval(period);
			ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
			let mut last = Instant::now();
			loop {
				tokio::select! {
					biased;
					_ = token.cancelled() => break,
					_ = ticks.tick() => {
						let Some(inner) = center.upgrade() else {
							break;
						};
						let now = Instant::now();
						NotificationCenter::from_inner(inner).advance(now - last);
						last = now;
					}
				}
			}
			trace!("notification driver stopped");
		})
	}

	fn subscribe_toggle(&self, bus: &RequisitionBus) -> Subscription {
		let center = Arc::downgrade(&self.inner);
		bus.register::<StatusBarButtonClick, _, _>(move |click: StatusBarClick| {
			let handled = click.kind == SHOW_HISTORY_COMMAND
				&& upgrade(&center).map(|center| center.toggle_history()).is_some();
			async move { Ok(handled) }
		})
	}

	fn subscribe_show<R>(&self, bus: &RequisitionBus, kind: NotificationType) -> Subscription
	where
		R: Requisition<Payload = String>,
	{
		let center = Arc::downgrade(&self.inner);
		let host = bus.downgrade();
		let embedded = self.inner.options.embedded;
		bus.register::<R, _, _>(move |text: String| {
			let forwarded =
				embedded && host.upgrade().is_some_and(|bus| bus.execute_remote::<R>(&text));
			let response = if forwarded {
				trace!(requisition = R::NAME, "forwarded to host");
				None
			} else {
				upgrade(&center).map(|center| center.show_notification(Notification::new(kind, text)))
			};
			async move {
				if forwarded {
					return Ok(true);
				}
				match response {
					Some(response) => {
						response.await;
						Ok(true)
					}
					None => Ok(false),
				}
			}
		})
	}
}

fn upgrade(center: &Weak<CenterInner>) -> Option<NotificationCenter> {
	center.upgrade().map(NotificationCenter::from_inner)
}
