//! Scoped registrations.

use std::sync::Weak;

use parking_lot::Mutex;

use crate::bus::Registry;

/// Identifies one registration on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// A resource released exactly once.
pub trait Disposable: Send {
	/// Releases the resource. Calling it again is a no-op.
	fn dispose(&mut self);
}

/// Guard for a bus registration.
///
/// The registration lives as long as the guard. The guard only holds a weak
/// reference to the bus, so it never keeps a torn-down bus alive.
#[must_use = "dropping a Subscription unregisters the handler"]
#[derive(Debug)]
pub struct Subscription {
	requisition: &'static str,
	id: Option<SubscriptionId>,
	registry: Weak<Mutex<Registry>>,
}

impl Subscription {
	pub(crate) fn new(requisition: &'static str, id: SubscriptionId, registry: Weak<Mutex<Registry>>) -> Self {
		Self {
			requisition,
			id: Some(id),
			registry,
		}
	}

	/// A guard that owns nothing, returned for duplicate registrations.
	pub(crate) fn inert(requisition: &'static str) -> Self {
		Self {
			requisition,
			id: None,
			registry: Weak::new(),
		}
	}

	/// Wire name of the requisition this guard belongs to.
	pub fn requisition(&self) -> &'static str {
		self.requisition
	}

	pub fn id(&self) -> Option<SubscriptionId> {
		self.id
	}

	/// Returns true while the registration is still present on a live bus.
	pub fn is_active(&self) -> bool {
		match (self.id, self.registry.upgrade()) {
			(Some(id), Some(registry)) => registry.lock().contains(self.requisition, id),
			_ => false,
		}
	}
}

impl Disposable for Subscription {
	fn dispose(&mut self) {
		let Some(id) = self.id.take() else {
			return;
		};
		if let Some(registry) = self.registry.upgrade() {
			let removed = registry.lock().remove(self.requisition, id);
			drop(removed);
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.dispose();
	}
}

/// Aggregate of disposables released together.
///
/// Components collect their registrations here on start and call
/// [`dispose_all`](Self::dispose_all) on stop. Dropping the store disposes
/// whatever is left.
#[derive(Default)]
pub struct DisposableStore {
	items: Vec<Box<dyn Disposable>>,
}

impl DisposableStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, item: impl Disposable + 'static) {
		self.items.push(Box::new(item));
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Disposes every held item in reverse acquisition order.
	pub fn dispose_all(&mut self) {
		while let Some(mut item) = self.items.pop() {
			item.dispose();
		}
	}
}

impl Drop for DisposableStore {
	fn drop(&mut self) {
		self.dispose_all();
	}
}

impl std::fmt::Debug for DisposableStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DisposableStore")
			.field("len", &self.items.len())
			.finish()
	}
}
