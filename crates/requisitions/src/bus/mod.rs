//! The requisition registry and dispatcher.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{RequisitionError, Result};
use crate::job::JobEntry;
use crate::remote::{EmbeddedMessage, MessageSource, RemoteTarget};
use crate::requisition::Requisition;
use crate::subscription::{Subscription, SubscriptionId};

#[cfg(test)]
mod tests;

/// Future returned by a subscriber. Resolves to whether the request was handled.
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<bool>>;

/// Shared subscriber reference. The reference itself is the registration identity.
pub type Handler<P> = Arc<dyn Fn(P) -> HandlerFuture + Send + Sync>;

/// Payload-erased subscriber stored in the registry.
type ErasedHandler = Arc<dyn Fn(&dyn Any) -> HandlerFuture + Send + Sync>;

/// Decodes a host payload into the payload type of a requisition.
type Decoder = fn(Value) -> std::result::Result<Box<dyn Any + Send>, serde_json::Error>;

#[derive(Clone)]
pub(crate) struct Entry {
	id: SubscriptionId,
	/// Address of the shared handler for identity-deduplicated registrations.
	identity: Option<usize>,
	invoke: ErasedHandler,
}

struct Slot {
	decode: Decoder,
	entries: Vec<Entry>,
}

/// Subscriber table, keyed by requisition wire name.
#[derive(Default)]
pub(crate) struct Registry {
	slots: HashMap<&'static str, Slot>,
	next_id: u64,
}

impl Registry {
	/// Appends an entry. Returns `None` if `identity` is already registered.
	fn insert(
		&mut self,
		name: &'static str,
		decode: Decoder,
		identity: Option<usize>,
		invoke: ErasedHandler,
	) -> Option<SubscriptionId> {
		let slot = self.slots.entry(name).or_insert_with(|| Slot {
			decode,
			entries: Vec::new(),
		});
		if identity.is_some() && slot.entries.iter().any(|e| e.identity == identity) {
			return None;
		}

		self.next_id = self.next_id.wrapping_add(1);
		let id = SubscriptionId(self.next_id);
		slot.entries.push(Entry { id, identity, invoke });
		Some(id)
	}

	/// Takes an entry out of the table.
	///
	/// The entry is returned so callers can drop the handler after releasing
	/// the registry lock; a handler may own guards that re-enter the registry.
	pub(crate) fn remove(&mut self, name: &str, id: SubscriptionId) -> Option<Entry> {
		let slot = self.slots.get_mut(name)?;
		let index = slot.entries.iter().position(|e| e.id == id)?;
		let entry = slot.entries.remove(index);
		if slot.entries.is_empty() {
			self.slots.remove(name);
		}
		Some(entry)
	}

	pub(crate) fn contains(&self, name: &str, id: SubscriptionId) -> bool {
		self.slots
			.get(name)
			.is_some_and(|slot| slot.entries.iter().any(|e| e.id == id))
	}

	fn count(&self, name: &str) -> usize {
		self.slots.get(name).map_or(0, |slot| slot.entries.len())
	}

	fn snapshot(&self, name: &str) -> Vec<ErasedHandler> {
		self.slots
			.get(name)
			.map(|slot| slot.entries.iter().map(|e| Arc::clone(&e.invoke)).collect())
			.unwrap_or_default()
	}

	fn decoder(&self, name: &str) -> Option<Decoder> {
		self.slots.get(name).map(|slot| slot.decode)
	}
}

struct BusInner {
	registry: Arc<Mutex<Registry>>,
	source: MessageSource,
	remote: Option<Arc<dyn RemoteTarget>>,
}

/// Publish/subscribe dispatcher for requisitions.
///
/// Cloning is cheap and yields a handle to the same registry. Separate
/// [`RequisitionBus::new`] calls produce independent buses.
#[derive(Clone)]
pub struct RequisitionBus {
	inner: Arc<BusInner>,
}

/// Non-owning bus handle for subscribers that need to reach the bus.
#[derive(Clone)]
pub struct WeakRequisitionBus {
	inner: Weak<BusInner>,
}

impl WeakRequisitionBus {
	pub fn upgrade(&self) -> Option<RequisitionBus> {
		self.inner.upgrade().map(|inner| RequisitionBus { inner })
	}
}

impl Default for RequisitionBus {
	fn default() -> Self {
		Self::new()
	}
}

impl RequisitionBus {
	/// Creates a standalone bus with no host.
	pub fn new() -> Self {
		Self::build(MessageSource::App, None)
	}

	/// Creates a bus that forwards remote requisitions to `target`.
	pub fn with_remote(source: MessageSource, target: Arc<dyn RemoteTarget>) -> Self {
		Self::build(source, Some(target))
	}

	fn build(source: MessageSource, remote: Option<Arc<dyn RemoteTarget>>) -> Self {
		Self {
			inner: Arc::new(BusInner {
				registry: Arc::new(Mutex::new(Registry::default())),
				source,
				remote,
			}),
		}
	}

	pub fn downgrade(&self) -> WeakRequisitionBus {
		WeakRequisitionBus {
			inner: Arc::downgrade(&self.inner),
		}
	}

	/// Which side of the host boundary this bus represents.
	pub fn source(&self) -> MessageSource {
		self.inner.source
	}

	/// Returns true if a host target is configured.
	pub fn has_remote(&self) -> bool {
		self.inner.remote.is_some()
	}

	/// Subscribes `callback` to requisition `R`.
	///
	/// Subscribers are invoked in registration order.
	pub fn register<R, F, Fut>(&self, callback: F) -> Subscription
	where
		R: Requisition,
		F: Fn(R::Payload) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
	{
		let invoke = erase::<R, _>(move |payload| callback(payload).boxed());
		self.insert::<R>(None, invoke)
	}

	/// Subscribes a shared handler to requisition `R`.
	///
	/// Registering the same handler reference twice for one requisition does
	/// not add a second entry; the returned guard is inert.
	pub fn register_handler<R: Requisition>(&self, handler: Handler<R::Payload>) -> Subscription {
		let identity = Arc::as_ptr(&handler) as *const () as usize;
		let invoke = erase::<R, _>(move |payload| handler(payload));
		self.insert::<R>(Some(identity), invoke)
	}

	fn insert<R: Requisition>(&self, identity: Option<usize>, invoke: ErasedHandler) -> Subscription {
		let inserted = self
			.inner
			.registry
			.lock()
			.insert(R::NAME, decode_payload::<R>, identity, invoke);
		match inserted {
			Some(id) => {
				trace!(requisition = R::NAME, id = id.0, "registered");
				Subscription::new(R::NAME, id, Arc::downgrade(&self.inner.registry))
			}
			None => {
				debug!(requisition = R::NAME, "handler already registered");
				Subscription::inert(R::NAME)
			}
		}
	}

	/// Removes one registration of requisition `R`. No-op if absent.
	pub fn unregister<R: Requisition>(&self, id: SubscriptionId) -> bool {
		let removed = self.inner.registry.lock().remove(R::NAME, id);
		removed.is_some()
	}

	/// Removes every registration of requisition `R`.
	pub fn unregister_all<R: Requisition>(&self) {
		let removed = self.inner.registry.lock().slots.remove(R::NAME);
		drop(removed);
	}

	/// Removes every registration of every requisition.
	pub fn clear(&self) {
		let removed = std::mem::take(&mut self.inner.registry.lock().slots);
		drop(removed);
	}

	/// Number of subscribers registered for requisition `R`.
	pub fn registrations<R: Requisition>(&self) -> usize {
		self.inner.registry.lock().count(R::NAME)
	}

	/// Offers `payload` to every subscriber of `R`.
	///
	/// All subscribers are invoked in registration order before any of them is
	/// awaited; their futures then run concurrently. A failing subscriber is
	/// logged and does not stop delivery to the others. Returns true if at
	/// least one subscriber handled the request.
	pub async fn execute<R: Requisition>(&self, payload: R::Payload) -> bool {
		let handlers = self.inner.registry.lock().snapshot(R::NAME);
		if handlers.is_empty() {
			trace!(requisition = R::NAME, "no subscribers");
			return false;
		}
		let pending = invoke_all(&handlers, &payload);
		collect(R::NAME, pending).await
	}

	/// Posts requisition `R` to the host.
	///
	/// Returns the host's acknowledgement, or false if the bus has no host or
	/// the payload cannot be serialized.
	pub fn execute_remote<R: Requisition>(&self, payload: &R::Payload) -> bool {
		let Some(target) = self.inner.remote.as_ref() else {
			return false;
		};
		match EmbeddedMessage::encode::<R>(self.inner.source, payload) {
			Ok(message) => {
				trace!(requisition = R::NAME, "forwarding to host");
				target.post_message(message)
			}
			Err(error) => {
				warn!(requisition = R::NAME, %error, "cannot forward requisition");
				false
			}
		}
	}

	/// Dispatches a message received from the other side of the host boundary.
	///
	/// Messages carrying this bus's own source are echoes and are ignored.
	pub async fn handle_remote_message(&self, message: EmbeddedMessage) -> Result<bool> {
		if message.source == self.inner.source {
			trace!(command = %message.command, "ignoring own message");
			return Ok(false);
		}
		self.dispatch_value(&message.command, message.data).await
	}

	/// Executes job entries one after another, awaiting each before the next.
	///
	/// Stops at the first entry whose payload cannot be decoded.
	pub async fn execute_job(&self, job: Vec<JobEntry>) -> Result<bool> {
		let mut handled = false;
		for entry in job {
			debug!(requisition = %entry.requisition, "running job entry");
			handled |= self.dispatch_value(&entry.requisition, entry.parameter).await?;
		}
		Ok(handled)
	}

	async fn dispatch_value(&self, name: &str, data: Value) -> Result<bool> {
		let (decode, handlers) = {
			let registry = self.inner.registry.lock();
			match registry.decoder(name) {
				Some(decode) => (decode, registry.snapshot(name)),
				None => {
					trace!(requisition = name, "no subscribers");
					return Ok(false);
				}
			}
		};

		let payload = decode(data).map_err(|source| RequisitionError::Decode {
			name: name.to_string(),
			source,
		})?;
		let pending = invoke_all(&handlers, &*payload);
		drop(payload);
		Ok(collect(name, pending).await)
	}
}

impl std::fmt::Debug for RequisitionBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let registry = self.inner.registry.lock();
		let mut names: Vec<_> = registry.slots.keys().copied().collect();
		names.sort_unstable();
		f.debug_struct("RequisitionBus")
			.field("source", &self.inner.source)
			.field("remote", &self.inner.remote.is_some())
			.field("requisitions", &names)
			.finish()
	}
}

fn erase<R, F>(handler: F) -> ErasedHandler
where
	R: Requisition,
	F: Fn(R::Payload) -> HandlerFuture + Send + Sync + 'static,
{
	Arc::new(move |payload: &dyn Any| -> HandlerFuture {
		match payload.downcast_ref::<R::Payload>() {
			Some(payload) => handler(payload.clone()),
			None => {
				let error = anyhow::Error::from(RequisitionError::PayloadMismatch(R::NAME));
				future::ready(Err(error)).boxed()
			}
		}
	})
}

fn decode_payload<R: Requisition>(value: Value) -> std::result::Result<Box<dyn Any + Send>, serde_json::Error> {
	let payload: R::Payload = serde_json::from_value(value)?;
	Ok(Box::new(payload))
}

fn invoke_all(handlers: &[ErasedHandler], payload: &dyn Any) -> Vec<HandlerFuture> {
	handlers.iter().map(|handler| handler(payload)).collect()
}

async fn collect(name: &str, pending: Vec<HandlerFuture>) -> bool {
	let mut handled = false;
	for result in future::join_all(pending).await {
		match result {
			Ok(value) => handled |= value,
			Err(error) => warn!(requisition = name, %error, "subscriber failed"),
		}
	}
	handled
}
