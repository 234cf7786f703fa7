//! Requisition bus for cross-component requests.
//!
//! A requisition is a named request type. Components subscribe to the
//! requisitions they can serve and producers fan a payload out to every
//! subscriber with [`RequisitionBus::execute`]. Each subscriber reports
//! whether it handled the request.
//!
//! ```ignore
//! let bus = RequisitionBus::new();
//! let _sub = bus.register::<ShowError, _, _>(|message| async move {
//!     tracing::error!(%message);
//!     Ok(true)
//! });
//!
//! assert!(bus.execute::<ShowError>("boom".into()).await);
//! ```
//!
//! # Embedded mode
//!
//! When the application runs inside a host (an IDE webview, a native shell),
//! the bus is created with a [`RemoteTarget`]. [`RequisitionBus::execute_remote`]
//! posts requisitions to the host as [`EmbeddedMessage`]s and
//! [`RequisitionBus::handle_remote_message`] dispatches host messages to the
//! local subscribers.
//!
//! # Lifetimes
//!
//! Registrations are owned by [`Subscription`] guards. Dropping a guard removes
//! the registration, and [`DisposableStore`] releases a whole group at once.
//! The bus does not buffer: a requisition executed before anyone subscribed is
//! simply not handled.

mod bus;
mod error;
mod job;
mod keys;
mod macros;
mod remote;
mod requisition;
mod subscription;

pub use bus::{Handler, HandlerFuture, RequisitionBus, WeakRequisitionBus};
pub use error::{RequisitionError, Result};
pub use job::JobEntry;
pub use keys::{Message, ShowError, ShowInfo, ShowWarning, StatusBarButtonClick, StatusBarClick};
pub use remote::{EmbeddedMessage, MessageSource, RemoteTarget};
pub use requisition::Requisition;
pub use subscription::{Disposable, DisposableStore, Subscription, SubscriptionId};
