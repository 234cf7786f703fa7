use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::types::ToastId;

/// The eventual answer to a shown notification.
///
/// Resolves with the clicked action label, or `None` when the toast was
/// closed, timed out or cleared from history. A toast discarded without an
/// answer (for example because the center was dropped) also yields `None`.
#[derive(Debug)]
#[must_use = "the response resolves when the user acts on the notification"]
pub struct NotificationResponse {
	id: ToastId,
	receiver: oneshot::Receiver<Option<String>>,
}

impl NotificationResponse {
	pub(crate) fn new(id: ToastId, receiver: oneshot::Receiver<Option<String>>) -> Self {
		Self { id, receiver }
	}

	/// The toast this response belongs to.
	pub fn id(&self) -> ToastId {
		self.id
	}

	/// Returns the outcome if it is already known.
	pub fn try_result(&mut self) -> Option<Option<String>> {
		match self.receiver.try_recv() {
			Ok(value) => Some(value),
			Err(TryRecvError::Empty) => None,
			Err(TryRecvError::Closed) => Some(None),
		}
	}
}

impl Future for NotificationResponse {
	type Output = Option<String>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.receiver).poll(cx).map(|result| result.ok().flatten())
	}
}
