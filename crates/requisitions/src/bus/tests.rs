use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use super::*;
use crate::keys::{Message, ShowError, ShowInfo, ShowWarning, StatusBarButtonClick, StatusBarClick};
use crate::subscription::{Disposable, DisposableStore};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder<R: Requisition<Payload = String>>(bus: &RequisitionBus, log: &Log, tag: &'static str) -> Subscription {
	let log = Arc::clone(log);
	bus.register::<R, _, _>(move |payload| {
		log.lock().push(format!("{tag}:{payload}"));
		async { Ok(true) }
	})
}

#[tokio::test]
async fn execute_fans_out_in_registration_order() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let _first = recorder::<ShowError>(&bus, &log, "first");
	let _second = recorder::<ShowError>(&bus, &log, "second");

	assert!(bus.execute::<ShowError>("m".into()).await);
	assert_eq!(*log.lock(), vec!["first:m".to_string(), "second:m".to_string()]);
}

#[tokio::test]
async fn unregister_stops_delivery() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let first = recorder::<ShowError>(&bus, &log, "first");
	let _second = recorder::<ShowError>(&bus, &log, "second");

	let id = first.id().unwrap();
	assert!(bus.unregister::<ShowError>(id));
	assert!(!bus.unregister::<ShowError>(id));

	bus.execute::<ShowError>("m".into()).await;
	assert_eq!(*log.lock(), vec!["second:m".to_string()]);
	assert!(!first.is_active());
}

#[tokio::test]
async fn dropping_subscription_unregisters() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let sub = recorder::<ShowInfo>(&bus, &log, "info");
	assert_eq!(bus.registrations::<ShowInfo>(), 1);

	drop(sub);
	assert_eq!(bus.registrations::<ShowInfo>(), 0);
	assert!(!bus.execute::<ShowInfo>("lost".into()).await);
	assert!(log.lock().is_empty());
}

#[tokio::test]
async fn duplicate_handler_registration_is_noop() {
	let bus = RequisitionBus::new();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let handler: Handler<String> = Arc::new(move |_: String| -> HandlerFuture {
		counter.fetch_add(1, Ordering::SeqCst);
		async { Ok(true) }.boxed()
	});

	let first = bus.register_handler::<ShowError>(Arc::clone(&handler));
	let second = bus.register_handler::<ShowError>(Arc::clone(&handler));
	assert!(first.is_active());
	assert!(second.id().is_none());
	assert_eq!(bus.registrations::<ShowError>(), 1);

	bus.execute::<ShowError>("once".into()).await;
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	// The inert guard must not take the real registration with it.
	drop(second);
	assert_eq!(bus.registrations::<ShowError>(), 1);

	// Same handler under another key is a separate registration.
	let _other = bus.register_handler::<ShowInfo>(handler);
	assert_eq!(bus.registrations::<ShowInfo>(), 1);
	drop(first);
	assert_eq!(bus.registrations::<ShowError>(), 0);
}

#[tokio::test]
async fn failing_subscriber_does_not_abort_delivery() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let _failing = bus.register::<ShowError, _, _>(|_| async { Err(anyhow::anyhow!("subscriber broke")) });
	let _ok = recorder::<ShowError>(&bus, &log, "after");

	assert!(bus.execute::<ShowError>("m".into()).await);
	assert_eq!(*log.lock(), vec!["after:m".to_string()]);
}

#[tokio::test]
async fn execute_result_reflects_handling() {
	let bus = RequisitionBus::new();
	assert!(!bus.execute::<ShowInfo>("nobody".into()).await);

	let _ignores = bus.register::<ShowInfo, _, _>(|_| async { Ok(false) });
	assert!(!bus.execute::<ShowInfo>("ignored".into()).await);

	let _handles = bus.register::<ShowInfo, _, _>(|_| async { Ok(true) });
	assert!(bus.execute::<ShowInfo>("handled".into()).await);
}

#[tokio::test]
async fn subscribers_are_all_invoked_before_any_completes() {
	let bus = RequisitionBus::new();
	let (tx, rx) = oneshot::channel::<()>();
	let rx = Arc::new(Mutex::new(Some(rx)));
	let tx = Arc::new(Mutex::new(Some(tx)));

	// The first subscriber waits for a signal only the second one sends.
	let _waiting = bus.register::<Message, _, _>(move |_| {
		let rx = rx.lock().take();
		async move {
			match rx {
				Some(rx) => Ok(rx.await.is_ok()),
				None => Ok(false),
			}
		}
	});
	let _signalling = bus.register::<Message, _, _>(move |_| {
		if let Some(tx) = tx.lock().take() {
			let _ = tx.send(());
		}
		async { Ok(true) }
	});

	assert!(bus.execute::<Message>("go".into()).await);
}

#[tokio::test]
async fn handlers_may_reenter_the_bus() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let _inner = recorder::<ShowInfo>(&bus, &log, "inner");

	let weak = bus.downgrade();
	let _outer = bus.register::<Message, _, _>(move |text| {
		let bus = weak.upgrade();
		async move {
			match bus {
				Some(bus) => Ok(bus.execute::<ShowInfo>(text).await),
				None => Ok(false),
			}
		}
	});

	assert!(bus.execute::<Message>("nested".into()).await);
	assert_eq!(*log.lock(), vec!["inner:nested".to_string()]);
}

#[tokio::test]
async fn buses_are_independent() {
	let first = RequisitionBus::new();
	let second = RequisitionBus::new();
	let log = Log::default();
	let _sub = recorder::<ShowInfo>(&first, &log, "first");

	assert!(!second.execute::<ShowInfo>("x".into()).await);
	assert_eq!(second.registrations::<ShowInfo>(), 0);
	assert!(log.lock().is_empty());
}

#[test]
fn subscription_does_not_keep_bus_alive() {
	let bus = RequisitionBus::new();
	let weak = bus.downgrade();
	let mut sub = bus.register::<ShowInfo, _, _>(|_| async { Ok(true) });

	drop(bus);
	assert!(weak.upgrade().is_none());
	assert!(!sub.is_active());
	sub.dispose();
}

#[test]
fn unregister_all_and_clear() {
	let bus = RequisitionBus::new();
	let _a = bus.register::<ShowInfo, _, _>(|_| async { Ok(true) });
	let _b = bus.register::<ShowInfo, _, _>(|_| async { Ok(true) });
	let _c = bus.register::<ShowError, _, _>(|_| async { Ok(true) });

	bus.unregister_all::<ShowInfo>();
	assert_eq!(bus.registrations::<ShowInfo>(), 0);
	assert_eq!(bus.registrations::<ShowError>(), 1);

	bus.clear();
	assert_eq!(bus.registrations::<ShowError>(), 0);
}

#[test]
fn disposable_store_releases_everything() {
	let bus = RequisitionBus::new();
	let mut store = DisposableStore::new();
	store.add(bus.register::<ShowInfo, _, _>(|_| async { Ok(true) }));
	store.add(bus.register::<ShowError, _, _>(|_| async { Ok(true) }));
	assert_eq!(store.len(), 2);

	store.dispose_all();
	assert!(store.is_empty());
	assert_eq!(bus.registrations::<ShowInfo>(), 0);
	assert_eq!(bus.registrations::<ShowError>(), 0);

	{
		let mut scoped = DisposableStore::new();
		scoped.add(bus.register::<ShowInfo, _, _>(|_| async { Ok(true) }));
		assert_eq!(bus.registrations::<ShowInfo>(), 1);
	}
	assert_eq!(bus.registrations::<ShowInfo>(), 0);
}

#[test]
fn execute_remote_without_target_is_unacknowledged() {
	let bus = RequisitionBus::new();
	assert!(!bus.has_remote());
	assert!(!bus.execute_remote::<ShowInfo>(&"hello".to_string()));
}

#[test]
fn execute_remote_posts_embedded_message() {
	let (tx, mut rx) = mpsc::unbounded_channel();
	let bus = RequisitionBus::with_remote(MessageSource::App, Arc::new(tx));

	assert!(bus.execute_remote::<ShowWarning>(&"disk almost full".to_string()));
	let message = rx.try_recv().unwrap();
	assert_eq!(
		message,
		EmbeddedMessage {
			source: MessageSource::App,
			command: "showWarning".into(),
			data: json!("disk almost full"),
		}
	);
}

#[test]
fn execute_remote_reports_closed_host() {
	let (tx, rx) = mpsc::unbounded_channel();
	let bus = RequisitionBus::with_remote(MessageSource::App, Arc::new(tx));
	drop(rx);
	assert!(!bus.execute_remote::<ShowInfo>(&"nobody listens".to_string()));
}

#[tokio::test]
async fn handle_remote_message_dispatches_typed_payload() {
	let bus = RequisitionBus::new();
	let seen = Arc::new(Mutex::new(None));
	let sink = Arc::clone(&seen);
	let _sub = bus.register::<StatusBarButtonClick, _, _>(move |click| {
		*sink.lock() = Some(click);
		async { Ok(true) }
	});

	let message: EmbeddedMessage = serde_json::from_value(json!({
		"source": "host",
		"command": "statusBarButtonClick",
		"data": { "type": "notifications:showHistory" },
	}))
	.unwrap();

	assert!(bus.handle_remote_message(message).await.unwrap());
	assert_eq!(*seen.lock(), Some(StatusBarClick::new("notifications:showHistory")));
}

#[tokio::test]
async fn handle_remote_message_ignores_own_source() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let _sub = recorder::<ShowInfo>(&bus, &log, "info");

	let echo = EmbeddedMessage::encode::<ShowInfo>(MessageSource::App, &"echo".to_string()).unwrap();
	assert!(!bus.handle_remote_message(echo).await.unwrap());
	assert!(log.lock().is_empty());
}

#[tokio::test]
async fn handle_remote_message_rejects_bad_payload() {
	let bus = RequisitionBus::new();
	let _sub = bus.register::<StatusBarButtonClick, _, _>(|_| async { Ok(true) });

	let message = EmbeddedMessage {
		source: MessageSource::Host,
		command: "statusBarButtonClick".into(),
		data: json!(42),
	};
	let error = bus.handle_remote_message(message).await.unwrap_err();
	assert!(matches!(error, RequisitionError::Decode { ref name, .. } if name == "statusBarButtonClick"));
}

#[tokio::test]
async fn handle_remote_message_for_unknown_command_is_unhandled() {
	let bus = RequisitionBus::new();
	let message = EmbeddedMessage {
		source: MessageSource::Host,
		command: "paste".into(),
		data: json!({ "text": "abc" }),
	};
	assert!(!bus.handle_remote_message(message).await.unwrap());
}

#[tokio::test]
async fn execute_job_runs_entries_sequentially() {
	let bus = RequisitionBus::new();
	let log = Log::default();
	let (tx, rx) = oneshot::channel::<()>();
	let rx = Arc::new(Mutex::new(Some(rx)));

	// The first entry only completes after a delayed signal; the second entry
	// must not start before that.
	let first_log = Arc::clone(&log);
	let _slow = bus.register::<ShowInfo, _, _>(move |text| {
		let rx = rx.lock().take();
		let log = Arc::clone(&first_log);
		async move {
			if let Some(rx) = rx {
				let _ = rx.await;
			}
			log.lock().push(format!("info:{text}"));
			Ok(true)
		}
	});
	let _fast = recorder::<ShowError>(&bus, &log, "error");

	let job = vec![
		JobEntry::new::<ShowInfo>(&"one".to_string()).unwrap(),
		JobEntry::new::<ShowError>(&"two".to_string()).unwrap(),
	];
	let run = bus.execute_job(job);
	tokio::pin!(run);

	tokio::select! {
		_ = &mut run => panic!("job finished before its first entry"),
		_ = tokio::task::yield_now() => {}
	}
	assert!(log.lock().is_empty());

	tx.send(()).unwrap();
	assert!(run.await.unwrap());
	assert_eq!(*log.lock(), vec!["info:one".to_string(), "error:two".to_string()]);
}

#[test]
fn job_entries_serialize_like_host_requests() {
	let entry = JobEntry::new::<ShowError>(&"bad".to_string()).unwrap();
	assert_eq!(
		serde_json::to_value(&entry).unwrap(),
		json!({ "requisition": "showError", "parameter": "bad" })
	);
}
