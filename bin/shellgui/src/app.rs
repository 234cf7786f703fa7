//! Command loop wiring the bus, the center and stdin together.

use std::sync::Arc;

use anyhow::Context;
use shellgui_config::Config;
use shellgui_notifications::{CenterOptions, Notification, NotificationCenter, ToastId};
use shellgui_requisitions::{
	EmbeddedMessage, Message, MessageSource, RequisitionBus, ShowError, ShowInfo, ShowWarning,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands::{Command, ParseError};
use crate::status_bar::ConsoleStatusBar;

/// Runs until `quit` or end of input.
pub async fn run(config: Config, embedded: bool) -> anyhow::Result<()> {
	let bus = if embedded {
		let (tx, rx) = mpsc::unbounded_channel();
		tokio::spawn(print_host_messages(rx));
		RequisitionBus::with_remote(MessageSource::App, Arc::new(tx))
	} else {
		RequisitionBus::new()
	};

	let _echo = bus.register::<Message, _, _>(|text| async move {
		println!("message: {text}");
		Ok(true)
	});

	let center = NotificationCenter::new(config.notifications, CenterOptions { embedded });
	center.start(&bus, Some(&ConsoleStatusBar));
	let driver = center.spawn_driver();
	info!(embedded, "notification center ready");

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await.context("reading stdin")? {
		let command = match Command::parse(&line) {
			Ok(command) => command,
			Err(ParseError::Empty) => continue,
			Err(err) => {
				println!("error: {err}");
				continue;
			}
		};
		if command == Command::Quit {
			break;
		}
		dispatch(&center, &bus, command).await;
	}

	center.stop();
	driver.await.context("notification driver panicked")?;
	info!("shut down");
	Ok(())
}

async fn dispatch(center: &NotificationCenter, bus: &RequisitionBus, command: Command) {
	match command {
		Command::Info(text) => spawn_execute(bus, "showInfo", move |bus| async move {
			bus.execute::<ShowInfo>(text).await
		}),
		Command::Warn(text) => spawn_execute(bus, "showWarning", move |bus| async move {
			bus.execute::<ShowWarning>(text).await
		}),
		Command::Error(text) => spawn_execute(bus, "showError", move |bus| async move {
			bus.execute::<ShowError>(text).await
		}),
		Command::Message(text) => spawn_execute(bus, "message", move |bus| async move {
			bus.execute::<Message>(text).await
		}),
		Command::Ask { text, items } => {
			let response = center.show_notification(Notification::warning(text).with_items(items));
			let id = response.id();
			println!("shown {id}");
			tokio::spawn(async move {
				match response.await {
					Some(label) => println!("answer {id}: {label}"),
					None => println!("answer {id}: <none>"),
				}
			});
		}
		Command::Click { id, label } => report(center.click_item(ToastId::from_raw(id), label), id),
		Command::Close(id) => report(center.close_toast(ToastId::from_raw(id)), id),
		Command::Escape => {
			center.handle_escape();
		}
		Command::History => {
			let shown = center.toggle_history();
			println!("history {}", if shown { "shown" } else { "hidden" });
			if shown {
				print_history(center);
			}
		}
		Command::Clear => println!("cleared {}", center.clear_history()),
		Command::Silent => println!("silent {}", center.toggle_silent_mode()),
		Command::Wait(duration) => tokio::time::sleep(duration).await,
		Command::List => {
			for toast in center.live_toasts() {
				println!(
					"live {} {:?} {:?} {} {:?}",
					toast.id, toast.phase, toast.notification.kind, toast.notification.text, toast.notification.items
				);
			}
			print_history(center);
		}
		Command::Status => {
			let status = center.status();
			println!("status {} {} | {}", status.text, status.tooltip, center.history_caption());
		}
		Command::Remote(message) => match bus.handle_remote_message(message).await {
			Ok(handled) => println!("remote handled: {handled}"),
			Err(err) => println!("error: {err}"),
		},
		Command::Job(entries) => {
			let bus = bus.clone();
			tokio::spawn(async move {
				match bus.execute_job(entries).await {
					Ok(handled) => debug!(handled, "job finished"),
					Err(err) => warn!(%err, "job failed"),
				}
			});
		}
		Command::Quit => {}
	}
}

/// Show requisitions resolve only once the toast is answered, so they run detached.
fn spawn_execute<F, Fut>(bus: &RequisitionBus, name: &'static str, execute: F)
where
	F: FnOnce(RequisitionBus) -> Fut,
	Fut: Future<Output = bool> + Send + 'static,
{
	let pending = execute(bus.clone());
	tokio::spawn(async move {
		let handled = pending.await;
		debug!(requisition = name, handled, "requisition finished");
		if !handled {
			println!("{name}: not handled");
		}
	});
}

fn report(done: bool, id: u64) {
	if !done {
		println!("error: no toast {id}");
	}
}

fn print_history(center: &NotificationCenter) {
	println!("{}", center.history_caption());
	for entry in center.history() {
		let marker = if entry.is_new { "*" } else { " " };
		println!("{marker} {} {:?} {}", entry.id, entry.notification.kind, entry.notification.text);
	}
}

async fn print_host_messages(mut rx: mpsc::UnboundedReceiver<EmbeddedMessage>) {
	while let Some(message) = rx.recv().await {
		match serde_json::to_string(&message) {
			Ok(json) => println!("host <- {json}"),
			Err(err) => warn!(%err, "cannot render host message"),
		}
	}
}
