//! Status bar printed to stdout.

use shellgui_notifications::{StatusBar, StatusBarItem, StatusBarItemSpec};
use tracing::debug;

/// Prints status item changes as `[status] ...` lines.
#[derive(Debug, Default)]
pub struct ConsoleStatusBar;

impl StatusBar for ConsoleStatusBar {
	fn create_item(&self, spec: StatusBarItemSpec) -> Box<dyn StatusBarItem> {
		debug!(item = %spec.id, command = %spec.command, "status item created");
		let item = ConsoleItem {
			id: spec.id,
			text: spec.text,
			tooltip: spec.tooltip,
			disposed: false,
		};
		item.print();
		Box::new(item)
	}
}

struct ConsoleItem {
	id: String,
	text: String,
	tooltip: String,
	disposed: bool,
}

impl ConsoleItem {
	fn print(&self) {
		println!("[status] {} {}", self.text, self.tooltip);
	}
}

impl StatusBarItem for ConsoleItem {
	fn set_text(&mut self, text: &str) {
		if self.disposed || self.text == text {
			return;
		}
		self.text = text.to_string();
		self.print();
	}

	fn set_tooltip(&mut self, tooltip: &str) {
		if self.disposed || self.tooltip == tooltip {
			return;
		}
		self.tooltip = tooltip.to_string();
		self.print();
	}

	fn dispose(&mut self) {
		if !self.disposed {
			self.disposed = true;
			debug!(item = %self.id, "status item disposed");
		}
	}
}
