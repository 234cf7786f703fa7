//! Line commands read from stdin.

use std::time::Duration;

use shellgui_requisitions::{EmbeddedMessage, JobEntry};
use thiserror::Error;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	/// `info TEXT`, sent as `showInfo` over the bus.
	Info(String),
	/// `warn TEXT`
	Warn(String),
	/// `error TEXT`
	Error(String),
	/// `ask TEXT | A, B`: a warning with action buttons.
	Ask { text: String, items: Vec<String> },
	/// `click ID LABEL`
	Click { id: u64, label: String },
	/// `close ID`
	Close(u64),
	Escape,
	/// Toggle the history view.
	History,
	/// Clear the history.
	Clear,
	/// Toggle do-not-disturb mode.
	Silent,
	/// `wait MS`
	Wait(Duration),
	List,
	Status,
	/// `remote {json}`: a message as if posted by the host.
	Remote(EmbeddedMessage),
	/// `job [{json}, ...]`: requisitions executed one after another.
	Job(Vec<JobEntry>),
	/// `message TEXT`: free text sent as `message` over the bus and echoed back.
	Message(String),
	Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("empty command")]
	Empty,
	#[error("unknown command: {0}")]
	Unknown(String),
	#[error("`{0}` needs an argument")]
	MissingArgument(&'static str),
	#[error("invalid number: {0}")]
	InvalidNumber(String),
	#[error("invalid JSON: {0}")]
	InvalidJson(String),
}

impl Command {
	pub fn parse(line: &str) -> Result<Self, ParseError> {
		let line = line.trim();
		if line.is_empty() {
			return Err(ParseError::Empty);
		}
		let (verb, rest) = match line.split_once(char::is_whitespace) {
			Some((verb, rest)) => (verb, rest.trim()),
			None => (line, ""),
		};

		let command = match verb {
			"info" => Self::Info(text("info", rest)?),
			"warn" | "warning" => Self::Warn(text("warn", rest)?),
			"error" => Self::Error(text("error", rest)?),
			"ask" => parse_ask(rest)?,
			"click" => {
				let (id, label) = rest
					.split_once(char::is_whitespace)
					.ok_or(ParseError::MissingArgument("click"))?;
				Self::Click {
					id: number(id)?,
					label: text("click", label.trim())?,
				}
			}
			"close" => Self::Close(number(&text("close", rest)?)?),
			"escape" | "esc" => Self::Escape,
			"history" => Self::History,
			"clear" => Self::Clear,
			"silent" => Self::Silent,
			"wait" => Self::Wait(Duration::from_millis(number(&text("wait", rest)?)?)),
			"list" | "ls" => Self::List,
			"status" => Self::Status,
			"remote" => Self::Remote(json(&text("remote", rest)?)?),
			"job" => Self::Job(json(&text("job", rest)?)?),
			"message" | "msg" => Self::Message(text("message", rest)?),
			"quit" | "exit" => Self::Quit,
			other => return Err(ParseError::Unknown(other.to_string())),
		};
		Ok(command)
	}
}

fn text(verb: &'static str, rest: &str) -> Result<String, ParseError> {
	if rest.is_empty() {
		return Err(ParseError::MissingArgument(verb));
	}
	Ok(rest.to_string())
}

fn number(value: &str) -> Result<u64, ParseError> {
	let value = value.trim();
	let digits = value.strip_prefix("toast-").unwrap_or(value);
	digits
		.parse()
		.map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

fn json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, ParseError> {
	serde_json::from_str(value).map_err(|err| ParseError::InvalidJson(err.to_string()))
}

fn parse_ask(rest: &str) -> Result<Command, ParseError> {
	let (text_part, items_part) = rest.split_once('|').unwrap_or((rest, ""));
	let items = items_part
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_string)
		.collect();
	Ok(Command::Ask {
		text: text("ask", text_part.trim())?,
		items,
	})
}
