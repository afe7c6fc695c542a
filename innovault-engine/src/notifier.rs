// ---------------------------------------------------------------------------
// Notifier: outbound messages to submitters
// ---------------------------------------------------------------------------
//
// Delivery failures never abort the operation that triggered them. The vault
// reduces every `NotificationError` to a `Delivery::Failed` value.
// ---------------------------------------------------------------------------

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
	#[error("Notifier unavailable: {0}")]
	Unavailable(String),
	#[error("Message rejected: {0}")]
	Rejected(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Outcome of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Delivery {
	Delivered,
	Failed { reason: String },
}

impl Delivery {
	pub fn is_delivered(&self) -> bool {
		matches!(self, Self::Delivered)
	}
}

pub trait Notifier {
	fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

/// Send through `notifier`, logging and absorbing any failure.
pub fn deliver(notifier: &dyn Notifier, to: &str, subject: &str, body: &str) -> Delivery {
	match notifier.send(to, subject, body) {
		Ok(()) => Delivery::Delivered,
		Err(e) => {
			tracing::warn!(to, subject, "Notification not sent: {}", e);
			Delivery::Failed {
				reason: e.to_string(),
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// Writes messages to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
		if to.trim().is_empty() {
			return Err(NotificationError::Rejected("empty recipient".into()));
		}
		tracing::info!(to, subject, body, "Notification");
		Ok(())
	}
}

#[derive(Serialize)]
struct OutboxMessage<'a> {
	to: &'a str,
	subject: &'a str,
	body: &'a str,
}

/// Appends one JSON line per message to a file for an external mailer.
pub struct OutboxNotifier {
	path: PathBuf,
	lock: Mutex<()>,
}

impl OutboxNotifier {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			lock: Mutex::new(()),
		}
	}
}

impl Notifier for OutboxNotifier {
	fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
		if to.trim().is_empty() {
			return Err(NotificationError::Rejected("empty recipient".into()));
		}
		let mut line = serde_json::to_string(&OutboxMessage { to, subject, body })
			.map_err(|e| NotificationError::Unavailable(e.to_string()))?;
		line.push('\n');

		let _guard = self
			.lock
			.lock()
			.map_err(|_| NotificationError::Unavailable("outbox lock poisoned".into()))?;
		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)?;
		file.write_all(line.as_bytes())?;
		Ok(())
	}
}
