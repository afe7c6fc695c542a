// ---------------------------------------------------------------------------
// SubmissionStore: owner of the corpus
// ---------------------------------------------------------------------------
//
// Holds accepted submissions in insertion order and is the only writer of
// the store file. Single writer, no locking: callers serialize access.
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::VaultError;
use crate::persistence;
use crate::types::{NewSubmission, Submission, SubmissionFilter, SubmissionLimits};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a `SubmissionStore`.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
	/// Store file. `None` keeps the corpus in memory only.
	pub storage_path: Option<PathBuf>,
	pub limits: SubmissionLimits,
}

// ---------------------------------------------------------------------------
// SubmissionStore
// ---------------------------------------------------------------------------

pub struct SubmissionStore {
	submissions: Vec<Submission>,
	config: StoreConfig,
}

impl SubmissionStore {
	/// Open the store, loading persisted state when the file exists.
	pub fn open(config: StoreConfig) -> Result<Self, VaultError> {
		let submissions = match &config.storage_path {
			Some(path) => {
				let loaded = persistence::load_from_file(path)?;
				tracing::info!(
					path = %path.display(),
					count = loaded.submissions.len(),
					skipped = loaded.skipped,
					"Loaded submission store"
				);
				loaded.submissions
			}
			None => Vec::new(),
		};

		Ok(Self {
			submissions,
			config,
		})
	}

	/// An empty store that never touches disk.
	pub fn in_memory() -> Self {
		Self {
			submissions: Vec::new(),
			config: StoreConfig::default(),
		}
	}

	pub fn limits(&self) -> &SubmissionLimits {
		&self.config.limits
	}

	/// Write the full corpus to the store file, if one is configured.
	pub fn save(&self) -> Result<(), VaultError> {
		if let Some(path) = &self.config.storage_path {
			persistence::save_to_file(path, &self.submissions)?;
		}
		Ok(())
	}

	// -- Mutation ------------------------------------------------------------

	/// Validate, append and persist a submission. Returns the new id.
	///
	/// If the write fails the append is undone, so the in-memory corpus always
	/// matches what was last persisted.
	pub fn add(&mut self, new: NewSubmission) -> Result<String, VaultError> {
		self.config.limits.validate(&new)?;

		let id = Uuid::new_v4().to_string();
		self.submissions.push(new.into_submission(id.clone()));

		if let Err(e) = self.save() {
			self.submissions.pop();
			tracing::error!(id = %id, "Failed to persist submission: {}", e);
			return Err(e);
		}

		tracing::info!(id = %id, size = self.submissions.len(), "Stored submission");
		Ok(id)
	}

	// -- Queries -------------------------------------------------------------

	/// All submissions in insertion order.
	pub fn all(&self) -> &[Submission] {
		&self.submissions
	}

	pub fn len(&self) -> usize {
		self.submissions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.submissions.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<&Submission> {
		self.submissions.iter().find(|s| s.id == id)
	}

	/// First submission with exactly this title.
	pub fn find_by_title(&self, title: &str) -> Option<&Submission> {
		self.submissions.iter().find(|s| s.title == title)
	}

	pub fn find(&self, filter: &SubmissionFilter) -> Vec<&Submission> {
		self.submissions.iter().filter(|s| filter.matches(s)).collect()
	}

	pub fn texts(&self) -> Vec<&str> {
		self.submissions.iter().map(|s| s.text.as_str()).collect()
	}

	pub fn titles(&self) -> Vec<&str> {
		self.submissions.iter().map(|s| s.title.as_str()).collect()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
