// ---------------------------------------------------------------------------
// Vault: request orchestration
// ---------------------------------------------------------------------------
//
// Wires the pieces together for each request:
//   text -> VectorSpaceModel -> rank -> PlagiarismPolicy -> (store, notify)
// Every request runs to completion before the next one starts.
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::cosine::rank;
use crate::error::VaultError;
use crate::notifier::{deliver, Delivery, Notifier};
use crate::policy::{CheckReport, PlagiarismPolicy, UploadVerdict};
use crate::store::SubmissionStore;
use crate::types::{NewSubmission, SimilarityResult, Submission, SubmissionFilter};
use crate::vectorizer::VectorSpaceModel;

pub const CONFIRMATION_SUBJECT: &str = "InnoVault - Upload Confirmation";
pub const DEFAULT_INQUIRY: &str = "Hello, I'm interested in your submission on InnoVault!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum UploadOutcome {
	Accepted {
		id: String,
		delivery: Delivery,
	},
	Rejected {
		#[serde(rename = "topScore")]
		top_score: f64,
		matches: Vec<SimilarityResult>,
	},
}

pub struct Vault {
	store: SubmissionStore,
	policy: PlagiarismPolicy,
	model: VectorSpaceModel,
	notifier: Box<dyn Notifier>,
}

impl Vault {
	pub fn new(store: SubmissionStore, policy: PlagiarismPolicy, notifier: Box<dyn Notifier>) -> Self {
		Self {
			store,
			policy,
			model: VectorSpaceModel::new(),
			notifier,
		}
	}

	pub fn store(&self) -> &SubmissionStore {
		&self.store
	}

	pub fn policy(&self) -> &PlagiarismPolicy {
		&self.policy
	}

	/// Rank `text` against every stored submission. An empty corpus yields an
	/// empty ranking without vectorizing anything.
	pub fn similarity(&self, text: &str) -> Result<Vec<SimilarityResult>, VaultError> {
		if self.store.is_empty() {
			return Ok(Vec::new());
		}
		let vectors = self.model.vectorize(&self.store.texts(), text)?;
		let ranked = rank(&vectors.query, &vectors.corpus, &self.store.titles());
		tracing::debug!(
			candidates = ranked.len(),
			top = ranked.first().map(|r| r.score),
			"ranked query"
		);
		Ok(ranked)
	}

	/// Gate an upload on similarity, store it if accepted and confirm by mail.
	pub fn upload(&mut self, new: NewSubmission) -> Result<UploadOutcome, VaultError> {
		self.store.limits().validate(&new)?;

		let ranked = self.similarity(&new.text)?;
		if let UploadVerdict::Reject { top_score, matches } = self.policy.upload_gate(&ranked) {
			tracing::info!(title = %new.title, top_score, "Upload rejected as plagiarized");
			return Ok(UploadOutcome::Rejected { top_score, matches });
		}

		let to = new.email.clone();
		let id = self.store.add(new)?;
		let body = match self.store.get(&id) {
			Some(s) => format!("Your document '{}' has been successfully uploaded.", s.title),
			None => return Err(VaultError::NotFound(id)),
		};
		let delivery = deliver(self.notifier.as_ref(), &to, CONFIRMATION_SUBJECT, &body);

		Ok(UploadOutcome::Accepted { id, delivery })
	}

	/// Classify a document against the corpus without storing it.
	pub fn check(&self, text: &str) -> Result<CheckReport, VaultError> {
		if text.trim().is_empty() {
			return Err(VaultError::validation(
				"text: extracted document text is empty",
			));
		}
		let ranked = self.similarity(text)?;
		Ok(self.policy.direct_check(&ranked))
	}

	pub fn search(&self, filter: &SubmissionFilter) -> Vec<&Submission> {
		self.store.find(filter)
	}

	/// Send a message to the contact address of a stored submission.
	pub fn contact(&self, id: &str, message: Option<&str>) -> Result<Delivery, VaultError> {
		let submission = self
			.store
			.get(id)
			.ok_or_else(|| VaultError::NotFound(id.to_string()))?;
		let subject = format!("Inquiry about '{}'", submission.title);
		let body = message
			.filter(|m| !m.trim().is_empty())
			.unwrap_or(DEFAULT_INQUIRY);
		Ok(deliver(
			self.notifier.as_ref(),
			&submission.email,
			&subject,
			body,
		))
	}
}
