// ---------------------------------------------------------------------------
// PlagiarismPolicy: pure classification of a ranked similarity list
// ---------------------------------------------------------------------------
//
// Two modes with deliberately different display thresholds:
//   upload gate   reject when top > 0.7, show matches > 0.3
//   direct check  HIGH > 0.7, MODERATE > 0.3, LOW otherwise; show matches > 0.5
// Both show at most `max_matches` entries taken from the head of the ranking.
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::types::SimilarityResult;

#[derive(Debug, Clone)]
pub struct PolicyConfig {
	pub reject_threshold: f64,
	pub moderate_threshold: f64,
	pub upload_display_threshold: f64,
	pub check_display_threshold: f64,
	pub max_matches: usize,
}

impl Default for PolicyConfig {
	fn default() -> Self {
		Self {
			reject_threshold: 0.7,
			moderate_threshold: 0.3,
			upload_display_threshold: 0.3,
			check_display_threshold: 0.5,
			max_matches: 5,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum UploadVerdict {
	Accept,
	Reject {
		#[serde(rename = "topScore")]
		top_score: f64,
		matches: Vec<SimilarityResult>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
	High,
	Moderate,
	Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
	pub band: Band,
	/// `None` when there was nothing to compare against.
	pub top_score: Option<f64>,
	pub matches: Vec<SimilarityResult>,
}

#[derive(Debug, Clone, Default)]
pub struct PlagiarismPolicy {
	config: PolicyConfig,
}

impl PlagiarismPolicy {
	pub fn new(config: PolicyConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &PolicyConfig {
		&self.config
	}

	/// Decide whether an upload may be stored. `ranked` must be sorted by
	/// descending score.
	pub fn upload_gate(&self, ranked: &[SimilarityResult]) -> UploadVerdict {
		match ranked.first() {
			Some(top) if top.score > self.config.reject_threshold => UploadVerdict::Reject {
				top_score: top.score,
				matches: self.surface(ranked, self.config.upload_display_threshold),
			},
			_ => UploadVerdict::Accept,
		}
	}

	/// Classify a document without storing it.
	pub fn direct_check(&self, ranked: &[SimilarityResult]) -> CheckReport {
		let top_score = ranked.first().map(|r| r.score);
		let band = match top_score {
			Some(s) if s > self.config.reject_threshold => Band::High,
			Some(s) if s > self.config.moderate_threshold => Band::Moderate,
			_ => Band::Low,
		};
		CheckReport {
			band,
			top_score,
			matches: self.surface(ranked, self.config.check_display_threshold),
		}
	}

	fn surface(&self, ranked: &[SimilarityResult], threshold: f64) -> Vec<SimilarityResult> {
		ranked
			.iter()
			.take(self.config.max_matches)
			.filter(|r| r.score > threshold)
			.cloned()
			.collect()
	}
}
