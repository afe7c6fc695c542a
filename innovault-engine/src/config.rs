use std::path::PathBuf;

use clap::Parser;

use crate::policy::PolicyConfig;
use crate::store::StoreConfig;
use crate::types::SubmissionLimits;

#[derive(Parser, Debug)]
#[command(
	name = "innovault-engine",
	about = "Academic submission vault with plagiarism detection over JSON-RPC stdio"
)]
pub struct CliArgs {
	/// Store file holding the submission corpus
	#[arg(long, default_value = "submissions.gz", env = "INNOVAULT_STORE")]
	pub store: PathBuf,

	/// Keep the corpus in memory only (ignores --store)
	#[arg(long)]
	pub in_memory: bool,

	/// Earliest accepted submission year
	#[arg(long, default_value = "2015", env = "INNOVAULT_MIN_YEAR")]
	pub min_year: u32,

	/// Latest accepted submission year
	#[arg(long, default_value = "2025", env = "INNOVAULT_MAX_YEAR")]
	pub max_year: u32,

	/// Highest semester number (semesters start at 1)
	#[arg(long, default_value = "8")]
	pub max_semester: u32,

	/// Uploads whose top similarity exceeds this are rejected
	#[arg(long, default_value = "0.7", env = "INNOVAULT_REJECT_THRESHOLD")]
	pub reject_threshold: f64,

	/// Direct checks above this (and not above the reject threshold) are moderate
	#[arg(long, default_value = "0.3")]
	pub moderate_threshold: f64,

	/// Minimum score for a match to be listed on a rejected upload
	#[arg(long, default_value = "0.3")]
	pub upload_display_threshold: f64,

	/// Minimum score for a match to be listed on a direct check
	#[arg(long, default_value = "0.5")]
	pub check_display_threshold: f64,

	/// Maximum number of matches listed
	#[arg(long, default_value = "5")]
	pub max_matches: usize,

	/// Append outgoing notifications to this NDJSON file instead of logging them
	#[arg(long, env = "INNOVAULT_OUTBOX")]
	pub outbox: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "INNOVAULT_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn store_config(&self) -> StoreConfig {
		StoreConfig {
			storage_path: if self.in_memory {
				None
			} else {
				Some(self.store.clone())
			},
			limits: SubmissionLimits {
				years: self.min_year..=self.max_year,
				max_semester: self.max_semester,
			},
		}
	}

	pub fn policy_config(&self) -> PolicyConfig {
		PolicyConfig {
			reject_threshold: self.reject_threshold,
			moderate_threshold: self.moderate_threshold,
			upload_display_threshold: self.upload_display_threshold,
			check_display_threshold: self.check_display_threshold,
			max_matches: self.max_matches,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_library_defaults() {
		let args = CliArgs::parse_from(["innovault-engine"]);
		let policy = args.policy_config();
		let default = PolicyConfig::default();
		assert_eq!(policy.reject_threshold, default.reject_threshold);
		assert_eq!(policy.check_display_threshold, default.check_display_threshold);
		assert_eq!(policy.max_matches, default.max_matches);

		let store = args.store_config();
		assert_eq!(store.limits.years, SubmissionLimits::default().years);
		assert_eq!(store.storage_path, Some(PathBuf::from("submissions.gz")));
	}

	#[test]
	fn in_memory_drops_storage_path() {
		let args = CliArgs::parse_from(["innovault-engine", "--in-memory", "--max-year", "2030"]);
		let store = args.store_config();
		assert!(store.storage_path.is_none());
		assert_eq!(*store.limits.years.end(), 2030);
	}
}
