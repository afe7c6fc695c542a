use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::persistence::base64_bytes;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
	Project,
	Paper,
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Project => f.write_str("Project"),
			Self::Paper => f.write_str("Paper"),
		}
	}
}

impl FromStr for Category {
	type Err = VaultError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"project" => Ok(Self::Project),
			"paper" => Ok(Self::Paper),
			other => Err(VaultError::validation(format!(
				"category must be Project or Paper, got '{}'",
				other
			))),
		}
	}
}

/// One accepted document. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
	pub id: String,
	pub title: String,
	pub year: u32,
	pub collaborators: Vec<String>,
	pub category: Category,
	pub subject: String,
	pub semester: u32,
	pub email: String,
	#[serde(with = "base64_bytes")]
	pub raw_bytes: Vec<u8>,
	pub text: String,
}

/// Metadata view of a submission without the document payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
	pub id: String,
	pub title: String,
	pub year: u32,
	pub collaborators: Vec<String>,
	pub category: Category,
	pub subject: String,
	pub semester: u32,
	pub size_bytes: usize,
}

impl From<&Submission> for SubmissionSummary {
	fn from(s: &Submission) -> Self {
		Self {
			id: s.id.clone(),
			title: s.title.clone(),
			year: s.year,
			collaborators: s.collaborators.clone(),
			category: s.category,
			subject: s.subject.clone(),
			semester: s.semester,
			size_bytes: s.raw_bytes.len(),
		}
	}
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Upload input before validation. `collaborators` is already parsed; use
/// [`parse_collaborators`] on the raw comma-separated form.
#[derive(Debug, Clone)]
pub struct NewSubmission {
	pub title: String,
	pub year: u32,
	pub collaborators: Vec<String>,
	pub category: Category,
	pub subject: String,
	pub semester: u32,
	pub email: String,
	pub raw_bytes: Vec<u8>,
	pub text: String,
}

impl NewSubmission {
	pub(crate) fn into_submission(self, id: String) -> Submission {
		Submission {
			id,
			title: self.title.trim().to_string(),
			year: self.year,
			collaborators: self.collaborators,
			category: self.category,
			subject: self.subject,
			semester: self.semester,
			email: self.email.trim().to_string(),
			raw_bytes: self.raw_bytes,
			text: self.text,
		}
	}
}

/// Split a comma-separated collaborator list into trimmed, non-empty names.
pub fn parse_collaborators(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(str::to_string)
		.collect()
}

/// Bounds applied to submission metadata at ingestion.
#[derive(Debug, Clone)]
pub struct SubmissionLimits {
	pub years: RangeInclusive<u32>,
	pub max_semester: u32,
}

impl Default for SubmissionLimits {
	fn default() -> Self {
		Self {
			years: 2015..=2025,
			max_semester: 8,
		}
	}
}

impl SubmissionLimits {
	/// Fields that must be present before any comparison is attempted.
	fn check_required(&self, text: &str, email: &str) -> Result<(), VaultError> {
		if text.trim().is_empty() {
			return Err(VaultError::validation(
				"text: extracted document text is empty",
			));
		}
		if email.trim().is_empty() {
			return Err(VaultError::validation("email: contact email is required"));
		}
		Ok(())
	}

	pub fn validate(&self, s: &NewSubmission) -> Result<(), VaultError> {
		self.check_required(&s.text, &s.email)?;
		if s.title.trim().is_empty() {
			return Err(VaultError::validation("title: must not be empty"));
		}
		if !self.years.contains(&s.year) {
			return Err(VaultError::validation(format!(
				"year: {} outside {}..={}",
				s.year,
				self.years.start(),
				self.years.end()
			)));
		}
		if s.semester < 1 || s.semester > self.max_semester {
			return Err(VaultError::validation(format!(
				"semester: {} outside 1..={}",
				s.semester, self.max_semester
			)));
		}
		Ok(())
	}
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Score of one stored submission against a query document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
	pub title: String,
	pub score: f64,
}

/// AND-combined search filters. `None` (or an empty query) matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionFilter {
	pub year: Option<u32>,
	pub category: Option<Category>,
	pub query: Option<String>,
}

impl SubmissionFilter {
	pub fn matches(&self, s: &Submission) -> bool {
		if let Some(year) = self.year {
			if s.year != year {
				return false;
			}
		}
		if let Some(category) = self.category {
			if s.category != category {
				return false;
			}
		}
		match self.query.as_deref().map(str::to_lowercase) {
			Some(q) if !q.is_empty() => {
				s.title.to_lowercase().contains(&q)
					|| s.collaborators.iter().any(|c| c.to_lowercase().contains(&q))
			}
			_ => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample(title: &str, year: u32, category: Category, collaborators: &[&str]) -> Submission {
		Submission {
			id: "id".into(),
			title: title.into(),
			year,
			collaborators: collaborators.iter().map(|c| c.to_string()).collect(),
			category,
			subject: "CS".into(),
			semester: 3,
			email: "a@b.c".into(),
			raw_bytes: vec![],
			text: "text".into(),
		}
	}

	fn new_submission() -> NewSubmission {
		NewSubmission {
			title: "Compilers".into(),
			year: 2021,
			collaborators: vec![],
			category: Category::Paper,
			subject: "CS".into(),
			semester: 4,
			email: "me@uni.edu".into(),
			raw_bytes: b"bytes".to_vec(),
			text: "some text".into(),
		}
	}

	#[test]
	fn parse_collaborators_trims_and_drops_empty() {
		assert_eq!(
			parse_collaborators(" Ada Lovelace, Alan Turing ,, "),
			vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()]
		);
		assert!(parse_collaborators("").is_empty());
	}

	#[test]
	fn category_parses_case_insensitively() {
		assert_eq!("paper".parse::<Category>().unwrap(), Category::Paper);
		assert_eq!(" Project ".parse::<Category>().unwrap(), Category::Project);
		assert!(matches!(
			"thesis".parse::<Category>(),
			Err(VaultError::Validation(_))
		));
	}

	#[test]
	fn filter_query_matches_title_or_collaborator() {
		let s = sample("Graph Theory", 2020, Category::Project, &["Grace Hopper"]);
		let by_title = SubmissionFilter {
			query: Some("graph".into()),
			..Default::default()
		};
		let by_person = SubmissionFilter {
			query: Some("HOPPER".into()),
			..Default::default()
		};
		let miss = SubmissionFilter {
			query: Some("turing".into()),
			..Default::default()
		};
		assert!(by_title.matches(&s));
		assert!(by_person.matches(&s));
		assert!(!miss.matches(&s));
	}

	#[test]
	fn filter_combines_with_and() {
		let s = sample("Graph Theory", 2020, Category::Project, &[]);
		let f = SubmissionFilter {
			year: Some(2020),
			category: Some(Category::Paper),
			query: None,
		};
		assert!(!f.matches(&s));
		assert!(SubmissionFilter::default().matches(&s));
	}

	#[test]
	fn validate_accepts_well_formed_submission() {
		SubmissionLimits::default().validate(&new_submission()).unwrap();
	}

	#[test]
	fn validate_rejects_each_bad_field() {
		let limits = SubmissionLimits::default();
		let cases: Vec<Box<dyn Fn(&mut NewSubmission)>> = vec![
			Box::new(|s: &mut NewSubmission| s.text = "   ".into()),
			Box::new(|s: &mut NewSubmission| s.email = String::new()),
			Box::new(|s: &mut NewSubmission| s.title = " ".into()),
			Box::new(|s: &mut NewSubmission| s.year = 2010),
			Box::new(|s: &mut NewSubmission| s.semester = 0),
			Box::new(|s: &mut NewSubmission| s.semester = 9),
		];
		for mutate in cases {
			let mut s = new_submission();
			mutate(&mut s);
			assert!(matches!(limits.validate(&s), Err(VaultError::Validation(_))));
		}
	}
}
