// ---------------------------------------------------------------------------
// Store file format + Gzip compression
// ---------------------------------------------------------------------------
//
// The whole corpus is one table, rewritten wholesale on every save:
//
//   gzip( { "version": 1,
//           "columns": ["id", "title", ..., "rawBytes", "text"],
//           "submissions": [ { ...one object per row... }, ... ] } )
//
// Rows keep corpus insertion order. `rawBytes` is base64. Plain (not
// gzipped) JSON is accepted on load. The column list is fixed; a file with a
// different column set is rejected rather than guessed at.
// ---------------------------------------------------------------------------

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Submission;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PersistenceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Corruption: {0}")]
	Corruption(String),
	#[error("Serialization: {0}")]
	Serialization(String),
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STORE_VERSION: u32 = 1;

/// Fixed column set. Must stay stable for old files to load.
pub const COLUMNS: [&str; 10] = [
	"id",
	"title",
	"year",
	"collaborators",
	"category",
	"subject",
	"semester",
	"email",
	"rawBytes",
	"text",
];

// ---------------------------------------------------------------------------
// Raw bytes as base64 (serde `with` module)
// ---------------------------------------------------------------------------

pub mod base64_bytes {
	use base64::engine::general_purpose::STANDARD;
	use base64::Engine;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&STANDARD.encode(bytes))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let encoded = String::deserialize(deserializer)?;
		STANDARD
			.decode(encoded.as_bytes())
			.map_err(|e| serde::de::Error::custom(format!("Invalid base64: {}", e)))
	}
}

// ---------------------------------------------------------------------------
// Gzip compress / decompress
// ---------------------------------------------------------------------------

/// Gzip-compress a byte slice (level 6).
pub fn compress(data: &[u8]) -> Result<Vec<u8>, PersistenceError> {
	let mut encoder = GzEncoder::new(data, Compression::new(6));
	let mut compressed = Vec::new();
	encoder
		.read_to_end(&mut compressed)
		.map_err(PersistenceError::Io)?;
	Ok(compressed)
}

/// Gunzip-decompress a byte slice.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, PersistenceError> {
	let mut decoder = GzDecoder::new(data);
	let mut decompressed = Vec::new();
	decoder
		.read_to_end(&mut decompressed)
		.map_err(PersistenceError::Io)?;
	Ok(decompressed)
}

/// Check if data starts with gzip magic bytes (0x1f, 0x8b).
pub fn is_gzipped(data: &[u8]) -> bool {
	data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

// ---------------------------------------------------------------------------
// Table codec
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct StoreFileOut<'a> {
	version: u32,
	columns: &'a [&'a str],
	submissions: &'a [Submission],
}

#[derive(Deserialize)]
struct StoreFileIn {
	version: u32,
	columns: Vec<String>,
	submissions: Vec<serde_json::Value>,
}

/// Result of decoding a store file.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
	pub submissions: Vec<Submission>,
	pub skipped: usize,
}

/// Encode the corpus as gzipped JSON.
pub fn encode_corpus(submissions: &[Submission]) -> Result<Vec<u8>, PersistenceError> {
	let table = StoreFileOut {
		version: STORE_VERSION,
		columns: &COLUMNS,
		submissions,
	};
	let json = serde_json::to_vec(&table)
		.map_err(|e| PersistenceError::Serialization(format!("Failed to serialize store: {}", e)))?;
	compress(&json)
}

/// Decode a store file. Rows that fail to parse or carry empty text are
/// skipped and counted.
pub fn decode_corpus(raw_bytes: &[u8]) -> Result<LoadedCorpus, PersistenceError> {
	let json_bytes = if is_gzipped(raw_bytes) {
		decompress(raw_bytes)?
	} else {
		raw_bytes.to_vec()
	};

	let table: StoreFileIn = serde_json::from_slice(&json_bytes)
		.map_err(|e| PersistenceError::Corruption(format!("Invalid store JSON: {}", e)))?;

	if table.version != STORE_VERSION {
		return Err(PersistenceError::Corruption(format!(
			"Unsupported store version: {}",
			table.version
		)));
	}
	if table.columns.len() != COLUMNS.len()
		|| table.columns.iter().zip(COLUMNS.iter()).any(|(a, b)| a != b)
	{
		return Err(PersistenceError::Corruption(format!(
			"Unexpected columns: {:?}",
			table.columns
		)));
	}

	let mut loaded = LoadedCorpus::default();
	for (row, value) in table.submissions.into_iter().enumerate() {
		match serde_json::from_value::<Submission>(value) {
			Ok(s) if !s.text.is_empty() => loaded.submissions.push(s),
			Ok(s) => {
				tracing::warn!(row, id = %s.id, "Skipping stored submission with empty text");
				loaded.skipped += 1;
			}
			Err(e) => {
				tracing::warn!(row, "Skipping unreadable stored submission: {}", e);
				loaded.skipped += 1;
			}
		}
	}
	Ok(loaded)
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn staging_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}

/// Write the corpus to `path`. The data goes to a sibling staging file that
/// is then renamed over the target, so readers never see a partial file.
pub fn save_to_file(path: &Path, submissions: &[Submission]) -> Result<(), PersistenceError> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)?;
		}
	}

	let compressed = encode_corpus(submissions)?;
	let staging = staging_path(path);
	std::fs::write(&staging, &compressed)?;
	std::fs::rename(&staging, path)?;
	Ok(())
}

/// Load the corpus from `path`; a missing file is an empty corpus.
pub fn load_from_file(path: &Path) -> Result<LoadedCorpus, PersistenceError> {
	if !path.exists() {
		return Ok(LoadedCorpus::default());
	}
	let raw_bytes = std::fs::read(path)?;
	decode_corpus(&raw_bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Category;

	fn make_submission(id: &str, title: &str, text: &str, bytes: &[u8]) -> Submission {
		Submission {
			id: id.to_string(),
			title: title.to_string(),
			year: 2021,
			collaborators: vec!["Ada".into(), "Grace".into()],
			category: Category::Paper,
			subject: "Databases".into(),
			semester: 5,
			email: "ada@uni.edu".into(),
			raw_bytes: bytes.to_vec(),
			text: text.to_string(),
		}
	}

	#[test]
	fn compress_decompress_roundtrip() {
		let original = b"Hello, world! This is a test of gzip compression.";
		let compressed = compress(original).unwrap();
		assert!(is_gzipped(&compressed));
		let decompressed = decompress(&compressed).unwrap();
		assert_eq!(decompressed, original.as_slice());
	}

	#[test]
	fn is_gzipped_detection() {
		assert!(!is_gzipped(b"not gzipped"));
		assert!(!is_gzipped(b""));
		assert!(!is_gzipped(&[0x1f]));
		assert!(!is_gzipped(&[0x00, 0x8b]));
	}

	#[test]
	fn corpus_roundtrip_preserves_order_and_bytes() {
		let rows = vec![
			make_submission("b", "Second title", "beta text", &[0, 159, 146, 150, 255]),
			make_submission("a", "First title", "alpha text", b"%PDF-1.4"),
		];
		let encoded = encode_corpus(&rows).unwrap();
		let loaded = decode_corpus(&encoded).unwrap();
		assert_eq!(loaded.skipped, 0);
		assert_eq!(loaded.submissions, rows);
	}

	#[test]
	fn plain_json_is_accepted() {
		let rows = vec![make_submission("a", "T", "text", b"x")];
		let encoded = encode_corpus(&rows).unwrap();
		let plain = decompress(&encoded).unwrap();
		let loaded = decode_corpus(&plain).unwrap();
		assert_eq!(loaded.submissions.len(), 1);
	}

	#[test]
	fn wrong_version_is_corruption() {
		let json = serde_json::json!({
			"version": 99,
			"columns": COLUMNS,
			"submissions": [],
		});
		let result = decode_corpus(json.to_string().as_bytes());
		assert!(matches!(result, Err(PersistenceError::Corruption(_))));
	}

	#[test]
	fn changed_columns_are_corruption() {
		let json = serde_json::json!({
			"version": STORE_VERSION,
			"columns": ["title", "content"],
			"submissions": [],
		});
		let result = decode_corpus(json.to_string().as_bytes());
		assert!(matches!(result, Err(PersistenceError::Corruption(_))));
	}

	#[test]
	fn garbage_is_corruption() {
		assert!(matches!(
			decode_corpus(b"{not json"),
			Err(PersistenceError::Corruption(_))
		));
	}

	#[test]
	fn bad_rows_are_skipped() {
		let good = serde_json::to_value(make_submission("g", "Good", "text", b"1")).unwrap();
		let empty = serde_json::to_value(make_submission("e", "Empty", "", b"2")).unwrap();
		let json = serde_json::json!({
			"version": STORE_VERSION,
			"columns": COLUMNS,
			"submissions": [good, empty, { "id": "broken" }],
		});
		let loaded = decode_corpus(json.to_string().as_bytes()).unwrap();
		assert_eq!(loaded.submissions.len(), 1);
		assert_eq!(loaded.submissions[0].id, "g");
		assert_eq!(loaded.skipped, 2);
	}

	#[test]
	fn save_load_file_roundtrip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("submissions.gz");
		let rows = vec![make_submission("x", "Title", "hello world", b"\x00\x01raw")];

		save_to_file(&path, &rows).unwrap();
		assert!(path.exists());
		assert!(!staging_path(&path).exists());

		let loaded = load_from_file(&path).unwrap();
		assert_eq!(loaded.submissions, rows);
	}

	#[test]
	fn load_missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let loaded = load_from_file(&dir.path().join("absent.gz")).unwrap();
		assert!(loaded.submissions.is_empty());
		assert_eq!(loaded.skipped, 0);
	}
}
