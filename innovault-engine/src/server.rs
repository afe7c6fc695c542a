// ---------------------------------------------------------------------------
// VaultServer: JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to Vault
// operations: a `run()` loop, a `dispatch()` match and free-standing handler
// functions for each method.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::VaultError;
use crate::protocol::*;
use crate::text_source::TextSource;
use crate::transport::NdjsonTransport;
use crate::types::{
	parse_collaborators, Category, NewSubmission, SubmissionFilter, SubmissionSummary,
};
use crate::vault::Vault;

/// JSON-RPC server that dispatches requests to a [`Vault`].
pub struct VaultServer {
	transport: NdjsonTransport,
	vault: Vault,
	text_source: Box<dyn TextSource>,
}

impl VaultServer {
	pub fn new(transport: NdjsonTransport, vault: Vault, text_source: Box<dyn TextSource>) -> Self {
		Self {
			transport,
			vault,
			text_source,
		}
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), VaultError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let source = self.text_source.as_ref();
		let result = match req.method.as_str() {
			"vault/upload" => handle_upload(&mut self.vault, source, req.params),
			"vault/check" => handle_check(&self.vault, source, req.params),
			"vault/search" => handle_search(&self.vault, req.params),
			"vault/list" => {
				let all: Vec<SubmissionSummary> =
					self.vault.store().all().iter().map(SubmissionSummary::from).collect();
				Ok(serde_json::json!({ "submissions": all }))
			}
			"vault/get" => handle_get(&self.vault, req.params),
			"vault/download" => handle_download(&self.vault, req.params),
			"vault/contact" => handle_contact(&self.vault, req.params),
			"vault/size" => Ok(serde_json::json!({ "count": self.vault.store().len() })),
			_ => {
				self.transport.write_error(
					id,
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					VaultError::Serialization(_) => INVALID_PARAMS,
					_ => VAULT_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()))
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, VaultError> {
	serde_json::from_value(params)
		.map_err(|e| VaultError::Serialization(format!("Invalid params: {}", e)))
}

fn decode_document(encoded: &str) -> Result<Vec<u8>, VaultError> {
	STANDARD
		.decode(encoded)
		.map_err(|e| VaultError::validation(format!("document: invalid base64: {}", e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, VaultError> {
	serde_json::to_value(value).map_err(|e| VaultError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Free-standing handler functions
// ---------------------------------------------------------------------------

fn handle_upload(
	vault: &mut Vault,
	source: &dyn TextSource,
	params: serde_json::Value,
) -> Result<serde_json::Value, VaultError> {
	let p: UploadParams = parse_params(params)?;
	let raw_bytes = decode_document(&p.document)?;
	let text = match p.text {
		Some(text) => text,
		None => source.extract(&raw_bytes),
	};

	let new = NewSubmission {
		title: p.title,
		year: p.year,
		collaborators: parse_collaborators(&p.collaborators),
		category: p.category.parse()?,
		subject: p.subject,
		semester: p.semester,
		email: p.email,
		raw_bytes,
		text,
	};
	let outcome = vault.upload(new)?;
	to_value(&outcome)
}

fn handle_check(
	vault: &Vault,
	source: &dyn TextSource,
	params: serde_json::Value,
) -> Result<serde_json::Value, VaultError> {
	let p: CheckParams = parse_params(params)?;
	let text = match (p.text, p.document) {
		(Some(text), _) => text,
		(None, Some(document)) => source.extract(&decode_document(&document)?),
		(None, None) => {
			return Err(VaultError::validation("either text or document is required"));
		}
	};

	let report = vault.check(&text)?;
	let details: Vec<SubmissionSummary> = report
		.matches
		.iter()
		.filter_map(|m| vault.store().find_by_title(&m.title))
		.map(SubmissionSummary::from)
		.collect();

	let mut value = to_value(&report)?;
	value["details"] = to_value(&details)?;
	Ok(value)
}

fn handle_search(vault: &Vault, params: serde_json::Value) -> Result<serde_json::Value, VaultError> {
	let p: SearchParams = if params.is_null() {
		SearchParams::default()
	} else {
		parse_params(params)?
	};
	let filter = SubmissionFilter {
		year: p.year,
		category: p.category.as_deref().map(str::parse::<Category>).transpose()?,
		query: p.query,
	};
	let found: Vec<SubmissionSummary> = vault
		.search(&filter)
		.into_iter()
		.map(SubmissionSummary::from)
		.collect();
	Ok(serde_json::json!({ "submissions": found }))
}

fn handle_get(vault: &Vault, params: serde_json::Value) -> Result<serde_json::Value, VaultError> {
	let p: IdParams = parse_params(params)?;
	let submission = vault
		.store()
		.get(&p.id)
		.ok_or_else(|| VaultError::NotFound(p.id.clone()))?;
	Ok(serde_json::json!({
		"submission": SubmissionSummary::from(submission),
		"email": submission.email,
		"text": submission.text,
	}))
}

fn handle_download(
	vault: &Vault,
	params: serde_json::Value,
) -> Result<serde_json::Value, VaultError> {
	let p: IdParams = parse_params(params)?;
	let submission = vault
		.store()
		.get(&p.id)
		.ok_or_else(|| VaultError::NotFound(p.id.clone()))?;
	Ok(serde_json::json!({
		"fileName": format!("{}.pdf", submission.title),
		"document": STANDARD.encode(&submission.raw_bytes),
	}))
}

fn handle_contact(
	vault: &Vault,
	params: serde_json::Value,
) -> Result<serde_json::Value, VaultError> {
	let p: ContactParams = parse_params(params)?;
	let delivery = vault.contact(&p.id, p.message.as_deref())?;
	to_value(&delivery)
}
