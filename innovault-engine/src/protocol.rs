use serde::Deserialize;

// JSON-RPC 2.0 error codes
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const VAULT_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
	pub id: u64,
	pub method: String,
	#[serde(default)]
	pub params: serde_json::Value,
}

// ── Params ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
	pub title: String,
	pub year: u32,
	/// Raw comma-separated names, parsed once at ingestion.
	#[serde(default)]
	pub collaborators: String,
	pub category: String,
	#[serde(default)]
	pub subject: String,
	pub semester: u32,
	pub email: String,
	/// Base64 of the original document.
	pub document: String,
	/// Pre-extracted text; extracted from `document` when absent.
	pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckParams {
	pub document: Option<String>,
	pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
	pub query: Option<String>,
	pub year: Option<u32>,
	pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdParams {
	pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactParams {
	pub id: String,
	pub message: Option<String>,
}
