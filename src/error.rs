//! Failure type for reads against the data service.

use thiserror::Error;

/// A category or product read that did not produce usable rows.
///
/// Every way a load can go wrong collapses into this one type; callers log it
/// and leave the affected collection empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// Endpoint or key was missing at build time.
	#[error("data service is not configured: {0} is not set")]
	NotConfigured(&'static str),
	/// The request never produced a response.
	#[error("request for `{table}` failed: {message}")]
	Transport { table: String, message: String },
	/// The service answered with a non-success status.
	#[error("`{table}` answered with HTTP {status}: {body}")]
	Status {
		table: String,
		status: u16,
		body: String,
	},
	/// The body did not parse into the expected rows.
	#[error("`{table}` returned rows of an unexpected shape: {message}")]
	Shape { table: String, message: String },
}

impl FetchError {
	pub(crate) fn shape(table: &str, err: serde_json::Error) -> Self {
		Self::Shape {
			table: table.to_owned(),
			message: err.to_string(),
		}
	}
}
