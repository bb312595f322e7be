//! Data service connection settings, baked in at build time.

use crate::error::FetchError;

const URL_VAR: &str = "SUPABASE_URL";
const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Endpoint and public key of the hosted REST data service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataServiceConfig {
	/// Project base URL without a trailing slash.
	pub url: String,
	/// Anonymous (public) API key.
	pub anon_key: String,
}

impl DataServiceConfig {
	/// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY` as captured by the
	/// compiler (trunk forwards them from the shell environment).
	pub fn from_build_env() -> Result<Self, FetchError> {
		Self::from_values(option_env!("SUPABASE_URL"), option_env!("SUPABASE_ANON_KEY"))
	}

	fn from_values(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, FetchError> {
		let url = non_blank(url).ok_or(FetchError::NotConfigured(URL_VAR))?;
		let anon_key = non_blank(anon_key).ok_or(FetchError::NotConfigured(KEY_VAR))?;
		Ok(Self {
			url: url.trim_end_matches('/').to_owned(),
			anon_key: anon_key.to_owned(),
		})
	}

	/// REST endpoint for a table.
	pub fn table_url(&self, table: &str) -> String {
		format!("{}/rest/v1/{}", self.url, table)
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}
