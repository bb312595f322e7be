use std::future::Future;

use gloo_net::http::Request;
use log::debug;

use crate::config::DataServiceConfig;
use crate::error::FetchError;

/// Read access to a table of the data service.
pub trait TableSource {
	/// Reads every row of `table`, projecting `columns`, and returns the raw JSON body.
	fn select(&self, table: &str, columns: &str)
	-> impl Future<Output = Result<String, FetchError>>;
}

/// PostgREST endpoint of a hosted Supabase project.
#[derive(Clone, Debug)]
pub struct PostgrestSource {
	config: DataServiceConfig,
}

impl PostgrestSource {
	pub fn new(config: DataServiceConfig) -> Self {
		Self { config }
	}
}

impl TableSource for PostgrestSource {
	async fn select(&self, table: &str, columns: &str) -> Result<String, FetchError> {
		let url = self.config.table_url(table);
		debug!("GET {url}?select={columns}");

		let transport = |e: gloo_net::Error| FetchError::Transport {
			table: table.to_owned(),
			message: e.to_string(),
		};
		let response = Request::get(&url)
			.query([("select", columns)])
			.header("apikey", &self.config.anon_key)
			.header("Authorization", &format!("Bearer {}", self.config.anon_key))
			.header("Accept", "application/json")
			.send()
			.await
			.map_err(transport)?;

		let body = response.text().await.map_err(transport)?;
		if !response.ok() {
			return Err(FetchError::Status {
				table: table.to_owned(),
				status: response.status(),
				body,
			});
		}
		Ok(body)
	}
}
