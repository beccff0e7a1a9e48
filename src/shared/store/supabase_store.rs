use reqwest::{
  header::{HeaderMap, HeaderValue, AUTHORIZATION},
  Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Filter, StoreError, TableStore};
use crate::shared::config::Config;

/// Error body returned by PostgREST. `details` and `hint` are not read, a
/// constraint violation echoes the whole failing row in `details`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  code: Option<String>,
  message: Option<String>,
}

impl ErrorBody {
  fn into_error(self, status: StatusCode) -> StoreError {
    let message = self.message.unwrap_or_else(|| {
      status.canonical_reason().unwrap_or("Unknown error").to_string()
    });
    StoreError::Status {
      status: status.as_u16(),
      code: self.code,
      message,
    }
  }
}

/// PostgREST table API as exposed by a Supabase project.
pub struct SupabaseStore {
  base_url: String,
  client: Client,
}

impl SupabaseStore {
  pub fn new(url: &str, api_key: &str) -> Result<Self, StoreError> {
    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(api_key)?;
    key.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
    bearer.set_sensitive(true);
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);

    let client = Client::builder().default_headers(headers).build()?;

    Ok(Self {
      base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
      client,
    })
  }

  pub fn from_config(config: &Config) -> Result<Self, StoreError> {
    Self::new(&config.store_url, &config.store_key)
  }

  fn table_url(&self, table: &str) -> String {
    format!("{}/{}", self.base_url, table)
  }

  async fn send(request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.bytes().await.unwrap_or_default();
      let error_body: ErrorBody =
        serde_json::from_slice(&body).unwrap_or_default();
      return Err(error_body.into_error(status));
    }
    Ok(response)
  }
}

impl TableStore for SupabaseStore {
  async fn select_one<T: DeserializeOwned>(
    &self,
    table: &str,
    filter: &Filter,
  ) -> Result<Option<T>, StoreError> {
    let mut query: Vec<(String, String)> = vec![
      (String::from("select"), String::from("*")),
      // Two rows are enough to tell "exactly one" from "ambiguous".
      (String::from("limit"), String::from("2")),
    ];
    query.extend(
      filter
        .conditions()
        .iter()
        .map(|(column, value)| (column.clone(), format!("eq.{}", value))),
    );

    let response =
      Self::send(self.client.get(self.table_url(table)).query(&query)).await?;
    let body = response.bytes().await?;
    let mut rows: Vec<T> = serde_json::from_slice(&body)?;

    match rows.len() {
      0 => Ok(None),
      1 => Ok(rows.pop()),
      count => Err(StoreError::Ambiguous(count)),
    }
  }

  async fn insert<T: Serialize + Sync>(
    &self,
    table: &str,
    record: &T,
  ) -> Result<(), StoreError> {
    let request = self
      .client
      .post(self.table_url(table))
      .header("Prefer", "return=minimal")
      .json(&[record]);
    Self::send(request).await?;
    Ok(())
  }
}
