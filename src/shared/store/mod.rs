use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod supabase_store;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Request error: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Invalid API key header: {0}")]
  InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

  /// Only the PostgREST `code` and `message` are kept. `details` can echo
  /// the rejected row, hash included.
  #[error("Store responded with {status}: {message}")]
  Status {
    status: u16,
    code: Option<String>,
    message: String,
  },

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Expected at most one row, store returned {0}")]
  Ambiguous(usize),
}

/// Equality filter, every condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
  conditions: Vec<(String, String)>,
}

impl Filter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
    self.conditions.push((column.to_string(), value.to_string()));
    self
  }

  pub fn conditions(&self) -> &[(String, String)] {
    &self.conditions
  }
}

/// Row store reached over the network. Only the two primitives the
/// registration and login flows need.
pub trait TableStore {
  /// Returns the single row matching `filter`, `None` when nothing matches.
  /// More than one match is an error.
  async fn select_one<T: DeserializeOwned>(
    &self,
    table: &str,
    filter: &Filter,
  ) -> Result<Option<T>, StoreError>;

  async fn insert<T: Serialize + Sync>(
    &self,
    table: &str,
    record: &T,
  ) -> Result<(), StoreError>;
}
