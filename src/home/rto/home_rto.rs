use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::home::view::HomeView;

pub const HOME_TITLE: &str = "Welcome Home";
pub const LOG_IN_AGAIN: &str = "No user data found. Please log in again.";

#[derive(ToSchema, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
  /// Internal to `resolve_and_render`. The home handler only answers with a
  /// settled view, so clients see `loaded` or `errored`.
  Loading,
  Loaded,
  Errored,
}

/// Rendered home view. Only the display name and role of the record are
/// surfaced, never its email or hash.
#[derive(ToSchema, Debug, Clone, Serialize, Deserialize)]
pub struct HomeRto {
  pub state: ViewState,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub welcome: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub access: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Present whenever no record is loaded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notice: Option<String>,
}

impl From<&HomeView> for HomeRto {
  fn from(view: &HomeView) -> Self {
    let mut rto = Self {
      state: ViewState::Loading,
      title: String::from(HOME_TITLE),
      welcome: None,
      role: None,
      access: None,
      error: None,
      notice: None,
    };
    match view {
      HomeView::Loading => {
        rto.notice = Some(String::from(LOG_IN_AGAIN));
      }
      HomeView::Loaded(user) => {
        rto.state = ViewState::Loaded;
        rto.welcome = Some(format!("Welcome, {}!", user.full_name));
        rto.role = Some(format!("Role: {}", user.role));
        rto.access =
          Some(format!("You have {} access. Manage settings here.", user.role));
      }
      HomeView::Errored(error) => {
        rto.state = ViewState::Errored;
        rto.error = Some(error.message().to_string());
        rto.notice = Some(String::from(LOG_IN_AGAIN));
      }
    }
    rto
  }
}
