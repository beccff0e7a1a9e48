use actix_web::http::StatusCode;
use thiserror::Error;

use crate::shared::{
  model::user::{User, UserId},
  repository::user_repository::UserRepositoryError,
};

pub const NO_USER_DATA: &str = "No user data found.";
pub const FETCH_FAILED: &str = "An error occurred while fetching user data.";

#[derive(Error, Debug)]
pub enum HomeError {
  #[error("No identity reference supplied")]
  NoUserData,
  #[error("No user with id {0}")]
  Missing(UserId),
  #[error("Lookup failed: {0}")]
  Lookup(#[from] UserRepositoryError),
}

impl HomeError {
  pub fn message(&self) -> &'static str {
    match self {
      HomeError::NoUserData => NO_USER_DATA,
      HomeError::Missing(_) | HomeError::Lookup(_) => FETCH_FAILED,
    }
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      HomeError::NoUserData => StatusCode::BAD_REQUEST,
      HomeError::Missing(_) => StatusCode::NOT_FOUND,
      HomeError::Lookup(_) => StatusCode::BAD_GATEWAY,
    }
  }
}

/// State of one home view invocation. Starts at `Loading` and settles on
/// `Loaded` or `Errored`, after which it no longer changes. `Loading` never
/// leaves `resolve_and_render`.
#[derive(Debug)]
pub enum HomeView {
  Loading,
  Loaded(User),
  Errored(HomeError),
}

impl HomeView {
  pub fn settle(self, outcome: Result<User, HomeError>) -> Self {
    match self {
      HomeView::Loading => match outcome {
        Ok(user) => HomeView::Loaded(user),
        Err(error) => HomeView::Errored(error),
      },
      settled => settled,
    }
  }

  pub fn is_settled(&self) -> bool {
    !matches!(self, HomeView::Loading)
  }
}
