use std::time::Duration;

use actix_web::{rt::time::sleep, web, HttpResponse, Responder};
use dto::login_dto::LoginDto;
use rto::login_rto::LoginRto;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::shared::hash_worker::{HashWorkerError, Hasher};
use crate::shared::http_error::HttpError;
use crate::shared::model::identity_reference::IdentityReference;
use crate::shared::repository::user_repository::{
  FindOneProperty, UserRepository, UserRepositoryError,
};
use crate::AppState;

pub mod dto;
pub mod rto;

pub const LOGIN_SUCCEEDED: &str = "Redirecting to Home...";
pub const USER_NOT_FOUND: &str =
  "User or role not found. Please register first.";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";
pub const LOGIN_FAILED: &str = "An error occurred during login.";

#[derive(Error, Debug)]
pub enum AuthError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValidationErrors),
  /// No row for this email and role. A failed lookup lands here too, with
  /// the repository error kept as the source.
  #[error("User not found")]
  NotFound {
    #[source]
    source: Option<UserRepositoryError>,
  },
  #[error("Wrong password")]
  WrongPassword,
  #[error("Hash error: {0}")]
  Hash(#[from] HashWorkerError),
}

impl AuthError {
  pub fn message(&self) -> &'static str {
    match self {
      AuthError::NotFound { .. } => USER_NOT_FOUND,
      AuthError::WrongPassword => INCORRECT_PASSWORD,
      AuthError::Validation(_) | AuthError::Hash(_) => LOGIN_FAILED,
    }
  }
}

/// Look up the record for `email` and `role`, verify the password and hand
/// back the identity reference.
///
/// The `handoff_delay` pause happens only after a successful verification.
/// Dropping the returned future abandons the attempt, nothing keeps running
/// on its behalf.
pub async fn authenticate<UR: UserRepository>(
  user_repository: &UR,
  hasher: &dyn Hasher,
  dto: &LoginDto,
  handoff_delay: Duration,
) -> Result<IdentityReference, AuthError> {
  dto.validate()?;

  let user = user_repository
    .find_one(FindOneProperty::EmailAndRole(&dto.email, dto.role))
    .await
    .map_err(|error| AuthError::NotFound {
      source: Some(error),
    })?
    .ok_or(AuthError::NotFound { source: None })?;

  if !hasher
    .verify_password(&dto.password, &user.password_hash)
    .await?
  {
    return Err(AuthError::WrongPassword);
  }

  sleep(handoff_delay).await;

  Ok(IdentityReference {
    id: user.id,
    role: dto.role,
  })
}

#[utoipa::path(
  get,
  path = "/v1/auth/login",
  responses(
    (status = 200, description = "Blank login form", body = LoginDto)
  )
)]
pub async fn login_form() -> impl Responder {
  HttpResponse::Ok()
    .content_type("application/json")
    .json(LoginDto::default())
}

#[utoipa::path(
  post,
  path = "/v1/auth/login",
  request_body = LoginDto,
  responses(
    (status = 200, description = "Credentials verified", body = LoginRto),
    (status = 400, description = "A required field is missing", body = HttpError),
    (status = 401, description = "Unknown user, wrong role or wrong password", body = HttpError),
    (status = 500, description = "Password verification failed", body = HttpError)
  )
)]
pub async fn auth_login<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  dto: web::Json<LoginDto>,
) -> impl Responder {
  let result = authenticate(
    &data.user_repository,
    data.hasher.as_ref(),
    &dto,
    data.config.redirect_delay,
  )
  .await;

  match result {
    Ok(reference) => {
      tracing::info!(id = %reference.id, role = %reference.role, "Login successful");
      HttpResponse::Ok()
        .content_type("application/json")
        .json(LoginRto {
          message: String::from(LOGIN_SUCCEEDED),
          reference,
        })
    }
    Err(error) => match &error {
      AuthError::NotFound { source: Some(cause) } => {
        tracing::error!(%cause, "Login lookup failed");
        unauthorized(&error)
      }
      AuthError::NotFound { source: None } | AuthError::WrongPassword => {
        tracing::info!(%error, "Login rejected");
        unauthorized(&error)
      }
      AuthError::Validation(_) => HttpResponse::BadRequest()
        .content_type("application/json")
        .json(HttpError::from(error.message())),
      AuthError::Hash(_) => {
        tracing::error!(%error, "Password verification failed");
        HttpResponse::InternalServerError()
          .content_type("application/json")
          .json(HttpError::from(error.message()))
      }
    },
  }
}

fn unauthorized(error: &AuthError) -> HttpResponse {
  HttpResponse::Unauthorized()
    .content_type("application/json")
    .json(HttpError::from(error.message()))
}
