pub mod dto;
pub mod rto;

use actix_web::{web, HttpResponse, Responder};
use dto::registration_form::RegistrationForm;
use rto::register_rto::RegisterRto;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::shared::hash_worker::{HashWorkerError, Hasher};
use crate::shared::model::user::NewUser;
use crate::shared::repository::user_repository::{
  UserRepository, UserRepositoryError,
};
use crate::AppState;

pub const REGISTRATION_SUCCEEDED: &str =
  "Registration Successful! Please login.";
pub const REGISTRATION_FAILED: &str =
  "Error during registration. Please try again.";

#[derive(Error, Debug)]
pub enum RegistrationError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValidationErrors),
  #[error("Hash error: {0}")]
  Hash(#[from] HashWorkerError),
  #[error("Repository error: {0}")]
  Repository(#[from] UserRepositoryError),
}

/// Hash the submitted password and insert a new identity record.
///
/// Nothing reaches the store unless every field validates. On success the
/// form is cleared in place. No uniqueness check is made, registering the
/// same email and role twice creates two rows.
pub async fn register<UR: UserRepository>(
  user_repository: &UR,
  hasher: &dyn Hasher,
  form: &mut RegistrationForm,
) -> Result<(), RegistrationError> {
  form.validate()?;

  let password_hash = hasher.hash_password(&form.password).await?;
  let user = NewUser {
    full_name: form.full_name.clone(),
    email: form.email.clone(),
    password_hash,
    role: form.role,
  };
  user_repository.create(user).await?;

  form.clear();
  Ok(())
}

#[utoipa::path(
  get,
  path = "/v1/register",
  responses(
    (status = 200, description = "Blank registration form", body = RegistrationForm)
  )
)]
pub async fn registration_form() -> impl Responder {
  HttpResponse::Ok()
    .content_type("application/json")
    .json(RegistrationForm::default())
}

#[utoipa::path(
  post,
  path = "/v1/register",
  request_body = RegistrationForm,
  responses(
    (status = 201, description = "Identity record created", body = RegisterRto),
    (status = 400, description = "A required field is missing or malformed", body = RegisterRto),
    (status = 500, description = "The store rejected the record", body = RegisterRto)
  )
)]
pub async fn register_user<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  form: web::Json<RegistrationForm>,
) -> impl Responder {
  let mut form = form.into_inner();

  match register(&data.user_repository, data.hasher.as_ref(), &mut form).await
  {
    Ok(()) => {
      tracing::info!("Registered new user");
      HttpResponse::Created()
        .content_type("application/json")
        .json(RegisterRto {
          message: String::from(REGISTRATION_SUCCEEDED),
          form,
        })
    }
    Err(RegistrationError::Validation(errors)) => {
      tracing::debug!(%errors, "Rejected registration form");
      HttpResponse::BadRequest()
        .content_type("application/json")
        .json(RegisterRto {
          message: String::from(REGISTRATION_FAILED),
          form,
        })
    }
    Err(error) => {
      tracing::error!(%error, "Registration failed");
      HttpResponse::InternalServerError()
        .content_type("application/json")
        .json(RegisterRto {
          message: String::from(REGISTRATION_FAILED),
          form,
        })
    }
  }
}

#[cfg(test)]
mod tests {
  use actix_web::{http::StatusCode, HttpRequest};
  use fake::{
    faker::{
      internet::en::{Password, SafeEmail},
      name::raw::Name,
    },
    locales::EN,
    Fake,
  };
  use std::sync::Arc;

  use crate::{
    helpers::tests::{http_request, parse_http_response},
    shared::{
      hash_worker::{tests::test_hash_worker, MockHasher},
      repository::user_repository::tests::InMemoryUserRepository,
      role::Role,
    },
    tests::test_config,
  };

  use super::*;

  fn filled_form() -> RegistrationForm {
    RegistrationForm {
      full_name: Name(EN).fake(),
      email: SafeEmail().fake(),
      password: Password(12..13).fake(),
      role: Role::Moderator,
    }
  }

  #[actix_web::test]
  async fn test_register_stores_hash_not_plaintext() {
    let repository = InMemoryUserRepository::new();
    let hasher = test_hash_worker();
    let mut form = filled_form();
    let submitted = form.clone();

    register(&repository, &hasher, &mut form).await.unwrap();

    let users = repository.users.read().unwrap().clone();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].full_name, submitted.full_name);
    assert_eq!(users[0].email, submitted.email);
    assert_eq!(users[0].role, Role::Moderator);
    assert_ne!(users[0].password_hash, submitted.password);
    assert!(bcrypt::verify(&submitted.password, &users[0].password_hash).unwrap());
  }

  #[actix_web::test]
  async fn test_register_clears_form_on_success() {
    let repository = InMemoryUserRepository::new();
    let hasher = test_hash_worker();
    let mut form = filled_form();

    register(&repository, &hasher, &mut form).await.unwrap();

    assert!(form.full_name.is_empty());
    assert!(form.email.is_empty());
    assert!(form.password.is_empty());
    assert_eq!(form.role, Role::User);
  }

  #[actix_web::test]
  async fn test_register_empty_field_never_reaches_store() {
    let repository = InMemoryUserRepository::new();
    let mut hasher = MockHasher::new();
    hasher.expect_hash_password().never();

    for blank in ["full_name", "email", "password"] {
      let mut form = filled_form();
      match blank {
        "full_name" => form.full_name.clear(),
        "email" => form.email.clear(),
        _ => form.password.clear(),
      }

      let result = register(&repository, &hasher, &mut form).await;

      assert!(matches!(result, Err(RegistrationError::Validation(_))));
    }
    assert_eq!(repository.calls(), 0);
  }

  #[actix_web::test]
  async fn test_register_rejects_malformed_email() {
    let repository = InMemoryUserRepository::new();
    let hasher = MockHasher::new();
    let mut form = filled_form();
    form.email = String::from("not-an-email");

    let result = register(&repository, &hasher, &mut form).await;

    assert!(matches!(result, Err(RegistrationError::Validation(_))));
    assert_eq!(repository.calls(), 0);
  }

  #[actix_web::test]
  async fn test_register_allows_duplicate_email_and_role() {
    let repository = InMemoryUserRepository::new();
    let hasher = test_hash_worker();
    let form = filled_form();

    register(&repository, &hasher, &mut form.clone()).await.unwrap();
    register(&repository, &hasher, &mut form.clone()).await.unwrap();

    let users = repository.users.read().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert_ne!(users[0].id, users[1].id);
  }

  #[actix_web::test]
  async fn test_register_keeps_form_when_store_fails() {
    let repository = InMemoryUserRepository::failing();
    let mut hasher = MockHasher::new();
    hasher
      .expect_hash_password()
      .returning(|_| Ok(String::from("$2b$04$hash")));
    let mut form = filled_form();
    let submitted = form.clone();

    let result = register(&repository, &hasher, &mut form).await;

    assert!(matches!(result, Err(RegistrationError::Repository(_))));
    assert_eq!(form.email, submitted.email);
  }

  #[actix_web::test]
  async fn test_register_user_created() {
    let repository = InMemoryUserRepository::new();
    let app_state = AppState {
      user_repository: repository.clone(),
      config: test_config(),
      hasher: Arc::new(test_hash_worker()),
    };
    let request: HttpRequest = http_request();

    let responder =
      register_user(web::Data::new(app_state), web::Json(filled_form())).await;

    let rto: RegisterRto =
      parse_http_response(responder, &request, StatusCode::CREATED).await;

    assert_eq!(rto.message, REGISTRATION_SUCCEEDED);
    assert!(rto.form.full_name.is_empty());
    assert_eq!(rto.form.role, Role::User);
    assert_eq!(repository.users.read().unwrap().len(), 1);
  }

  #[actix_web::test]
  async fn test_register_user_store_failure_is_generic() {
    let mut hasher = MockHasher::new();
    hasher
      .expect_hash_password()
      .returning(|_| Ok(String::from("$2b$04$hash")));
    let app_state = AppState {
      user_repository: InMemoryUserRepository::failing(),
      config: test_config(),
      hasher: Arc::new(hasher),
    };
    let request: HttpRequest = http_request();

    let responder =
      register_user(web::Data::new(app_state), web::Json(filled_form())).await;

    let rto: RegisterRto = parse_http_response(
      responder,
      &request,
      StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;

    assert_eq!(rto.message, REGISTRATION_FAILED);
    assert!(!rto.message.contains("store unavailable"));
  }

  #[actix_web::test]
  async fn test_register_user_validation_failure() {
    let repository = InMemoryUserRepository::new();
    let app_state = AppState {
      user_repository: repository.clone(),
      config: test_config(),
      hasher: Arc::new(MockHasher::new()),
    };
    let request: HttpRequest = http_request();
    let mut form = filled_form();
    form.password.clear();

    let responder =
      register_user(web::Data::new(app_state), web::Json(form)).await;

    let rto: RegisterRto =
      parse_http_response(responder, &request, StatusCode::BAD_REQUEST).await;

    assert_eq!(rto.message, REGISTRATION_FAILED);
    assert_eq!(repository.calls(), 0);
  }
}
