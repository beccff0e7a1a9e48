use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::shared::role::Role;

/// Registration form state. Owned by a single request; the password is
/// accepted but never echoed back.
#[derive(ToSchema, Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct RegistrationForm {
  #[validate(length(min = 1, message = "Full name is required"))]
  #[serde(rename = "fullName", default)]
  pub full_name: String,
  #[validate(
    length(min = 1, message = "Email is required"),
    email(message = "Email must be a valid address")
  )]
  #[serde(default)]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  #[serde(default, skip_serializing)]
  pub password: String,
  #[serde(default)]
  pub role: Role,
}

impl RegistrationForm {
  /// Reset to a blank form so the next registration can be entered.
  pub fn clear(&mut self) {
    *self = Self::default();
  }
}
