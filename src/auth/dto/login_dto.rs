use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::shared::role::Role;

/// Login form. The blank form starts with role `User` and never echoes a
/// password.
#[derive(ToSchema, Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct LoginDto {
  #[validate(length(min = 1, message = "Email is required"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  #[serde(skip_serializing)]
  pub password: String,
  pub role: Role,
}
