use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::register::dto::registration_form::RegistrationForm;

#[derive(ToSchema, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRto {
  pub message: String,
  pub form: RegistrationForm,
}
