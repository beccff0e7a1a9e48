use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::model::identity_reference::IdentityReference;

#[derive(ToSchema, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRto {
  pub message: String,
  pub reference: IdentityReference,
}
