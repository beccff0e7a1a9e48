use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserId;
use crate::shared::role::Role;

/// Handed from a successful login to the home view. Never persisted.
#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityReference {
  #[schema(value_type = String)]
  pub id: UserId,
  pub role: Role,
}
