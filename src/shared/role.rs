use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema,
)]
pub enum Role {
  #[default]
  User,
  Admin,
  Moderator,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "User",
      Role::Admin => "Admin",
      Role::Moderator => "Moderator",
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
  type Err = UnknownRole;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "User" => Ok(Role::User),
      "Admin" => Ok(Role::Admin),
      "Moderator" => Ok(Role::Moderator),
      other => Err(UnknownRole(other.to_string())),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
