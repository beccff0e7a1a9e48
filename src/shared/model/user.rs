use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::role::Role;

/// Store-assigned identifier. Supabase tables commonly use either a bigint
/// identity column or a uuid, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
  Number(i64),
  Text(String),
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UserId::Number(id) => write!(f, "{}", id),
      UserId::Text(id) => f.write_str(id),
    }
  }
}

impl From<String> for UserId {
  fn from(id: String) -> Self {
    UserId::Text(id)
  }
}

impl From<i64> for UserId {
  fn from(id: i64) -> Self {
    UserId::Number(id)
  }
}

/// A row of the users table.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub full_name: String,
  pub email: String,
  #[serde(rename = "password")]
  pub password_hash: String,
  pub role: Role,
}

/// A row about to be inserted; the store assigns the id.
#[derive(Clone, Serialize)]
pub struct NewUser {
  pub full_name: String,
  pub email: String,
  #[serde(rename = "password")]
  pub password_hash: String,
  pub role: Role,
}

impl fmt::Debug for User {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("User")
      .field("id", &self.id)
      .field("full_name", &self.full_name)
      .field("email", &self.email)
      .field("password_hash", &"<redacted>")
      .field("role", &self.role)
      .finish()
  }
}

impl fmt::Debug for NewUser {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NewUser")
      .field("full_name", &self.full_name)
      .field("email", &self.email)
      .field("password_hash", &"<redacted>")
      .field("role", &self.role)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_user_id_accepts_number_and_text() {
    let user: User = serde_json::from_value(json!({
      "id": 42,
      "full_name": "Alice",
      "email": "a@x.com",
      "password": "$2b$10$hash",
      "role": "User"
    }))
    .unwrap();
    assert_eq!(user.id, UserId::Number(42));
    assert_eq!(user.id.to_string(), "42");
    assert_eq!(user.password_hash, "$2b$10$hash");

    let id: UserId =
      serde_json::from_value(json!("8b7f9c1e-2c4e-4d7a-9a51-0c2f3e6d1a77"))
        .unwrap();
    assert_eq!(id.to_string(), "8b7f9c1e-2c4e-4d7a-9a51-0c2f3e6d1a77");
  }

  #[test]
  fn test_new_user_uses_password_column() {
    let new_user = NewUser {
      full_name: String::from("Alice"),
      email: String::from("a@x.com"),
      password_hash: String::from("$2b$10$hash"),
      role: Role::Admin,
    };

    let value = serde_json::to_value(&new_user).unwrap();

    assert_eq!(
      value,
      json!({
        "full_name": "Alice",
        "email": "a@x.com",
        "password": "$2b$10$hash",
        "role": "Admin"
      })
    );
  }

  #[test]
  fn test_debug_redacts_hash() {
    let new_user = NewUser {
      full_name: String::from("Alice"),
      email: String::from("a@x.com"),
      password_hash: String::from("$2b$10$hash"),
      role: Role::User,
    };

    let rendered = format!("{:?}", new_user);

    assert!(!rendered.contains("$2b$10$hash"));
    assert!(rendered.contains("<redacted>"));
  }
}
