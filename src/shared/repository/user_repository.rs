use thiserror::Error;

use crate::shared::{
  model::user::{NewUser, User, UserId},
  role::Role,
  store::{Filter, StoreError, TableStore},
};

#[derive(Debug, Error)]
pub enum UserRepositoryError {
  #[error("Store error: {0}")]
  Store(#[from] StoreError),
}

pub enum FindOneProperty<'a> {
  Id(&'a UserId),
  EmailAndRole(&'a str, Role),
}

impl FindOneProperty<'_> {
  fn to_filter(&self) -> Filter {
    match self {
      FindOneProperty::Id(id) => Filter::new().eq("id", id),
      FindOneProperty::EmailAndRole(email, role) => {
        Filter::new().eq("email", email).eq("role", role)
      }
    }
  }
}

pub trait UserRepository {
  async fn find_one(
    &self,
    property: FindOneProperty,
  ) -> Result<Option<User>, UserRepositoryError>;
  async fn create(&self, user: NewUser) -> Result<(), UserRepositoryError>;
}

// ### Table store implementation ###

pub struct UserRepositoryImpl<S: TableStore> {
  store: S,
  table: String,
}

impl<S: TableStore> UserRepositoryImpl<S> {
  pub fn new(store: S, table: &str) -> Self {
    Self {
      store,
      table: table.to_string(),
    }
  }
}

impl<S: TableStore> UserRepository for UserRepositoryImpl<S> {
  async fn find_one<'a>(
    &self,
    property: FindOneProperty<'a>,
  ) -> Result<Option<User>, UserRepositoryError> {
    let user: Option<User> = self
      .store
      .select_one(&self.table, &property.to_filter())
      .await?;
    Ok(user)
  }

  async fn create(&self, user: NewUser) -> Result<(), UserRepositoryError> {
    self.store.insert(&self.table, &user).await?;
    Ok(())
  }
}
