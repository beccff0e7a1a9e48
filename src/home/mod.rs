pub mod rto;
pub mod view;

use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use rto::home_rto::HomeRto;
use serde::Deserialize;
use utoipa::IntoParams;
use view::{HomeError, HomeView};

use crate::shared::{
  model::{identity_reference::IdentityReference, user::UserId},
  repository::user_repository::{FindOneProperty, UserRepository},
  role::Role,
};
use crate::AppState;

/// Identity reference carried on the home URL after a login.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HomeQuery {
  pub id: Option<String>,
  /// One of `User`, `Admin` or `Moderator`.
  pub role: Option<String>,
}

impl HomeQuery {
  /// A reference needs a non-empty id and a known role. Anything less is
  /// treated as no reference at all.
  pub fn into_reference(self) -> Option<IdentityReference> {
    let id = self.id.filter(|id| !id.is_empty())?;
    let role = match self.role?.parse::<Role>() {
      Ok(role) => role,
      Err(error) => {
        tracing::debug!(%error, "Ignoring identity reference");
        return None;
      }
    };
    Some(IdentityReference {
      id: UserId::from(id),
      role,
    })
  }
}

/// Resolve the reference to its identity record. Without a reference the
/// view errors immediately and the store is never queried.
pub async fn resolve_and_render<UR: UserRepository>(
  user_repository: &UR,
  reference: Option<&IdentityReference>,
) -> HomeView {
  let view = HomeView::Loading;

  let Some(reference) = reference else {
    return view.settle(Err(HomeError::NoUserData));
  };

  let outcome = match user_repository
    .find_one(FindOneProperty::Id(&reference.id))
    .await
  {
    Ok(Some(user)) => Ok(user),
    Ok(None) => Err(HomeError::Missing(reference.id.clone())),
    Err(error) => Err(HomeError::from(error)),
  };
  view.settle(outcome)
}

#[utoipa::path(
  get,
  path = "/v1/home",
  params(HomeQuery),
  responses(
    (status = 200, description = "Identity record resolved", body = HomeRto),
    (status = 400, description = "No identity reference supplied", body = HomeRto),
    (status = 404, description = "The referenced record no longer exists", body = HomeRto),
    (status = 502, description = "The store lookup failed", body = HomeRto)
  )
)]
pub async fn home<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  query: web::Query<HomeQuery>,
) -> impl Responder {
  let reference = query.into_inner().into_reference();
  let view = resolve_and_render(&data.user_repository, reference.as_ref()).await;
  debug_assert!(view.is_settled());

  let status = match &view {
    HomeView::Errored(error) => {
      match error {
        HomeError::Lookup(_) => tracing::error!(%error, "Home lookup failed"),
        _ => tracing::warn!(%error, "Home view errored"),
      }
      error.status_code()
    }
    _ => StatusCode::OK,
  };

  HttpResponse::build(status)
    .content_type("application/json")
    .json(HomeRto::from(&view))
}
