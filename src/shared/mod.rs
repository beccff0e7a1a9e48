use actix_web::{HttpResponse, Responder};

pub mod config;
pub mod hash_worker;
pub mod http_error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod role;
pub mod store;

#[utoipa::path(
  get,
  path = "/health",
  responses(
      (status = 200, description = "Check the service health")
  )
)]
pub async fn check_health() -> impl Responder {
  HttpResponse::Ok().finish()
}
