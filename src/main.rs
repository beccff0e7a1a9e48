mod auth;
mod home;
mod register;
mod shared;

use std::{io, sync::Arc};

use actix_web::{
  error::{InternalError, JsonPayloadError, QueryPayloadError},
  middleware::Logger,
  web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use auth::{auth_login, login_form};
use home::home;
use rayon::ThreadPoolBuilder;
use register::{register_user, registration_form};
use shared::{
  check_health,
  config::Config,
  hash_worker::{HashWorker, Hasher},
  http_error::HttpError,
  logging,
  repository::user_repository::{UserRepository, UserRepositoryImpl},
  store::supabase_store::SupabaseStore,
};
use utoipa::OpenApi;

// This struct represents state
pub struct AppState<UR: UserRepository> {
  pub user_repository: UR,
  pub config: Config,
  pub hasher: Arc<dyn Hasher + Send + Sync>,
}

#[derive(OpenApi)]
#[openapi(
  paths(
    shared::check_health,
    register::registration_form,
    register::register_user,
    auth::login_form,
    auth::auth_login,
    home::home,
  ),
  components(schemas(
    register::dto::registration_form::RegistrationForm,
    register::rto::register_rto::RegisterRto,
    auth::dto::login_dto::LoginDto,
    auth::rto::login_rto::LoginRto,
    home::rto::home_rto::HomeRto,
    home::rto::home_rto::ViewState,
    shared::model::identity_reference::IdentityReference,
    shared::http_error::HttpError,
    shared::role::Role,
  ))
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> io::Result<()> {
  dotenvy::dotenv().ok();
  logging::init();

  let config = Config::from_env()
    .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

  let store = SupabaseStore::from_config(&config).map_err(io::Error::other)?;
  let thread_pool = ThreadPoolBuilder::new()
    .num_threads(config.hash_workers)
    .thread_name(|index| format!("hash-worker-{}", index))
    .build()
    .map_err(io::Error::other)?;
  let hasher =
    HashWorker::new(thread_pool, config.hash_workers, config.bcrypt_cost);

  let app_state = web::Data::new(AppState {
    user_repository: UserRepositoryImpl::new(store, &config.users_table),
    config: config.clone(),
    hasher: Arc::new(hasher),
  });

  tracing::info!("Listening on http://{}", config.host);
  HttpServer::new(move || {
    let app_state = app_state.clone();
    App::new()
      .wrap(Logger::default())
      .configure(|config| routes(config, app_state))
  })
  .bind(&config.host)?
  .run()
  .await
}

// Function to initialize the App
fn routes<UR: UserRepository + 'static>(
  config: &mut web::ServiceConfig,
  app_state: web::Data<AppState<UR>>,
) {
  config
    .app_data(app_state)
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .route("/", web::get().to(registration_form))
    .route("/health", web::get().to(check_health))
    .route("/api-docs/openapi.json", web::get().to(openapi_json))
    .service(
      web::scope("/v1")
        .route("/register", web::get().to(registration_form))
        .route("/register", web::post().to(register_user::<UR>))
        .service(
          web::scope("/auth")
            .route("/login", web::get().to(login_form))
            .route("/login", web::post().to(auth_login::<UR>)),
        )
        .route("/home", web::get().to(home::<UR>)),
    );
}

async fn openapi_json() -> impl Responder {
  HttpResponse::Ok().json(ApiDoc::openapi())
}

fn json_error_handler(
  error: JsonPayloadError,
  _request: &HttpRequest,
) -> actix_web::Error {
  tracing::debug!(%error, "Rejected request body");
  let response = HttpResponse::BadRequest()
    .content_type("application/json")
    .json(HttpError::from("Invalid request body"));
  InternalError::from_response(error, response).into()
}

fn query_error_handler(
  error: QueryPayloadError,
  _request: &HttpRequest,
) -> actix_web::Error {
  tracing::debug!(%error, "Rejected query string");
  let response = HttpResponse::BadRequest()
    .content_type("application/json")
    .json(HttpError::from("Invalid query string"));
  InternalError::from_response(error, response).into()
}
