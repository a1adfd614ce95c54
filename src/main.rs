use actix_web::{middleware, web, App, HttpServer};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use jungle_api::api::{animals, auth, middleware::RequestTracing, pages};
use jungle_api::app_state::AppState;
use jungle_api::config::Config;
use jungle_api::database::{self, models, schema};
use jungle_api::services::auth::AuthService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {}", e)))?;
    let db = database::connect_from_url(&config.effective_database_url()).await?;

    schema::create_tables(&db)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to create schema: {}", e)))?;
    schema::seed_animals(&db)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to seed animals: {}", e)))?;

    let auth_service = AuthService::from_config(&config)
        .map_err(|_| std::io::Error::other("Failed to initialize auth service"))?;

    #[derive(OpenApi)]
    #[openapi(
        paths(
            // Pages
            pages::index,
            // Animals
            animals::list_animals,
            animals::create_animal,
            animals::update_animal,
            animals::delete_animal,
            animals::upsert_animal,
            // Auth
            auth::login_for_access_token,
            auth::read_secure_data,
            auth::create_api_key,
            auth::list_api_keys,
            auth::revoke_api_key,
        ),
        components(
            schemas(
                // --- Models ---
                models::animals::Model,
                models::api_keys::Model,

                // --- DTOs & API Structs ---
                animals::AnimalDto,
                animals::UpsertForm,
                auth::LoginDto,
                auth::TokenResponse,
                auth::NewKeyQuery,
            )
        ),
        tags(
            (name = "Pages", description = "Server-rendered HTML pages"),
            (name = "Animals", description = "Animal catalog endpoints"),
            (name = "Auth", description = "Login, API keys and protected data")
        )
    )]
    struct ApiDoc;

    let host = config.effective_host();
    let port = config.effective_port();

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(RequestTracing)
            .app_data(web::Data::new(AppState {
                db: db.clone(),
                auth: auth_service.clone(),
            }))
            .service(
                web::scope("/api")
                    .configure(animals::init_routes)
                    .configure(auth::init_routes),
            )
            // NormalizePath::trim turns "/swagger-ui/" into "/swagger-ui", which the
            // SwaggerUi tail pattern does not match; route it to the index explicitly.
            .service(web::redirect("/swagger-ui", "/swagger-ui/index.html"))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(pages::init_routes)
    })
    .bind((host, port))?
    .run()
    .await
}
