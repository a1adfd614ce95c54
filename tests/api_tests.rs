//! End-to-end tests against the full route tree, backed by an in-memory
//! SQLite database. The pool is capped at one connection because every
//! sqlx connection to `sqlite::memory:` would otherwise get its own database.

use actix_web::{middleware, test, web, App};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;

use jungle_api::api::{animals, auth, pages};
use jungle_api::app_state::AppState;
use jungle_api::config::Config;
use jungle_api::database::schema;
use jungle_api::services::auth::AuthService;

fn test_config() -> Config {
    Config {
        host: None,
        port: None,
        database_url: None,
        secret_key: Some("test-secret".to_string()),
        access_token_expire_minutes: Some(30),
        admin_username: Some("admin".to_string()),
        admin_password: Some("password".to_string()),
    }
}

async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("failed to open test database");
    schema::create_tables(&db).await.expect("failed to create tables");
    schema::seed_animals(&db).await.expect("failed to seed animals");
    db
}

async fn test_state() -> AppState {
    let config = test_config();
    AppState {
        db: test_db().await,
        auth: AuthService::from_config(&config).expect("failed to build auth service"),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(middleware::NormalizePath::trim())
                .app_data(web::Data::new($state))
                .service(
                    web::scope("/api")
                        .configure(animals::init_routes)
                        .configure(auth::init_routes),
                )
                .configure(pages::init_routes),
        )
        .await
    };
}

macro_rules! login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/token")
            .set_json(serde_json::json!({"username": "admin", "password": "password"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        assert_eq!(body["token_type"], "bearer");
        body["access_token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }};
}

#[actix_web::test]
async fn login_returns_bearer_token() {
    let app = init_app!(test_state().await);
    let token = login!(app);
    assert!(!token.is_empty());
}

#[actix_web::test]
async fn login_with_wrong_credentials_is_rejected() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/token")
        .set_json(serde_json::json!({"username": "wrong", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn secure_data_requires_an_api_key() {
    let app = init_app!(test_state().await);

    let req = test::TestRequest::get().uri("/api/secure-data").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/secure-data")
        .insert_header(("x-api-key", "not-a-real-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn api_key_lifecycle() {
    let app = init_app!(test_state().await);
    let token = login!(app);

    // Issue a key as admin.
    let req = test::TestRequest::post()
        .uri("/api/auth/api-key?name=integration")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let key: Value = test::read_body_json(resp).await;
    let key_value = key["key"].as_str().unwrap().to_string();
    let key_id = key["id"].as_i64().unwrap();

    // The key opens the protected endpoint.
    let req = test::TestRequest::get()
        .uri("/api/secure-data")
        .insert_header(("x-api-key", key_value.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "This is protected data!");

    // It shows up in the listing with its use recorded.
    let req = test::TestRequest::get()
        .uri("/api/auth/api-key")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let keys: Value = test::call_and_read_body_json(&app, req).await;
    let listed = keys
        .as_array()
        .unwrap()
        .iter()
        .find(|k| k["id"].as_i64() == Some(key_id))
        .expect("issued key not listed");
    assert_eq!(listed["total_queries"], 1);

    // Revoked keys stop working.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/auth/api-key/{}", key_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/secure-data")
        .insert_header(("x-api-key", key_value))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Revocation is idempotent: a second revoke is a 200 no-op.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/auth/api-key/{}", key_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let key: Value = test::read_body_json(resp).await;
    assert_eq!(key["id"].as_i64(), Some(key_id));
    assert_eq!(key["is_active"], false);
}

#[actix_web::test]
async fn revoke_missing_api_key_is_404() {
    let app = init_app!(test_state().await);
    let token = login!(app);
    let req = test::TestRequest::delete()
        .uri("/api/auth/api-key/999")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn api_key_management_requires_admin_token() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/auth/api-key?name=sneaky")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn index_page_lists_residents() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Our Jungle Residents"));
    assert!(html.contains("Larry"));
}

#[actix_web::test]
async fn upsert_inserts_then_updates() {
    let app = init_app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/upsert")
        .set_form([("name", "Max"), ("species", "Monkey"), ("age", "4")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Saved Max the Monkey (Age: 4) to the database.");

    let req = test::TestRequest::post()
        .uri("/api/upsert")
        .set_form([("name", "Max"), ("species", "Monkey"), ("age", "5")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Saved Max the Monkey (Age: 5) to the database.");

    // Still four animals: three seeded plus Max once.
    let req = test::TestRequest::get().uri("/api/animals").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn create_animal_returns_new_id() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/animals")
        .set_json(serde_json::json!({"name": "Tiger", "species": "Tiger", "age": 6}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Added Tiger the Tiger to the database.");
    assert!(body["id"].as_i64().is_some());
}

#[actix_web::test]
async fn create_animal_accepts_unicode_names() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/animals")
        .set_json(serde_json::json!({"name": "Žofka", "species": "Léopard", "age": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Added Žofka the Léopard to the database.");
}

#[actix_web::test]
async fn create_animal_with_negative_age_is_rejected() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/animals")
        .set_json(serde_json::json!({"name": "Benjamin", "species": "Bat", "age": -1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[actix_web::test]
async fn update_animal_by_id() {
    let app = init_app!(test_state().await);

    // Sammy is the second seeded animal.
    let req = test::TestRequest::put()
        .uri("/api/animals/2")
        .set_json(serde_json::json!({"name": "Sammy", "species": "Snake", "age": 4}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Updated Sammy in the database.");
}

#[actix_web::test]
async fn update_missing_animal_is_404() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::put()
        .uri("/api/animals/999")
        .set_json(serde_json::json!({"name": "Ghost", "species": "None", "age": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn delete_animal_by_id() {
    let app = init_app!(test_state().await);

    let req = test::TestRequest::delete().uri("/api/animals/2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Deleted animal with id 2 from the database.");

    // A second delete of the same row is a 404.
    let req = test::TestRequest::delete().uri("/api/animals/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn delete_missing_animal_is_404() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::delete().uri("/api/animals/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn trailing_slashes_are_normalized() {
    let app = init_app!(test_state().await);
    let req = test::TestRequest::get().uri("/api/animals/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn swagger_entry_url_is_reachable() {
    #[derive(utoipa::OpenApi)]
    #[openapi()]
    struct ApiDoc;

    // Same docs mount as src/main.rs: trim() rewrites "/swagger-ui/" to
    // "/swagger-ui", which only the explicit redirect serves.
    let app = test::init_service(
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .service(web::redirect("/swagger-ui", "/swagger-ui/index.html"))
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", <ApiDoc as utoipa::OpenApi>::openapi()),
            ),
    )
    .await;

    for uri in ["/swagger-ui/", "/swagger-ui"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(
            resp.status().is_redirection(),
            "GET {} returned {}",
            uri,
            resp.status()
        );
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/swagger-ui/index.html");
    }

    let req = test::TestRequest::get()
        .uri("/swagger-ui/index.html")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
