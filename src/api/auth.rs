use actix_web::{delete, get, http::header, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    app_state::AppState,
    errors::AppError,
    services::{api_keys, token::Claims},
};

pub const API_KEY_HEADER: &str = "x-api-key";

// --- DTOs (Data Transfer Objects) ---

#[derive(Deserialize, ToSchema, Clone)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Deserialize, ToSchema, Clone)]
pub struct NewKeyQuery {
    pub name: String,
}

// --- Helper Functions ---

/// Requires a valid admin bearer token on the request.
fn require_admin(req: &HttpRequest, state: &AppState) -> Result<Claims, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    state.auth.verify_bearer(header)
}

// --- Route Handlers ---

#[utoipa::path(
    post,
    path = "/api/token",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
#[post("/token")]
pub async fn login_for_access_token(
    data: web::Data<AppState>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    let access_token = data.auth.login(&body.username, &body.password)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/secure-data",
    tag = "Auth",
    params(
        ("x-api-key" = String, Header, description = "Issued API key")
    ),
    responses(
        (status = 200, description = "Protected data"),
        (status = 401, description = "API key header missing"),
        (status = 403, description = "Unknown or revoked API key")
    )
)]
#[get("/secure-data")]
pub async fn read_secure_data(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let key_value = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing x-api-key header".to_string()))?;

    let key = api_keys::authorize(&data.db, key_value).await?;
    log::debug!("API key '{}' used, total_queries={}", key.name, key.total_queries);

    Ok(HttpResponse::Ok().json(json!({ "message": "This is protected data!" })))
}

#[utoipa::path(
    post,
    path = "/api/auth/api-key",
    tag = "Auth",
    params(
        ("name" = String, Query, description = "Label for the new key")
    ),
    responses(
        (status = 201, description = "API key issued", body = crate::database::models::api_keys::Model),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
#[post("/api-key")]
pub async fn create_api_key(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NewKeyQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &data)?;
    let key = api_keys::issue(&data.db, &query.name).await?;
    Ok(HttpResponse::Created().json(key))
}

#[utoipa::path(
    get,
    path = "/api/auth/api-key",
    tag = "Auth",
    responses(
        (status = 200, description = "List all issued keys", body = [crate::database::models::api_keys::Model]),
        (status = 401, description = "Missing or invalid admin token")
    )
)]
#[get("/api-key")]
pub async fn list_api_keys(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &data)?;
    let keys = api_keys::list(&data.db).await?;
    Ok(HttpResponse::Ok().json(keys))
}

#[utoipa::path(
    delete,
    path = "/api/auth/api-key/{id}",
    tag = "Auth",
    params(
        ("id" = i32, Path, description = "API key ID")
    ),
    responses(
        (status = 200, description = "API key revoked", body = crate::database::models::api_keys::Model),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "API key not found")
    )
)]
#[delete("/api-key/{id}")]
pub async fn revoke_api_key(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &data)?;
    let key = api_keys::revoke(&data.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(key))
}

// Registers all routes of this module
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_for_access_token)
        .service(read_secure_data)
        .service(
            web::scope("/auth")
                .service(create_api_key)
                .service(list_api_keys)
                .service(revoke_api_key),
        );
}
