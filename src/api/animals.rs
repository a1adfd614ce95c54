use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    api::validation,
    app_state::AppState,
    database::models::animals,
    errors::AppError,
};

// --- DTOs (Data Transfer Objects) ---

#[derive(Deserialize, ToSchema, Clone)]
pub struct AnimalDto {
    pub name: String,
    pub species: String,
    pub age: i32,
}

/// Form body for the HTML upsert endpoint.
#[derive(Deserialize, ToSchema, Clone)]
pub struct UpsertForm {
    pub name: String,
    pub species: String,
    pub age: i32,
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/animals",
    tag = "Animals",
    responses(
        (status = 200, description = "List all animals", body = [animals::Model])
    )
)]
#[get("")]
pub async fn list_animals(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let animals = animals::Entity::find()
        .order_by_asc(animals::Column::Id)
        .all(&data.db)
        .await?;
    Ok(HttpResponse::Ok().json(animals))
}

#[utoipa::path(
    post,
    path = "/api/animals",
    tag = "Animals",
    request_body = AnimalDto,
    responses(
        (status = 200, description = "Animal created"),
        (status = 400, description = "Invalid input")
    )
)]
#[post("")]
pub async fn create_animal(
    data: web::Data<AppState>,
    body: web::Json<AnimalDto>,
) -> Result<HttpResponse, AppError> {
    validation::validate_animal(&body.name, &body.species, body.age)?;

    let new_animal = animals::ActiveModel {
        name: Set(body.name.clone()),
        species: Set(body.species.clone()),
        age: Set(body.age),
        ..Default::default()
    };
    let created = new_animal.insert(&data.db).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Added {} the {} to the database.", created.name, created.species),
        "id": created.id,
    })))
}

#[utoipa::path(
    put,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(
        ("id" = i32, Path, description = "Animal ID")
    ),
    request_body = AnimalDto,
    responses(
        (status = 200, description = "Animal updated"),
        (status = 404, description = "Animal not found"),
        (status = 400, description = "Invalid input")
    )
)]
#[put("/{id}")]
pub async fn update_animal(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<AnimalDto>,
) -> Result<HttpResponse, AppError> {
    let animal_id = path.into_inner();
    validation::validate_animal(&body.name, &body.species, body.age)?;

    let animal = animals::Entity::find_by_id(animal_id)
        .one(&data.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Animal not found".to_string()))?;

    let mut active = animal.into_active_model();
    active.name = Set(body.name.clone());
    active.species = Set(body.species.clone());
    active.age = Set(body.age);
    let updated = active.update(&data.db).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Updated {} in the database.", updated.name),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(
        ("id" = i32, Path, description = "Animal ID")
    ),
    responses(
        (status = 200, description = "Animal deleted"),
        (status = 404, description = "Animal not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_animal(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let animal_id = path.into_inner();
    let animal = animals::Entity::find_by_id(animal_id)
        .one(&data.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Animal not found".to_string()))?;

    animal.into_active_model().delete(&data.db).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Deleted animal with id {} from the database.", animal_id),
    })))
}

#[utoipa::path(
    post,
    path = "/api/upsert",
    tag = "Animals",
    request_body(content = UpsertForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Animal saved"),
        (status = 400, description = "Invalid input")
    )
)]
#[post("/upsert")]
pub async fn upsert_animal(
    data: web::Data<AppState>,
    form: web::Form<UpsertForm>,
) -> Result<HttpResponse, AppError> {
    validation::validate_animal(&form.name, &form.species, form.age)?;

    // The name acts as the business key: update in place when it already exists.
    let existing = animals::Entity::find()
        .filter(animals::Column::Name.eq(form.name.clone()))
        .one(&data.db)
        .await?;

    let saved = match existing {
        Some(animal) => {
            let mut active = animal.into_active_model();
            active.species = Set(form.species.clone());
            active.age = Set(form.age);
            active.update(&data.db).await?
        }
        None => {
            let new_animal = animals::ActiveModel {
                name: Set(form.name.clone()),
                species: Set(form.species.clone()),
                age: Set(form.age),
                ..Default::default()
            };
            new_animal.insert(&data.db).await?
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": format!(
            "Saved {} the {} (Age: {}) to the database.",
            saved.name, saved.species, saved.age
        ),
    })))
}

// Registers all routes of this module
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upsert_animal).service(
        web::scope("/animals")
            .service(list_animals)
            .service(create_animal)
            .service(update_animal)
            .service(delete_animal),
    );
}
