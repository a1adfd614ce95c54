//! Server-rendered HTML pages.

use actix_web::{get, web, HttpResponse};
use sea_orm::{EntityTrait, QueryOrder};

use crate::{app_state::AppState, database::models::animals, errors::AppError};

const PAGE_TITLE: &str = "Our Jungle Residents";

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_index(animal_list: &[animals::Model]) -> String {
    let mut rows = String::new();
    for animal in animal_list {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&animal.name),
            escape_html(&animal.species),
            animal.age
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <h1>{title}</h1>\n\
         <table>\n<tr><th>Name</th><th>Species</th><th>Age</th></tr>\n{rows}</table>\n\
         <h2>Add or update an animal</h2>\n\
         <form action=\"/api/upsert\" method=\"post\">\n\
         <label>Name <input type=\"text\" name=\"name\" required></label>\n\
         <label>Species <input type=\"text\" name=\"species\" required></label>\n\
         <label>Age <input type=\"number\" name=\"age\" min=\"0\" required></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n</body>\n</html>\n",
        title = PAGE_TITLE,
        rows = rows
    )
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    responses(
        (status = 200, description = "HTML page listing all animals", body = String, content_type = "text/html")
    )
)]
#[get("/")]
pub async fn index(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let animal_list = animals::Entity::find()
        .order_by_asc(animals::Column::Id)
        .all(&data.db)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_index(&animal_list)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lists_animals_and_title() {
        let residents = vec![animals::Model {
            id: 1,
            name: "Larry".to_string(),
            species: "Leopard".to_string(),
            age: 5,
        }];
        let html = render_index(&residents);
        assert!(html.contains("Our Jungle Residents"));
        assert!(html.contains("<td>Larry</td>"));
        assert!(html.contains("<td>Leopard</td>"));
    }

    #[test]
    fn animal_names_are_escaped() {
        let residents = vec![animals::Model {
            id: 1,
            name: "<b>Sly</b>".to_string(),
            species: "Snake".to_string(),
            age: 3,
        }];
        let html = render_index(&residents);
        assert!(!html.contains("<b>Sly</b>"));
        assert!(html.contains("&lt;b&gt;Sly&lt;/b&gt;"));
    }
}
