//! Schema bootstrap and seed data. Tables are created straight from the
//! entities so a fresh SQLite file needs no migration step.

use sea_orm::sea_query::Table;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema, Set};

use super::models::{animals, api_keys};

pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut animals_table = schema.create_table_from_entity(animals::Entity);
    animals_table.if_not_exists();
    db.execute(backend.build(&animals_table)).await?;

    let mut keys_table = schema.create_table_from_entity(api_keys::Entity);
    keys_table.if_not_exists();
    db.execute(backend.build(&keys_table)).await?;

    Ok(())
}

/// Preload the demo residents when the table is empty.
pub async fn seed_animals(db: &DatabaseConnection) -> Result<(), DbErr> {
    if animals::Entity::find().one(db).await?.is_some() {
        return Ok(());
    }

    let residents = [("Larry", "Leopard", 5), ("Sammy", "Snake", 3), ("Bella", "Bear", 7)];
    let rows = residents.map(|(name, species, age)| animals::ActiveModel {
        name: Set(name.to_string()),
        species: Set(species.to_string()),
        age: Set(age),
        ..Default::default()
    });

    animals::Entity::insert_many(rows).exec(db).await?;
    log::info!("Seeded {} animals", residents.len());
    Ok(())
}

/// Drop every table. Used by the admin CLI only.
pub async fn drop_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let mut drop_animals = Table::drop();
    drop_animals.table(animals::Entity).if_exists();
    db.execute(backend.build(&drop_animals)).await?;

    let mut drop_keys = Table::drop();
    drop_keys.table(api_keys::Entity).if_exists();
    db.execute(backend.build(&drop_keys)).await?;

    Ok(())
}
