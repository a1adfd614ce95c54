pub mod animals;
pub mod api_keys;
