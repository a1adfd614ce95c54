pub mod animals;
pub mod auth;
pub mod middleware;
pub mod pages;
pub mod validation;
