pub mod admin;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod health;
pub mod models;
