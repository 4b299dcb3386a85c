pub mod config;
pub mod error;
pub mod handlers;
pub mod lesson;
pub mod links;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod store;
pub mod types;
