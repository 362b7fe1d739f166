// Internal modules
pub mod models;
pub mod repository;
