pub mod audit;
pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod templates_structs;
pub mod workflow;
