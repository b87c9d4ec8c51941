pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod render;
pub mod service;
