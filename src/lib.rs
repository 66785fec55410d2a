// src/lib.rs

pub mod answers;
pub mod config;
pub mod error;
pub mod grading;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
pub mod views;
