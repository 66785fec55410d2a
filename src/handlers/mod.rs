// src/handlers/mod.rs

pub mod auth;
pub mod courses;
pub mod exam;
