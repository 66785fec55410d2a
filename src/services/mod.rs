// src/services/mod.rs

//! Business operations, independent of HTTP.
//! Handlers call these and hand the results to `views`.

pub mod accounts;
pub mod courses;
pub mod enrollment;
pub mod exam;

#[cfg(test)]
pub(crate) mod test_support;
