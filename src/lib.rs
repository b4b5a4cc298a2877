//! Sensor Registry - sensor identity, metadata and latest readings
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
