//! Library exports for abtube, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod models;
pub mod oauth;
pub mod providers;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
pub mod youtube;
