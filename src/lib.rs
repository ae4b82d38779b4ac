// Library exports so integration tests can drive the modules directly.

pub mod auth;
pub mod chatbot;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod mood;
pub mod routes;
pub mod state;
