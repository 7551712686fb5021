//! Core translation engine module

pub mod client;
pub mod config;
pub mod errors;
pub mod languages;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod registry;
