//! HTTP request handlers for the humidex API.

pub mod error;
pub mod health;
pub mod scenarios;
pub mod selection;
