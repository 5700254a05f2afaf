//! HTTP service predicting sales from TV, Radio and Newspaper advertising budgets.

pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod routes;
