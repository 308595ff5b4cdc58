//! API endpoint handlers. Handlers stay thin and defer to the pipeline.

pub mod catalog;
pub mod health;
pub mod reports;
