pub mod app;
pub mod config;
pub mod contacts;
pub mod db;
pub mod emails;
pub mod error;
pub mod jobs;
pub mod state;
mod validation;

#[cfg(test)]
mod test_support;
