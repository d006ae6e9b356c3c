pub mod auth;
pub mod authoring;
pub mod cache;
pub mod client;
pub mod courses;
pub mod progress;
pub mod purchases;
pub mod quiz_engine;
pub mod roadmap;
