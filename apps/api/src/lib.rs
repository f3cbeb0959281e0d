pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod documents;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod session;
pub mod state;
