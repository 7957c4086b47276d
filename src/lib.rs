// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod server;
pub mod service;
pub mod session;
pub mod typing_policy;
pub mod word_source;
pub mod word_store;
