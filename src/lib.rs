pub mod apis;
pub mod balances;
pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod logger;
pub mod paths;
pub mod services;
pub mod tokens;
