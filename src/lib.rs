pub mod cache;
pub mod calculator;
pub mod config;
pub mod debounce;
pub mod demo_gateway;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod input_store;
pub mod model;
pub mod provider;
pub mod pvm;
pub mod resolve;
pub mod skills;
pub mod state;
pub mod upgrades;
