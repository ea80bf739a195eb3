pub mod canvas;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fixtures_api;
pub mod http_client;
pub mod layout;
pub mod metrics;
pub mod pipeline;
pub mod radar;
pub mod results;
pub mod selection;
pub mod state;
pub mod strip;
pub mod text;
