pub mod columns;
pub mod config;
pub mod demo_feed;
pub mod export;
pub mod filter;
pub mod http_client;
pub mod params;
pub mod persist;
pub mod provider;
pub mod row;
pub mod row_source;
pub mod scheduler;
pub mod season;
pub mod sort;
pub mod state;
pub mod url_sync;
