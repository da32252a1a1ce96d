pub mod api;
pub mod config;
pub mod http_client;
pub mod locale;
pub mod matches;
pub mod media;
pub mod pages;
pub mod persist;
pub mod players;
pub mod projection;
pub mod queries;
pub mod query;
pub mod state;
pub mod teams;
