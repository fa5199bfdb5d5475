pub mod account;
pub mod browse;
pub mod config;
pub mod context;
pub mod movie;
pub mod prompts;
pub mod search;
pub mod ui;
pub mod wishlist;
