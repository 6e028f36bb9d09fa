pub mod analytics;
pub mod bottom_bar;
pub mod config;
pub mod data_core;
pub mod edit_session;
pub mod format;
pub mod graph;
pub mod stores;
