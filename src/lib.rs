pub mod api;
pub mod cli;
pub mod config;
pub mod global;
pub mod security;
