pub mod auth;
pub mod config;
pub mod counters;
pub mod db;
pub mod http;
pub mod repositories;
