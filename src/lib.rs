pub mod assignment;
pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod identity;
pub mod io;
pub mod normalization;
pub mod progress;
pub mod recording;
pub mod routes;
pub mod search;
pub mod store;
pub mod text;
