pub mod api;
pub mod config;
pub mod db_utils;
pub mod error;
pub mod server_extra;
pub mod tables;
