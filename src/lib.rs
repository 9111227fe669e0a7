pub mod config;
pub mod db;
pub mod logging;
pub mod simulator;
pub mod version;
pub mod web;
