pub mod config;
pub mod logging;

pub mod catalog;
pub mod fetch;
pub mod progress;
pub mod provision;
pub mod verify;
