pub mod client;
pub mod config;
pub mod logging;
pub mod names;
pub mod ops;
pub mod poll;
pub mod retry;
