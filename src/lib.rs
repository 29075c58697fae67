pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod recur;
pub mod sync;
