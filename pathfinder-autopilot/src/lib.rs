pub mod config;
pub mod level;
pub mod runner;
pub mod sweep;
pub mod util;
