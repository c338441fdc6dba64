pub mod config;
pub mod graph;

pub use config::*;
pub use graph::*;
