mod config;
mod launch;
mod maintenance;
mod mods;

pub use config::*;
pub use launch::*;
pub use maintenance::*;
pub use mods::*;
