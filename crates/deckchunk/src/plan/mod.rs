mod chunk;
mod config;
mod planner;
#[cfg(test)]
mod tests;

pub use chunk::*;
pub use config::*;
pub use planner::*;
