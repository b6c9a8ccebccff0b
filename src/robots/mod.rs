//! Robots.txt handling module
//!
//! This module provides the politeness gate: fetching, parsing and caching a
//! whole-host exclusion decision from each host's robots.txt.

mod cache;
mod gate;
mod parser;

pub use cache::{DecisionCache, RobotsDecision};
pub use gate::RobotsGate;
pub use parser::ParsedRobots;
