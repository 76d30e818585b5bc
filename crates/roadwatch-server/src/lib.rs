//! Shared library surface for roadwatch server utilities and tests.

pub mod api;
pub mod config;
pub mod dataset;
pub mod loops;
pub mod planner;
pub mod state;
