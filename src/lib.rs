//! Quantum Portal: a small state-vector simulator for qubit teleportation.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod render;
