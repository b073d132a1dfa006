//! I/O helpers for shell commands.

pub mod config;
