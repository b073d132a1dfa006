//! Structured-result substrate shared by every module.
//!
//! Core modules are free of I/O apart from the logger's echo sink. Validators
//! are pure; loggers own their state and never share it.

pub mod logger;
pub mod outcome;
pub mod sink;
pub mod validator;
