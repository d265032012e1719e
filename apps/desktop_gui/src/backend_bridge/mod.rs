//! Backend worker that runs dashboard requests off the UI thread.

pub mod commands;
pub mod runtime;
