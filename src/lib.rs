// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod ics;
pub mod model;
pub mod render;
pub mod storage;
pub mod vault;
