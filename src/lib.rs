// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod connection;
pub mod graph;
pub mod json_schema;
pub mod schema;
pub mod source;
pub mod state;
