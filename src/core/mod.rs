//! Configuration and value types shared by every stage of the pipeline

pub mod config;
pub mod models;
