#![doc = include_str!("../README.md")]

pub mod models;
pub mod security_ml_analytics_settings;
