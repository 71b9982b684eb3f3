#![doc = include_str!("../README.md")]

pub mod data_connections;
pub mod models;
