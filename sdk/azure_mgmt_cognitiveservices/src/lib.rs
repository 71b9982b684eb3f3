#![doc = include_str!("../README.md")]

pub mod commitment_plans;
pub mod models;
