//! Shared test helpers.

#![allow(dead_code)]

pub mod forest_builders;
pub mod recorder;
