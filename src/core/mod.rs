//! Core types shared across nameseek

pub mod config;
pub mod error;
