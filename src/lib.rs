// src/lib.rs

//! EduPulse Portal Core Library

pub mod assistant;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;
