// src/lib.rs

//! jobskills: job posting collector and skill tally library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
