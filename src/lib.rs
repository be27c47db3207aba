// src/lib.rs

//! NexusMods Notifier Library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod systemd;
pub mod utils;
