#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod http;
pub mod service;
pub mod storage;
pub mod validation;
