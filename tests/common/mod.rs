//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fake_blog;
pub mod fixtures;
