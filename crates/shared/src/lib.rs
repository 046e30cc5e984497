//! Shared utilities for the last-mile admin backend.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id
//! - Session token signing and verification
//! - Coordinate and text validation helpers

pub mod jwt;
pub mod password;
pub mod validation;
