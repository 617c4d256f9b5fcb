//! Core library components.
//!
//! This module contains the reusable business logic for secret storage,
//! infobase export, retention cleanup, cloud upload, and job sequencing.

pub mod config;
pub mod crypto;
pub mod dump;
pub mod retention;
pub mod runner;
pub mod secrets;
pub mod upload;

#[cfg(test)]
pub(crate) mod testutil;
