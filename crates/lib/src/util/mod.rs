//! Shared utilities.
//!
//! Test helpers live here so every module's tests build targets and fake
//! runners the same way.

#[cfg(test)]
pub mod testutil;
