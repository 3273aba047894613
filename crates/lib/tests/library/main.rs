//! Library integration tests.
//!
//! These drive the public API against a real filesystem and real child
//! processes, so they are Unix-only.

#![cfg(unix)]

mod common;

mod command_tests;
mod hardlink_tests;
