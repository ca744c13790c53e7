//! AIP runner CLI — command implementations shared by the binary and tests.

pub mod commands;
