//! Feature modules
//!
//! Each module is a set of command handlers built on the codec in
//! `infrastructure`.

pub mod toolkit;
