//! Internal macros.

#[macro_use]
mod debug;
