//! Provider fetch adapters: turn a remote API into engine input.

pub mod artificial_analysis;
mod common;
