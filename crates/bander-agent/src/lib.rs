//! Bander agent library: configuration, observation sources, the poll
//! loop, and report rendering. The `bander-agent` binary wires these up.

pub mod config;
pub mod poll;
pub mod report;
pub mod source;
