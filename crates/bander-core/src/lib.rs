//! Core engine for WiFi channel analysis.
//!
//! This crate contains:
//! - **Channel model**: regulatory channel tables, centre frequencies, DFS flags
//! - **Observations**: the canonical scanned access-point record and estimators
//! - **Occupancy**: per-channel aggregation of one scan cycle
//! - **Congestion scoring**: how crowded each observed network's channel is
//! - **Recommendation**: ranking every regulatory channel as a destination
//! - **Analysis**: the per-cycle pipeline tying the above together
//!
//! Everything here is pure computation: no I/O, no state between calls.

pub mod analysis;
pub mod channel;
pub mod congestion;
pub mod observation;
pub mod occupancy;
pub mod recommend;

pub use analysis::{Analyzer, ScanReport};
pub use channel::{Band, ChannelPlan, ChannelWidth, Region};
pub use congestion::{CongestionLevel, ScoredObservation};
pub use observation::NetworkObservation;
pub use recommend::{BandRecommendations, ChannelRecommendation, ChannelRecommender, InterferenceLevel};
