//! # Congestion Scoring
//!
//! Scores each observed network by how crowded its own channel is.
//!
//! $$\text{score} = 10 \cdot n_{\text{same}} + 5 \cdot \sum_{|k| \in \{1,2\}} n_{c+k} + 8 \cdot \text{stations} + P_{\text{signal}}$$
//!
//! The adjacent-channel term applies to 2.4GHz only; 5GHz primary channels
//! are 20 MHz apart and their leakage is not modelled here. There is no
//! upper bound on the score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::Band;
use crate::observation::NetworkObservation;
use crate::occupancy::OccupancyMap;

const SAME_CHANNEL_WEIGHT: u32 = 10;
const ADJACENT_CHANNEL_WEIGHT: u32 = 5;
const STATION_WEIGHT: u32 = 8;
/// Channel offsets whose spectral masks overlap a 2.4GHz channel.
const ADJACENT_OFFSETS: [i32; 4] = [-2, -1, 1, 2];

/// Human-readable congestion bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl CongestionLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=15 => CongestionLevel::Low,
            16..=30 => CongestionLevel::Medium,
            31..=50 => CongestionLevel::High,
            _ => CongestionLevel::VeryHigh,
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongestionLevel::Low => write!(f, "Low"),
            CongestionLevel::Medium => write!(f, "Medium"),
            CongestionLevel::High => write!(f, "High"),
            CongestionLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// An observation decorated with its congestion score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredObservation {
    #[serde(flatten)]
    pub observation: NetworkObservation,
    pub congestion_score: u32,
    pub congestion_level: CongestionLevel,
}

/// Penalty for a strong beacon: > −50 dBm → 20, (−70, −50] → 10.
fn signal_penalty(signal_dbm: i32) -> u32 {
    if signal_dbm > -50 {
        20
    } else if signal_dbm > -70 {
        10
    } else {
        0
    }
}

/// Congestion score for one network given the whole cycle's occupancy.
pub fn congestion_score(network: &NetworkObservation, occupancy: &OccupancyMap) -> u32 {
    let channel = network.channel;
    // Station counts come straight from scanners and snapshots; saturate
    // rather than overflow.
    let mut score = occupancy
        .network_count(channel)
        .saturating_mul(SAME_CHANNEL_WEIGHT);

    if network.band == Band::Ghz24 {
        for offset in ADJACENT_OFFSETS {
            let Ok(adjacent) = u16::try_from(i32::from(channel) + offset) else {
                continue;
            };
            score = score.saturating_add(
                occupancy
                    .network_count(adjacent)
                    .saturating_mul(ADJACENT_CHANNEL_WEIGHT),
            );
        }
    }

    score
        .saturating_add(network.station_count.saturating_mul(STATION_WEIGHT))
        .saturating_add(signal_penalty(network.signal_dbm))
}

/// Score every usable observation against the occupancy of the full set.
///
/// Output preserves input order; observations with channel 0 are dropped.
pub fn score_observations(observations: &[NetworkObservation]) -> Vec<ScoredObservation> {
    let occupancy = OccupancyMap::from_observations(observations);
    observations
        .iter()
        .filter(|o| o.is_usable())
        .map(|o| {
            let score = congestion_score(o, &occupancy);
            ScoredObservation {
                observation: o.clone(),
                congestion_score: score,
                congestion_level: CongestionLevel::from_score(score),
            }
        })
        .collect()
}
