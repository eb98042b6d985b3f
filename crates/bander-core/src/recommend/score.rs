//! Candidate-channel interference scoring.
//!
//! Unlike [`crate::congestion`], which judges a channel from the point of
//! view of a network already on it, these functions judge any regulatory
//! channel as a destination, using frequency-distance-weighted interference
//! from every occupied channel in the band.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::{self, Band};
use crate::occupancy::{ChannelOccupancy, OccupancyMap};

// ─── 2.4GHz constants ───
const OVERLAPPING_PENALTY_24: f64 = 20.0;
const CO_CHANNEL_WEIGHT_24: f64 = 50.0;
const STRONG_CO_CHANNEL_24: f64 = 30.0;
/// Three 5 MHz channel steps.
const INTERFERENCE_RADIUS_24_MHZ: u32 = 15;

// ─── 5GHz constants ───
const DFS_PENALTY_5: f64 = 10.0;
const CO_CHANNEL_WEIGHT_5: f64 = 40.0;
const STRONG_CO_CHANNEL_5: f64 = 25.0;
/// Typical 80 MHz 5GHz channel width.
const INTERFERENCE_RADIUS_5_MHZ: u32 = 80;
const SIGNAL_PENALTY_SCALE_5: f64 = 0.8;

/// Co-channel occupants stronger than this add a flat penalty.
const STRONG_SIGNAL_DBM: i32 = -60;
/// Radius for the informational signal-impact figure.
const SIGNAL_IMPACT_RADIUS_MHZ: u32 = 40;

/// Interference bucket for a recommendation score (shared across bands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterferenceLevel {
    Minimal,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl InterferenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 20.0 {
            InterferenceLevel::Minimal
        } else if score <= 50.0 {
            InterferenceLevel::Low
        } else if score <= 100.0 {
            InterferenceLevel::Moderate
        } else if score <= 200.0 {
            InterferenceLevel::High
        } else {
            InterferenceLevel::VeryHigh
        }
    }
}

impl fmt::Display for InterferenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterferenceLevel::Minimal => write!(f, "Minimal"),
            InterferenceLevel::Low => write!(f, "Low"),
            InterferenceLevel::Moderate => write!(f, "Moderate"),
            InterferenceLevel::High => write!(f, "High"),
            InterferenceLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Penalty from a neighbour's strongest signal, attenuated with distance.
///
/// Weight 20 above −40 dBm, 10 above −60, 5 above −80, otherwise 0; scaled
/// by `1 / (1 + d/10)`.
pub fn signal_distance_penalty(strongest_dbm: i32, distance_mhz: u32) -> f64 {
    let weight = if strongest_dbm > -40 {
        20.0
    } else if strongest_dbm > -60 {
        10.0
    } else if strongest_dbm > -80 {
        5.0
    } else {
        0.0
    };
    weight / (1.0 + f64::from(distance_mhz) / 10.0)
}

fn distance_mhz(frequency_mhz: u32, occupant: &ChannelOccupancy) -> u32 {
    frequency_mhz.abs_diff(occupant.frequency_mhz)
}

fn score_24ghz(channel: u16, frequency_mhz: u32, landscape: &OccupancyMap) -> f64 {
    let mut score = if channel::is_non_overlapping_24ghz(channel) {
        0.0
    } else {
        OVERLAPPING_PENALTY_24
    };

    for occ in landscape.iter() {
        let d = distance_mhz(frequency_mhz, occ);
        let count = f64::from(occ.network_count);
        if d == 0 {
            score += count * CO_CHANNEL_WEIGHT_24;
            if occ.strongest_signal_dbm > STRONG_SIGNAL_DBM {
                score += STRONG_CO_CHANNEL_24;
            }
        } else if d <= INTERFERENCE_RADIUS_24_MHZ {
            let weight = 30.0 - 2.0 * f64::from(d);
            score += weight * count;
            score += signal_distance_penalty(occ.strongest_signal_dbm, d);
        }
    }
    score
}

fn score_5ghz(channel: u16, frequency_mhz: u32, landscape: &OccupancyMap) -> f64 {
    let mut score = if channel::is_dfs(channel) {
        DFS_PENALTY_5
    } else {
        0.0
    };

    for occ in landscape.iter() {
        let d = distance_mhz(frequency_mhz, occ);
        let count = f64::from(occ.network_count);
        if d == 0 {
            score += count * CO_CHANNEL_WEIGHT_5;
            if occ.strongest_signal_dbm > STRONG_SIGNAL_DBM {
                score += STRONG_CO_CHANNEL_5;
            }
        } else if d <= INTERFERENCE_RADIUS_5_MHZ {
            let weight = f64::from(INTERFERENCE_RADIUS_5_MHZ - d) / 10.0;
            score += weight * count;
            score += SIGNAL_PENALTY_SCALE_5 * signal_distance_penalty(occ.strongest_signal_dbm, d);
        }
    }
    score
}

/// Interference score for moving to `channel` given the band's landscape.
/// Lower is better.
pub fn candidate_score(band: Band, channel: u16, landscape: &OccupancyMap) -> f64 {
    let frequency_mhz = channel::frequency_of(channel);
    match band {
        Band::Ghz24 => score_24ghz(channel, frequency_mhz, landscape),
        Band::Ghz5 => score_5ghz(channel, frequency_mhz, landscape),
    }
}

/// Distance to the nearest occupied frequency, excluding the candidate's own.
///
/// `None` when no other channel in the landscape is occupied.
pub fn frequency_gap(frequency_mhz: u32, landscape: &OccupancyMap) -> Option<u32> {
    landscape
        .iter()
        .map(|occ| distance_mhz(frequency_mhz, occ))
        .filter(|&d| d > 0)
        .min()
}

/// Aggregate RSSI pressure from occupants within 40 MHz.
pub fn signal_impact(frequency_mhz: u32, landscape: &OccupancyMap) -> f64 {
    landscape
        .iter()
        .filter_map(|occ| {
            let d = distance_mhz(frequency_mhz, occ);
            (d <= SIGNAL_IMPACT_RADIUS_MHZ)
                .then(|| f64::from(-occ.strongest_signal_dbm) / f64::from(d + 1))
        })
        .sum()
}
