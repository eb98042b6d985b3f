//! Human-readable justification for a candidate channel.
//!
//! Purely explanatory; nothing here feeds back into ranking.

use crate::channel::{self, Band};
use crate::occupancy::OccupancyMap;

/// Explain a candidate channel given the band's landscape.
pub fn explain(band: Band, channel: u16, landscape: &OccupancyMap) -> String {
    match band {
        Band::Ghz24 => explain_24ghz(channel, landscape),
        Band::Ghz5 => explain_5ghz(channel, landscape),
    }
}

fn explain_24ghz(channel: u16, landscape: &OccupancyMap) -> String {
    let non_overlapping = channel::is_non_overlapping_24ghz(channel);
    match (landscape.get(channel), non_overlapping) {
        (None, true) => "Optimal: non-overlapping channel with no detected networks".into(),
        (None, false) => "Good: no networks detected, minimal interference expected".into(),
        (Some(occ), true) => format!(
            "Fair: non-overlapping but has {} network(s), strongest at {} dBm",
            occ.network_count, occ.strongest_signal_dbm
        ),
        (Some(occ), false) => format!(
            "Suboptimal: overlapping channel with {} network(s)",
            occ.network_count
        ),
    }
}

fn explain_5ghz(channel: u16, landscape: &OccupancyMap) -> String {
    let dfs = channel::is_dfs(channel);
    let Some(occ) = landscape.get(channel) else {
        return if dfs {
            "Good: DFS channel with no detected networks, radar detection required".into()
        } else {
            "Excellent: non-DFS channel with no detected networks".into()
        };
    };

    let status = if occ.network_count == 1 && occ.strongest_signal_dbm < -70 {
        "Good"
    } else {
        "Fair"
    };
    let dfs_note = if dfs { ", DFS required" } else { "" };
    format!(
        "{status}: {} network(s), strongest at {} dBm{dfs_note}",
        occ.network_count, occ.strongest_signal_dbm
    )
}
