//! Per-channel aggregation of one scan cycle's observations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channel::{self, Band};
use crate::observation::NetworkObservation;

/// Aggregate state of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOccupancy {
    pub channel: u16,
    /// Resolved once when the channel is first seen.
    pub frequency_mhz: u32,
    pub network_count: u32,
    pub strongest_signal_dbm: i32,
}

impl ChannelOccupancy {
    fn first(obs: &NetworkObservation) -> Self {
        ChannelOccupancy {
            channel: obs.channel,
            // Unknown channels already carry the fallback from ingestion.
            frequency_mhz: channel::checked_frequency_of(obs.channel)
                .unwrap_or_else(|| obs.frequency_mhz()),
            network_count: 1,
            strongest_signal_dbm: obs.signal_dbm,
        }
    }

    fn record(&mut self, signal_dbm: i32) {
        self.network_count = self.network_count.saturating_add(1);
        self.strongest_signal_dbm = self.strongest_signal_dbm.max(signal_dbm);
    }
}

/// Channel → occupancy map, rebuilt from scratch every cycle.
///
/// Keyed by channel number alone: 2.4GHz and 5GHz channel numbers are
/// disjoint, so one map can hold both bands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    channels: BTreeMap<u16, ChannelOccupancy>,
}

impl OccupancyMap {
    /// Aggregate every usable observation.
    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a NetworkObservation>,
    {
        let mut map = OccupancyMap::default();
        for obs in observations.into_iter().filter(|o| o.is_usable()) {
            map.record(obs);
        }
        map
    }

    /// Aggregate only the observations belonging to `band`.
    pub fn for_band(observations: &[NetworkObservation], band: Band) -> Self {
        Self::from_observations(observations.iter().filter(|o| o.band == band))
    }

    fn record(&mut self, obs: &NetworkObservation) {
        self.channels
            .entry(obs.channel)
            .and_modify(|occ| occ.record(obs.signal_dbm))
            .or_insert_with(|| ChannelOccupancy::first(obs));
    }

    pub fn get(&self, channel: u16) -> Option<&ChannelOccupancy> {
        self.channels.get(&channel)
    }

    /// Networks on `channel`; zero when the channel is absent.
    pub fn network_count(&self, channel: u16) -> u32 {
        self.get(channel).map_or(0, |occ| occ.network_count)
    }

    /// Occupied channels in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelOccupancy> {
        self.channels.values()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_count_and_strongest_signal() {
        let obs = vec![
            NetworkObservation::new("a", Band::Ghz24, 6, -70),
            NetworkObservation::new("b", Band::Ghz24, 6, -45),
            NetworkObservation::new("c", Band::Ghz24, 6, -88),
            NetworkObservation::new("d", Band::Ghz5, 36, -60),
        ];
        let map = OccupancyMap::from_observations(&obs);

        assert_eq!(map.len(), 2);
        let six = map.get(6).unwrap();
        assert_eq!(six.network_count, 3);
        assert_eq!(six.strongest_signal_dbm, -45);
        assert_eq!(six.frequency_mhz, 2437);
        assert_eq!(map.network_count(36), 1);
        assert_eq!(map.network_count(11), 0);
    }

    #[test]
    fn band_filter_and_zero_channel() {
        let obs = vec![
            NetworkObservation::new("a", Band::Ghz24, 1, -70),
            NetworkObservation::new("b", Band::Ghz5, 149, -50),
            NetworkObservation::new("c", Band::Ghz24, 0, -50),
        ];
        let map = OccupancyMap::for_band(&obs, Band::Ghz24);
        assert_eq!(map.len(), 1);
        assert!(map.get(149).is_none());
        assert!(map.get(0).is_none());
    }

    #[test]
    fn unknown_channel_keeps_fallback_frequency() {
        let obs = vec![NetworkObservation::new("odd", Band::Ghz24, 15, -60)];
        let map = OccupancyMap::from_observations(&obs);
        assert_eq!(map.get(15).unwrap().frequency_mhz, channel::FALLBACK_FREQUENCY_MHZ);
    }

    #[test]
    fn empty_input() {
        let none: Vec<NetworkObservation> = Vec::new();
        let map = OccupancyMap::from_observations(&none);
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }
}
