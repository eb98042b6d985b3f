//! Observation sources: produce one cycle's `NetworkObservation` list.
//!
//! OS-specific scanners plug in behind [`ObservationSource`]. Two sources
//! ship here: a seeded simulator for local development, and a snapshot
//! reader for replaying a captured scan from a JSON file.

use std::path::{Path, PathBuf};

use bander_core::NetworkObservation;
use bander_core::channel::{Band, ChannelWidth};
use bander_core::observation::estimate_station_count;
use rand::RngExt as _;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use thiserror::Error;

use crate::config::SourceConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scan task failed: {0}")]
    Task(String),
}

/// Anything that can produce a list of observed access points.
///
/// `scan` may block (it typically shells out or touches the filesystem);
/// callers run it off the async executor.
pub trait ObservationSource: Send {
    fn name(&self) -> &'static str;
    fn scan(&mut self) -> Result<Vec<NetworkObservation>, SourceError>;
}

/// Build the source selected by configuration.
pub fn from_config(config: &SourceConfig) -> Box<dyn ObservationSource> {
    match config {
        SourceConfig::Simulate { seed } => Box::new(SimulatedSource::new(*seed)),
        SourceConfig::Snapshot { path } => Box::new(SnapshotSource::new(path.clone())),
    }
}

// ── Simulated ───────────────────────────────────────────────────────

struct SimulatedAp {
    ssid: &'static str,
    band: Band,
    channel: u16,
    base_signal_dbm: i32,
    security: &'static str,
    phy_mode: &'static str,
    width: ChannelWidth,
    bssid: &'static str,
}

/// A small apartment-block landscape: a crowded 2.4GHz band and a sparser
/// 5GHz band with one DFS neighbour.
const SIMULATED_APS: &[SimulatedAp] = &[
    SimulatedAp {
        ssid: "HomeNet",
        band: Band::Ghz24,
        channel: 6,
        base_signal_dbm: -48,
        security: "WPA2-Personal",
        phy_mode: "802.11n",
        width: ChannelWidth::Mhz20,
        bssid: "ec:08:6b:11:22:33",
    },
    SimulatedAp {
        ssid: "NETGEAR42",
        band: Band::Ghz24,
        channel: 6,
        base_signal_dbm: -67,
        security: "WPA2-Personal",
        phy_mode: "802.11n",
        width: ChannelWidth::Mhz20,
        bssid: "84:1b:5e:44:55:66",
    },
    SimulatedAp {
        ssid: "linksys",
        band: Band::Ghz24,
        channel: 1,
        base_signal_dbm: -72,
        security: "WPA/WPA2",
        phy_mode: "802.11g",
        width: ChannelWidth::Mhz20,
        bssid: "c8:d7:19:77:88:99",
    },
    SimulatedAp {
        ssid: "CoffeeShop",
        band: Band::Ghz24,
        channel: 3,
        base_signal_dbm: -80,
        security: "Open",
        phy_mode: "802.11n",
        width: ChannelWidth::Mhz40,
        bssid: "02:00:00:aa:bb:01",
    },
    SimulatedAp {
        ssid: "",
        band: Band::Ghz24,
        channel: 11,
        base_signal_dbm: -86,
        security: "WPA3-Personal",
        phy_mode: "802.11ax",
        width: ChannelWidth::Mhz20,
        bssid: "02:00:00:aa:bb:02",
    },
    SimulatedAp {
        ssid: "HomeNet-5G",
        band: Band::Ghz5,
        channel: 36,
        base_signal_dbm: -55,
        security: "WPA2-Personal",
        phy_mode: "802.11ac",
        width: ChannelWidth::Mhz80,
        bssid: "ec:08:6b:11:22:34",
    },
    SimulatedAp {
        ssid: "ASUS_5G",
        band: Band::Ghz5,
        channel: 44,
        base_signal_dbm: -70,
        security: "WPA2-Personal",
        phy_mode: "802.11ac",
        width: ChannelWidth::Mhz80,
        bssid: "2c:56:dc:01:02:03",
    },
    SimulatedAp {
        ssid: "Office-AX",
        band: Band::Ghz5,
        channel: 100,
        base_signal_dbm: -78,
        security: "WPA3-Enterprise",
        phy_mode: "802.11ax",
        width: ChannelWidth::Mhz160,
        bssid: "02:00:00:aa:bb:03",
    },
];

/// Generates a realistic, slowly varying landscape.
pub struct SimulatedSource {
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        tracing::debug!(seed, "simulated source seeded");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ObservationSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulate"
    }

    fn scan(&mut self) -> Result<Vec<NetworkObservation>, SourceError> {
        let mut networks = Vec::with_capacity(SIMULATED_APS.len());
        for ap in SIMULATED_APS {
            // Weak APs drop out of some scans, as they do on real hardware.
            if ap.base_signal_dbm < -75 && self.rng.random_bool(0.3) {
                continue;
            }
            let signal = ap.base_signal_dbm + self.rng.random_range(-4..=4);
            let noise = -95 + self.rng.random_range(-3..=3);
            networks.push(
                NetworkObservation::new(ap.ssid, ap.band, ap.channel, signal)
                    .with_stations(estimate_station_count(signal, ap.channel))
                    .with_width(ap.width)
                    .with_security(ap.security)
                    .with_phy_mode(ap.phy_mode)
                    .with_bssid(ap.bssid)
                    .with_noise(noise),
            );
        }
        Ok(networks)
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// Replays observations from a JSON array on disk.
///
/// The file is re-read on every scan so an external tool can keep
/// overwriting it. Frequencies in the file are ignored and re-derived from
/// the channel; absent station counts are estimated from signal, while an
/// explicit zero is kept.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObservationSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn scan(&mut self) -> Result<Vec<NetworkObservation>, SourceError> {
        let data = std::fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let raw: Vec<SnapshotRecord> =
            serde_json::from_slice(&data).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(raw.into_iter().map(SnapshotRecord::into_observation).collect())
    }
}

/// One snapshot entry as written on disk.
///
/// `station_count` is lifted out so an absent count can be told apart from
/// an explicit zero.
#[derive(Deserialize)]
struct SnapshotRecord {
    #[serde(default)]
    station_count: Option<u32>,
    #[serde(flatten)]
    observation: NetworkObservation,
}

impl SnapshotRecord {
    fn into_observation(self) -> NetworkObservation {
        let obs = self.observation.normalized();
        let stations = self
            .station_count
            .unwrap_or_else(|| estimate_station_count(obs.signal_dbm, obs.channel));
        obs.with_stations(stations)
    }
}
