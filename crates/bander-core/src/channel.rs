//! # Channel / Frequency Model
//!
//! Static regulatory tables mapping WiFi channel numbers to centre
//! frequencies and sub-bands.
//!
//! | Sub-band | Channels  | Base (MHz) | DFS |
//! |----------|-----------|------------|-----|
//! | ISM 2.4  | 1–13, 14  | 2412       | no  |
//! | UNII-1   | 36–48     | 5180       | no  |
//! | UNII-2A  | 52–64     | 5260       | yes |
//! | UNII-2C  | 100–144   | 5500       | yes |
//! | UNII-3   | 149–165   | 5745       | no  |
//! | UNII-4   | 169–177   | 5845       | no  |
//!
//! Within a sub-band, channel numbers advance 5 MHz per step. Channel 14 is
//! the Japanese special case at 2484 MHz.
//!
//! The tables are process-wide constants, but the scoring functions take a
//! [`ChannelPlan`] by reference so a caller can evaluate a different
//! regulatory region without touching globals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Frequency returned for channel numbers outside every known allocation.
pub const FALLBACK_FREQUENCY_MHZ: u32 = 2412;

/// The three 2.4GHz channels whose 20 MHz masks do not overlap.
pub const NON_OVERLAPPING_24GHZ: [u16; 3] = [1, 6, 11];

// ─── Band ───────────────────────────────────────────────────────────────────

/// WiFi frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz", alias = "2.4G")]
    Ghz24,
    #[serde(rename = "5GHz", alias = "5G")]
    Ghz5,
}

impl Band {
    /// Both bands, in presentation order.
    pub const ALL: [Band; 2] = [Band::Ghz24, Band::Ghz5];

    /// Band that owns a channel number, if any allocation covers it.
    pub fn of_channel(channel: u16) -> Option<Band> {
        SubBand::of_channel(channel).map(SubBand::band)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Ghz24 => write!(f, "2.4GHz"),
            Band::Ghz5 => write!(f, "5GHz"),
        }
    }
}

impl std::str::FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2.4" | "2.4g" | "2.4ghz" => Ok(Band::Ghz24),
            "5" | "5g" | "5ghz" => Ok(Band::Ghz5),
            other => Err(format!("unknown band: {other}")),
        }
    }
}

// ─── Sub-band Catalog ───────────────────────────────────────────────────────

/// Regulatory sub-band allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubBand {
    /// 2.4GHz ISM band, channels 1–14.
    Ism24,
    /// 5.15–5.25 GHz, low power, indoor.
    Unii1,
    /// 5.25–5.35 GHz, DFS required.
    Unii2A,
    /// 5.47–5.725 GHz, DFS required.
    Unii2C,
    /// 5.725–5.875 GHz, higher power.
    Unii3,
    /// 5.85–5.925 GHz, newer allocation.
    Unii4,
}

const UNII1_CHANNELS: &[u16] = &[36, 40, 44, 48];
const UNII2A_CHANNELS: &[u16] = &[52, 56, 60, 64];
const UNII2C_CHANNELS: &[u16] = &[
    100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
];
const UNII3_CHANNELS: &[u16] = &[149, 153, 157, 161, 165];
const UNII4_CHANNELS: &[u16] = &[169, 173, 177];

const CHANNELS_24GHZ_US: &[u16] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
const CHANNELS_24GHZ_EU: &[u16] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
const CHANNELS_24GHZ_JP: &[u16] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];

impl SubBand {
    /// All 5GHz sub-bands in ascending frequency order.
    pub const UNII: [SubBand; 5] = [
        SubBand::Unii1,
        SubBand::Unii2A,
        SubBand::Unii2C,
        SubBand::Unii3,
        SubBand::Unii4,
    ];

    /// Sub-band whose numeric channel range contains `channel`.
    ///
    /// Ranges are inclusive spans, so intermediate numbers (e.g. 38) resolve
    /// to the enclosing sub-band even though they are not primary 20 MHz
    /// channels.
    pub fn of_channel(channel: u16) -> Option<SubBand> {
        match channel {
            1..=14 => Some(SubBand::Ism24),
            36..=48 => Some(SubBand::Unii1),
            52..=64 => Some(SubBand::Unii2A),
            100..=144 => Some(SubBand::Unii2C),
            149..=165 => Some(SubBand::Unii3),
            169..=177 => Some(SubBand::Unii4),
            _ => None,
        }
    }

    pub fn band(self) -> Band {
        match self {
            SubBand::Ism24 => Band::Ghz24,
            _ => Band::Ghz5,
        }
    }

    /// Lowest channel number and its centre frequency.
    fn anchor(self) -> (u16, u32) {
        match self {
            SubBand::Ism24 => (1, 2412),
            SubBand::Unii1 => (36, 5180),
            SubBand::Unii2A => (52, 5260),
            SubBand::Unii2C => (100, 5500),
            SubBand::Unii3 => (149, 5745),
            SubBand::Unii4 => (169, 5845),
        }
    }

    /// Primary 20 MHz channels defined in this sub-band.
    ///
    /// The 2.4GHz list is region-dependent; this returns the widest (Japan)
    /// set. Use [`ChannelPlan`] for region-aware enumeration.
    pub fn channels(self) -> &'static [u16] {
        match self {
            SubBand::Ism24 => CHANNELS_24GHZ_JP,
            SubBand::Unii1 => UNII1_CHANNELS,
            SubBand::Unii2A => UNII2A_CHANNELS,
            SubBand::Unii2C => UNII2C_CHANNELS,
            SubBand::Unii3 => UNII3_CHANNELS,
            SubBand::Unii4 => UNII4_CHANNELS,
        }
    }

    /// Whether radar detection (DFS) is required before transmitting.
    pub fn is_dfs(self) -> bool {
        matches!(self, SubBand::Unii2A | SubBand::Unii2C)
    }
}

impl fmt::Display for SubBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubBand::Ism24 => write!(f, "ISM 2.4GHz"),
            SubBand::Unii1 => write!(f, "UNII-1"),
            SubBand::Unii2A => write!(f, "UNII-2A"),
            SubBand::Unii2C => write!(f, "UNII-2C"),
            SubBand::Unii3 => write!(f, "UNII-3"),
            SubBand::Unii4 => write!(f, "UNII-4"),
        }
    }
}

// ─── Frequency Lookup ───────────────────────────────────────────────────────

/// Centre frequency for a channel, or `None` if no allocation covers it.
pub fn checked_frequency_of(channel: u16) -> Option<u32> {
    if channel == 14 {
        return Some(2484);
    }
    let sub = SubBand::of_channel(channel)?;
    let (base_channel, base_mhz) = sub.anchor();
    Some(base_mhz + u32::from(channel - base_channel) * 5)
}

/// Centre frequency for a channel in MHz.
///
/// Total: channel numbers outside every allocation resolve to
/// [`FALLBACK_FREQUENCY_MHZ`] (channel 1) and emit a warning, since that
/// value is indistinguishable from a real channel 1 reading downstream.
pub fn frequency_of(channel: u16) -> u32 {
    checked_frequency_of(channel).unwrap_or_else(|| {
        tracing::warn!(
            channel,
            fallback_mhz = FALLBACK_FREQUENCY_MHZ,
            "unrecognized channel number, using fallback frequency"
        );
        FALLBACK_FREQUENCY_MHZ
    })
}

/// True for UNII-2A and UNII-2C channels.
pub fn is_dfs(channel: u16) -> bool {
    SubBand::of_channel(channel).is_some_and(SubBand::is_dfs)
}

/// True for 2.4GHz channels 1, 6 and 11.
pub fn is_non_overlapping_24ghz(channel: u16) -> bool {
    NON_OVERLAPPING_24GHZ.contains(&channel)
}

// ─── Channel Width ──────────────────────────────────────────────────────────

/// Occupied channel bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelWidth {
    #[serde(rename = "20MHz")]
    Mhz20,
    #[serde(rename = "40MHz")]
    Mhz40,
    #[serde(rename = "80MHz")]
    Mhz80,
    #[serde(rename = "160MHz")]
    Mhz160,
}

impl ChannelWidth {
    /// Width assumed when a scan does not report one.
    pub fn default_for(band: Band) -> Self {
        match band {
            Band::Ghz24 => ChannelWidth::Mhz20,
            Band::Ghz5 => ChannelWidth::Mhz80,
        }
    }

    pub fn mhz(self) -> u32 {
        match self {
            ChannelWidth::Mhz20 => 20,
            ChannelWidth::Mhz40 => 40,
            ChannelWidth::Mhz80 => 80,
            ChannelWidth::Mhz160 => 160,
        }
    }
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}MHz", self.mhz())
    }
}

impl std::str::FromStr for ChannelWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches("MHz").trim_end_matches("mhz").trim();
        match digits {
            "20" => Ok(ChannelWidth::Mhz20),
            "40" => Ok(ChannelWidth::Mhz40),
            "80" => Ok(ChannelWidth::Mhz80),
            "160" => Ok(ChannelWidth::Mhz160),
            _ => Err(format!("unknown channel width: {s}")),
        }
    }
}

// ─── Regulatory Plan ────────────────────────────────────────────────────────

/// Regulatory domain for the 2.4GHz channel set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Channels 1–11.
    Us,
    /// Channels 1–13.
    #[default]
    Eu,
    /// Channels 1–14.
    Jp,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Us => write!(f, "us"),
            Region::Eu => write!(f, "eu"),
            Region::Jp => write!(f, "jp"),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "jp" => Ok(Region::Jp),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

/// The set of channels legally usable per band.
///
/// This is what the recommendation engine evaluates: every regulatory
/// channel, whether or not a network was detected on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPlan {
    region: Region,
    channels_24ghz: Vec<u16>,
    channels_5ghz: Vec<u16>,
}

impl ChannelPlan {
    pub fn for_region(region: Region) -> Self {
        let channels_24ghz = match region {
            Region::Us => CHANNELS_24GHZ_US,
            Region::Eu => CHANNELS_24GHZ_EU,
            Region::Jp => CHANNELS_24GHZ_JP,
        };
        ChannelPlan {
            region,
            channels_24ghz: channels_24ghz.to_vec(),
            channels_5ghz: SubBand::UNII
                .iter()
                .flat_map(|s| s.channels().iter().copied())
                .collect(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Every regulatory channel in `band`, ascending.
    pub fn all_channels(&self, band: Band) -> &[u16] {
        match band {
            Band::Ghz24 => &self.channels_24ghz,
            Band::Ghz5 => &self.channels_5ghz,
        }
    }
}

impl Default for ChannelPlan {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_frequencies() {
        assert_eq!(frequency_of(1), 2412);
        assert_eq!(frequency_of(6), 2437);
        assert_eq!(frequency_of(13), 2472);
        assert_eq!(frequency_of(14), 2484);
        assert_eq!(frequency_of(36), 5180);
        assert_eq!(frequency_of(52), 5260);
        assert_eq!(frequency_of(100), 5500);
        assert_eq!(frequency_of(144), 5720);
        assert_eq!(frequency_of(149), 5745);
        assert_eq!(frequency_of(165), 5825);
        assert_eq!(frequency_of(177), 5885);
    }

    #[test]
    fn unknown_channel_falls_back() {
        assert_eq!(checked_frequency_of(0), None);
        assert_eq!(checked_frequency_of(200), None);
        assert_eq!(frequency_of(0), FALLBACK_FREQUENCY_MHZ);
        assert_eq!(frequency_of(15), FALLBACK_FREQUENCY_MHZ);
        assert_eq!(frequency_of(66), FALLBACK_FREQUENCY_MHZ);
    }

    #[test]
    fn every_plan_channel_has_a_real_frequency() {
        for region in [Region::Us, Region::Eu, Region::Jp] {
            let plan = ChannelPlan::for_region(region);
            for band in Band::ALL {
                for &ch in plan.all_channels(band) {
                    let freq = checked_frequency_of(ch).expect("plan channel must map");
                    assert_eq!(Band::of_channel(ch), Some(band));
                    assert_eq!(frequency_of(ch), freq);
                }
            }
        }
    }

    #[test]
    fn dfs_ranges() {
        assert!(!is_dfs(36));
        assert!(is_dfs(52));
        assert!(is_dfs(64));
        assert!(is_dfs(100));
        assert!(is_dfs(144));
        assert!(!is_dfs(149));
        assert!(!is_dfs(6));
        assert!(!is_dfs(0));
    }

    #[test]
    fn region_plans() {
        assert_eq!(ChannelPlan::for_region(Region::Us).all_channels(Band::Ghz24).len(), 11);
        assert_eq!(ChannelPlan::for_region(Region::Eu).all_channels(Band::Ghz24).len(), 13);
        assert_eq!(ChannelPlan::for_region(Region::Jp).all_channels(Band::Ghz24).len(), 14);
        assert_eq!(ChannelPlan::default().all_channels(Band::Ghz5).len(), 28);
        assert_eq!(ChannelPlan::default().region(), Region::Eu);
    }

    #[test]
    fn band_parsing() {
        assert_eq!("2.4G".parse::<Band>(), Ok(Band::Ghz24));
        assert_eq!("2.4GHz".parse::<Band>(), Ok(Band::Ghz24));
        assert_eq!("5g".parse::<Band>(), Ok(Band::Ghz5));
        assert!("6GHz".parse::<Band>().is_err());
        assert_eq!(Band::Ghz24.to_string(), "2.4GHz");
    }

    #[test]
    fn width_defaults_and_parsing() {
        assert_eq!(ChannelWidth::default_for(Band::Ghz24), ChannelWidth::Mhz20);
        assert_eq!(ChannelWidth::default_for(Band::Ghz5), ChannelWidth::Mhz80);
        assert_eq!("80MHz".parse::<ChannelWidth>(), Ok(ChannelWidth::Mhz80));
        assert_eq!("160".parse::<ChannelWidth>(), Ok(ChannelWidth::Mhz160));
        assert!("Unknown".parse::<ChannelWidth>().is_err());
    }

    #[test]
    fn band_serde_names() {
        let json = serde_json::to_string(&Band::Ghz24).unwrap();
        assert_eq!(json, "\"2.4GHz\"");
        let parsed: Band = serde_json::from_str("\"5G\"").unwrap();
        assert_eq!(parsed, Band::Ghz5);
    }
}
