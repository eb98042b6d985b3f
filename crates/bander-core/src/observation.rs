//! Network observations: one detected access point per scan cycle.
//!
//! Observation sources (OS scanners, snapshot files, the simulator) all
//! produce the same canonical [`NetworkObservation`]. Fields that only some
//! scanners report (security, PHY mode, BSSID, vendor, noise) are optional.

use serde::{Deserialize, Serialize};

use crate::channel::{self, Band, ChannelWidth};

/// A single access point seen during one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkObservation {
    #[serde(default)]
    pub ssid: String,
    pub band: Band,
    /// Zero when the scanner reported no channel; such records are unusable.
    #[serde(default)]
    pub channel: u16,
    /// Derived from `channel`; any value present in serialized input is
    /// ignored and recomputed by [`NetworkObservation::normalized`].
    #[serde(default)]
    frequency_mhz: u32,
    pub signal_dbm: i32,
    #[serde(default)]
    pub station_count: u32,
    #[serde(default)]
    pub channel_width: Option<ChannelWidth>,

    // ── Enhanced fields ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phy_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_dbm: Option<i32>,
}

impl NetworkObservation {
    pub fn new(ssid: impl Into<String>, band: Band, channel: u16, signal_dbm: i32) -> Self {
        NetworkObservation {
            ssid: ssid.into(),
            band,
            channel,
            frequency_mhz: resolve_frequency(channel),
            signal_dbm,
            station_count: 0,
            channel_width: None,
            security: None,
            phy_mode: None,
            bssid: None,
            vendor: None,
            noise_dbm: None,
        }
    }

    pub fn with_stations(mut self, station_count: u32) -> Self {
        self.station_count = station_count;
        self
    }

    pub fn with_width(mut self, width: ChannelWidth) -> Self {
        self.channel_width = Some(width);
        self
    }

    pub fn with_security(mut self, security: impl Into<String>) -> Self {
        self.security = Some(security.into());
        self
    }

    pub fn with_phy_mode(mut self, phy_mode: impl Into<String>) -> Self {
        self.phy_mode = Some(phy_mode.into());
        self
    }

    /// Set the BSSID and, if no vendor is known yet, derive it from the OUI.
    pub fn with_bssid(mut self, bssid: impl Into<String>) -> Self {
        let bssid = bssid.into();
        if self.vendor.is_none() {
            self.vendor = vendor_from_bssid(&bssid).map(str::to_string);
        }
        self.bssid = Some(bssid);
        self
    }

    pub fn with_noise(mut self, noise_dbm: i32) -> Self {
        self.noise_dbm = Some(noise_dbm);
        self
    }

    /// Re-derive `frequency_mhz` from `channel` and fill a missing vendor
    /// from the BSSID.
    ///
    /// Deserialized observations carry whatever frequency the producer
    /// wrote; the channel is authoritative.
    pub fn normalized(mut self) -> Self {
        self.frequency_mhz = resolve_frequency(self.channel);
        if self.vendor.is_none() {
            self.vendor = self
                .bssid
                .as_deref()
                .and_then(vendor_from_bssid)
                .map(str::to_string);
        }
        self
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.frequency_mhz
    }

    /// Reported width, or the band default (20 MHz / 80 MHz).
    pub fn effective_width(&self) -> ChannelWidth {
        self.channel_width
            .unwrap_or_else(|| ChannelWidth::default_for(self.band))
    }

    /// Signal quality percentage derived from RSSI.
    pub fn quality_percent(&self) -> u8 {
        signal_quality(self.signal_dbm)
    }

    /// Signal-to-noise ratio in dB, when the scanner reported noise.
    pub fn snr_db(&self) -> Option<i32> {
        self.noise_dbm.map(|noise| self.signal_dbm - noise)
    }

    /// Whether the engine can use this observation at all.
    pub fn is_usable(&self) -> bool {
        self.channel != 0
    }
}

/// Channel 0 means "not reported": it gets the fallback without a warning,
/// since the engine drops it anyway.
fn resolve_frequency(channel: u16) -> u32 {
    if channel == 0 {
        channel::FALLBACK_FREQUENCY_MHZ
    } else {
        channel::frequency_of(channel)
    }
}

// ─── Estimators ─────────────────────────────────────────────────────────────

/// Heuristic number of associated stations for a BSS.
///
/// Scanners cannot enumerate stations without monitor mode, so this guesses
/// from signal strength: strong beacons tend to be busy home/office APs, and
/// 2.4GHz is generally more crowded.
pub fn estimate_station_count(signal_dbm: i32, channel: u16) -> u32 {
    let mut count = 1;
    if signal_dbm > -40 {
        count += 3;
    } else if signal_dbm > -60 {
        count += 2;
    } else if signal_dbm > -80 {
        count += 1;
    }
    if channel <= 14 {
        count += 1;
    }
    count
}

/// Linear RSSI → quality mapping: −30 dBm → 100 %, −90 dBm → 0 %.
pub fn signal_quality(signal_dbm: i32) -> u8 {
    if signal_dbm >= -30 {
        return 100;
    }
    if signal_dbm <= -90 {
        return 0;
    }
    (((signal_dbm + 90) * 100) / 60).clamp(0, 100) as u8
}

/// Well-known OUI prefixes of consumer AP vendors.
const VENDOR_OUIS: &[(&str, &str)] = &[
    ("001B63", "Apple"),
    ("0023DF", "Apple"),
    ("0026BB", "Apple"),
    ("040CCE", "Apple"),
    ("3C2EFF", "Apple"),
    ("F0D1A9", "Apple"),
    ("EC086B", "TP-Link"),
    ("F4F26D", "TP-Link"),
    ("A42BB0", "TP-Link"),
    ("50C7BF", "TP-Link"),
    ("98DAC4", "TP-Link"),
    ("2C56DC", "ASUS"),
    ("1C872C", "ASUS"),
    ("AC9E17", "ASUS"),
    ("04D4C4", "ASUS"),
    ("841B5E", "Netgear"),
    ("A00460", "Netgear"),
    ("C40415", "Netgear"),
    ("9C3DCF", "Netgear"),
    ("C8D719", "Linksys"),
    ("48F8B3", "Linksys"),
    ("94103E", "Linksys"),
    ("20AA4B", "Linksys"),
];

/// Vendor name from a BSSID's OUI, accepting `:`/`-` separated or bare hex.
pub fn vendor_from_bssid(bssid: &str) -> Option<&'static str> {
    let hex: String = bssid
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(6)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if hex.len() < 6 {
        return None;
    }
    VENDOR_OUIS
        .iter()
        .find(|(oui, _)| *oui == hex)
        .map(|(_, vendor)| *vendor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_is_derived_from_channel() {
        let obs = NetworkObservation::new("home", Band::Ghz24, 6, -55);
        assert_eq!(obs.frequency_mhz(), 2437);

        let obs = NetworkObservation::new("office", Band::Ghz5, 149, -70);
        assert_eq!(obs.frequency_mhz(), 5745);
    }

    #[test]
    fn deserialized_frequency_is_recomputed() {
        let json = r#"{"ssid":"x","band":"5GHz","channel":36,"frequency_mhz":1,"signal_dbm":-60}"#;
        let obs: NetworkObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.frequency_mhz(), 1);
        let obs = obs.normalized();
        assert_eq!(obs.frequency_mhz(), 5180);
        assert_eq!(obs.station_count, 0);
        assert_eq!(obs.effective_width(), ChannelWidth::Mhz80);
    }

    #[test]
    fn missing_channel_deserializes_as_unusable() {
        let json = r#"{"ssid":"nochan","band":"2.4GHz","signal_dbm":-60}"#;
        let obs: NetworkObservation = serde_json::from_str(json).unwrap();
        let obs = obs.normalized();
        assert_eq!(obs.channel, 0);
        assert!(!obs.is_usable());
        assert_eq!(obs.frequency_mhz(), channel::FALLBACK_FREQUENCY_MHZ);
    }

    #[test]
    fn station_estimate() {
        assert_eq!(estimate_station_count(-35, 6), 5);
        assert_eq!(estimate_station_count(-55, 6), 4);
        assert_eq!(estimate_station_count(-75, 36), 2);
        assert_eq!(estimate_station_count(-90, 36), 1);
    }

    #[test]
    fn quality_mapping() {
        assert_eq!(signal_quality(-20), 100);
        assert_eq!(signal_quality(-30), 100);
        assert_eq!(signal_quality(-60), 50);
        assert_eq!(signal_quality(-90), 0);
        assert_eq!(signal_quality(-100), 0);
    }

    #[test]
    fn vendor_lookup() {
        assert_eq!(vendor_from_bssid("ec:08:6b:12:34:56"), Some("TP-Link"));
        assert_eq!(vendor_from_bssid("2C-56-DC-00-00-01"), Some("ASUS"));
        assert_eq!(vendor_from_bssid("00:00:00:00:00:00"), None);
        assert_eq!(vendor_from_bssid("ab"), None);

        let obs = NetworkObservation::new("", Band::Ghz24, 1, -60).with_bssid("84:1b:5e:aa:bb:cc");
        assert_eq!(obs.vendor.as_deref(), Some("Netgear"));
    }

    #[test]
    fn snr_requires_noise() {
        let obs = NetworkObservation::new("", Band::Ghz24, 1, -60);
        assert_eq!(obs.snr_db(), None);
        assert_eq!(obs.with_noise(-92).snr_db(), Some(32));
    }

    #[test]
    fn zero_channel_is_unusable() {
        assert!(!NetworkObservation::new("", Band::Ghz24, 0, -60).is_usable());
        assert!(NetworkObservation::new("", Band::Ghz24, 1, -60).is_usable());
    }
}
