//! End-to-end tests for one scan-score-recommend cycle.

use bander_core::channel::{self, Band, ChannelPlan, Region};
use bander_core::congestion::CongestionLevel;
use bander_core::recommend::InterferenceLevel;
use bander_core::{Analyzer, NetworkObservation};

fn net(ssid: &str, channel: u16, signal: i32, stations: u32) -> NetworkObservation {
    let band = Band::of_channel(channel).expect("test channel must be valid");
    NetworkObservation::new(ssid, band, channel, signal).with_stations(stations)
}

#[test]
fn two_on_channel_one_and_one_on_six() {
    let obs = vec![
        net("a", 1, -80, 1),
        net("b", 1, -80, 1),
        net("c", 6, -80, 1),
    ];
    let report = Analyzer::default().analyze(&obs);

    let score_of = |ssid: &str| {
        report
            .networks
            .iter()
            .find(|n| n.observation.ssid == ssid)
            .unwrap()
            .congestion_score
    };
    assert_eq!(score_of("a"), 28);
    assert_eq!(score_of("b"), 28);
    assert_eq!(score_of("c"), 18);

    // Least congested first.
    assert_eq!(report.networks[0].observation.ssid, "c");
}

#[test]
fn single_strong_neighbour_on_six() {
    let obs = vec![net("neighbour", 6, -50, 1)];
    let analyzer = Analyzer::default();
    let report = analyzer.analyze(&obs);

    let recs = report.recommendations_for(Band::Ghz24).unwrap();
    let picked: Vec<u16> = recs.recommendations.iter().map(|r| r.channel).collect();
    assert_eq!(picked[..2], [1, 11]);
    assert!(!picked.contains(&6));
    assert_eq!(recs.recommendations[0].interference_level, InterferenceLevel::Minimal);

    // 5GHz is untouched by a 2.4GHz neighbour.
    let five = report.recommendations_for(Band::Ghz5).unwrap();
    assert!(five.recommendations.iter().all(|r| r.score == 0.0));
}

#[test]
fn crowded_landscape_pushes_to_quiet_channels() {
    let mut obs = Vec::new();
    for i in 0..5 {
        obs.push(net(&format!("one-{i}"), 1, -45, 3));
        obs.push(net(&format!("six-{i}"), 6, -55, 2));
    }
    obs.push(net("eleven", 11, -88, 0));
    obs.push(net("unii1", 36, -40, 4));
    obs.push(net("unii1b", 40, -52, 2));

    let report = Analyzer::default().analyze(&obs);

    // 13 sits 10 MHz from a single weak network on 11 and far from 1 and 6.
    let two_four = report.recommendations_for(Band::Ghz24).unwrap();
    let picked: Vec<u16> = two_four.recommendations.iter().map(|r| r.channel).collect();
    assert_eq!(picked[0], 13);
    assert!(!picked.contains(&1) && !picked.contains(&6));

    let five = report.recommendations_for(Band::Ghz5).unwrap();
    let best = five.best().unwrap();
    assert!(best.channel >= 149, "expected UNII-3/4 pick, got {}", best.channel);
    assert!(!channel::is_dfs(best.channel));

    let busiest = report.networks.last().unwrap();
    assert_eq!(busiest.congestion_level, CongestionLevel::VeryHigh);
}

#[test]
fn unknown_channel_uses_fallback_frequency() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let obs = NetworkObservation::new("odd", Band::Ghz5, 250, -60);
    assert_eq!(obs.frequency_mhz(), channel::FALLBACK_FREQUENCY_MHZ);

    // Still scored without panicking.
    let report = Analyzer::default().analyze(&[obs]);
    assert_eq!(report.networks.len(), 1);
}

#[test]
fn region_changes_24ghz_plan_only() {
    let us = Analyzer::new(ChannelPlan::for_region(Region::Us)).analyze(&[]);
    let jp = Analyzer::new(ChannelPlan::for_region(Region::Jp)).analyze(&[]);

    assert_eq!(us.usage_for(Band::Ghz24).unwrap().counts.len(), 11);
    assert_eq!(jp.usage_for(Band::Ghz24).unwrap().counts.len(), 14);
    assert_eq!(
        us.usage_for(Band::Ghz5).unwrap().counts,
        jp.usage_for(Band::Ghz5).unwrap().counts
    );
}

#[test]
fn report_serializes_to_json() {
    let report = Analyzer::default().analyze(&[net("x", 44, -67, 2).with_bssid("ec:08:6b:00:00:01")]);
    let json = serde_json::to_value(&report).unwrap();

    let network = &json["networks"][0];
    assert_eq!(network["band"], "5GHz");
    assert_eq!(network["frequency_mhz"], 5220);
    assert_eq!(network["vendor"], "TP-Link");
    assert_eq!(network["congestion_level"], "high");
    assert_eq!(json["recommendations"][0]["band"], "2.4GHz");
}
