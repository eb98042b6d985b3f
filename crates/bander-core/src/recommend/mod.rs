//! # Channel Recommendation
//!
//! Evaluates every regulatory channel of a band as a candidate destination
//! and ranks them by interference score, lower first.
//!
//! ## Strategy
//!
//! 1. Aggregate the band's observations into an [`OccupancyMap`]
//!    (count + strongest signal per occupied channel).
//! 2. Score every channel in the [`ChannelPlan`], occupied or not, against
//!    that landscape ([`score::candidate_score`]).
//! 3. Stable-sort ascending and keep the top three. Ties keep plan order,
//!    so an empty 2.4GHz band yields 1, 6, 11.
//! 4. Report the frequency separation between consecutive picks, so an
//!    operator choosing between them can see how far apart they sit.

pub mod reasoning;
pub mod score;

use serde::{Deserialize, Serialize};

use crate::channel::{self, Band, ChannelPlan};
use crate::observation::NetworkObservation;
use crate::occupancy::OccupancyMap;

pub use score::InterferenceLevel;

/// Default number of channels returned per band.
pub const DEFAULT_TOP_N: usize = 3;

/// One ranked candidate channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecommendation {
    pub channel: u16,
    pub frequency_mhz: u32,
    pub score: f64,
    pub interference_level: InterferenceLevel,
    /// Distance to the nearest other occupied frequency; `None` if isolated.
    pub frequency_gap_mhz: Option<u32>,
    pub signal_impact: f64,
    pub reasoning: String,
}

/// Frequency distance between two consecutive recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSeparation {
    pub from_channel: u16,
    pub to_channel: u16,
    pub separation_mhz: u32,
}

/// Ranked recommendations for one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRecommendations {
    pub band: Band,
    pub recommendations: Vec<ChannelRecommendation>,
    pub separations: Vec<ChannelSeparation>,
}

impl BandRecommendations {
    pub fn best(&self) -> Option<&ChannelRecommendation> {
        self.recommendations.first()
    }
}

/// Ranks candidate channels against a regulatory plan.
#[derive(Debug, Clone)]
pub struct ChannelRecommender {
    plan: ChannelPlan,
    top_n: usize,
}

impl ChannelRecommender {
    pub fn new(plan: ChannelPlan) -> Self {
        ChannelRecommender {
            plan,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn plan(&self) -> &ChannelPlan {
        &self.plan
    }

    /// Score every plan channel of `band`, in plan order.
    pub fn evaluate(&self, band: Band, landscape: &OccupancyMap) -> Vec<ChannelRecommendation> {
        self.plan
            .all_channels(band)
            .iter()
            .map(|&ch| {
                let frequency_mhz = channel::frequency_of(ch);
                let score = score::candidate_score(band, ch, landscape);
                ChannelRecommendation {
                    channel: ch,
                    frequency_mhz,
                    score,
                    interference_level: InterferenceLevel::from_score(score),
                    frequency_gap_mhz: score::frequency_gap(frequency_mhz, landscape),
                    signal_impact: score::signal_impact(frequency_mhz, landscape),
                    reasoning: reasoning::explain(band, ch, landscape),
                }
            })
            .collect()
    }

    /// Top candidates for `band` from a full (multi-band) observation set.
    pub fn recommend_band(
        &self,
        observations: &[NetworkObservation],
        band: Band,
    ) -> BandRecommendations {
        let landscape = OccupancyMap::for_band(observations, band);
        let mut ranked = self.evaluate(band, &landscape);
        ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
        ranked.truncate(self.top_n);

        tracing::debug!(
            band = %band,
            occupied = landscape.len(),
            best = ranked.first().map(|r| r.channel),
            "ranked candidate channels"
        );

        let separations = separations(&ranked);
        BandRecommendations {
            band,
            recommendations: ranked,
            separations,
        }
    }

    /// Recommendations for both bands, 2.4GHz first.
    pub fn recommend(&self, observations: &[NetworkObservation]) -> Vec<BandRecommendations> {
        Band::ALL
            .iter()
            .map(|&band| self.recommend_band(observations, band))
            .collect()
    }
}

impl Default for ChannelRecommender {
    fn default() -> Self {
        Self::new(ChannelPlan::default())
    }
}

fn separations(ranked: &[ChannelRecommendation]) -> Vec<ChannelSeparation> {
    ranked
        .windows(2)
        .map(|pair| ChannelSeparation {
            from_channel: pair[0].channel,
            to_channel: pair[1].channel,
            separation_mhz: pair[0].frequency_mhz.abs_diff(pair[1].frequency_mhz),
        })
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Region;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::SubscriberExt;

    fn channels(recs: &BandRecommendations) -> Vec<u16> {
        recs.recommendations.iter().map(|r| r.channel).collect()
    }

    #[test]
    fn empty_24ghz_prefers_non_overlapping() {
        let recs = ChannelRecommender::default().recommend_band(&[], Band::Ghz24);
        assert_eq!(channels(&recs), vec![1, 6, 11]);
        assert!(recs.recommendations.iter().all(|r| r.score == 0.0));
        assert!(recs.recommendations.iter().all(|r| r.frequency_gap_mhz.is_none()));
        assert_eq!(recs.separations.len(), 2);
        assert_eq!(recs.separations[0].separation_mhz, 25);
    }

    #[test]
    fn empty_5ghz_prefers_non_dfs() {
        let recs = ChannelRecommender::default().recommend_band(&[], Band::Ghz5);
        assert_eq!(channels(&recs), vec![36, 40, 44]);
        assert!(recs.recommendations.iter().all(|r| !channel::is_dfs(r.channel)));
    }

    #[test]
    fn occupied_channel_scores_worse() {
        let obs = vec![NetworkObservation::new("n", Band::Ghz24, 6, -50).with_stations(1)];
        let recommender = ChannelRecommender::default();
        let all = recommender.evaluate(Band::Ghz24, &OccupancyMap::for_band(&obs, Band::Ghz24));
        let score_of = |ch: u16| all.iter().find(|r| r.channel == ch).unwrap().score;

        assert!(score_of(6) > score_of(1));
        assert!(score_of(6) > score_of(11));

        let recs = recommender.recommend_band(&obs, Band::Ghz24);
        assert!(!channels(&recs).contains(&6));
        assert_eq!(recs.best().unwrap().frequency_gap_mhz, Some(25));
    }

    #[test]
    fn bands_are_isolated() {
        let obs = vec![
            NetworkObservation::new("a", Band::Ghz5, 36, -40),
            NetworkObservation::new("b", Band::Ghz5, 40, -40),
        ];
        let recs = ChannelRecommender::default().recommend_band(&obs, Band::Ghz24);
        assert_eq!(channels(&recs), vec![1, 6, 11]);
    }

    #[test]
    fn region_limits_candidates() {
        let obs = vec![
            NetworkObservation::new("a", Band::Ghz24, 1, -40),
            NetworkObservation::new("b", Band::Ghz24, 6, -40),
            NetworkObservation::new("c", Band::Ghz24, 11, -40),
        ];
        let us = ChannelRecommender::new(ChannelPlan::for_region(Region::Us))
            .recommend_band(&obs, Band::Ghz24);
        assert!(us.recommendations.iter().all(|r| r.channel <= 11));

        let jp = ChannelRecommender::new(ChannelPlan::for_region(Region::Jp))
            .recommend_band(&obs, Band::Ghz24);
        assert_eq!(jp.best().unwrap().channel, 14);
    }

    #[test]
    fn top_n_is_configurable() {
        let recs = ChannelRecommender::default()
            .with_top_n(5)
            .recommend_band(&[], Band::Ghz5);
        assert_eq!(recs.recommendations.len(), 5);
        assert_eq!(recs.separations.len(), 4);
    }

    /// Counts `WARN` events seen on the current thread.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn unknown_channel_warns_once_at_ingestion() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let obs = vec![
                NetworkObservation::new("odd", Band::Ghz24, 15, -60),
                NetworkObservation::new("ok", Band::Ghz24, 6, -60),
            ];
            assert_eq!(warnings.load(Ordering::SeqCst), 1);

            let recs = ChannelRecommender::default().recommend(&obs);
            assert_eq!(recs.len(), 2);
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recommend_covers_both_bands() {
        let all = ChannelRecommender::default().recommend(&[]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].band, Band::Ghz24);
        assert_eq!(all[1].band, Band::Ghz5);
    }
}
