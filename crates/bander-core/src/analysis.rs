//! One scan cycle: ingest → congestion scoring → recommendation.
//!
//! [`Analyzer::analyze`] is a pure function of its observation list and the
//! injected channel plan; it holds no state between cycles.

use serde::{Deserialize, Serialize};

use crate::channel::{Band, ChannelPlan};
use crate::congestion::{self, ScoredObservation};
use crate::observation::NetworkObservation;
use crate::occupancy::OccupancyMap;
use crate::recommend::{BandRecommendations, ChannelRecommender};

/// Network count per regulatory channel of one band, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUsage {
    pub band: Band,
    /// Channels occupied in this cycle, ascending.
    pub detected: Vec<u16>,
    /// `(channel, network_count)` for every plan channel.
    pub counts: Vec<(u16, u32)>,
}

/// Everything a presentation layer needs for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Scored networks, least congested first.
    pub networks: Vec<ScoredObservation>,
    pub recommendations: Vec<BandRecommendations>,
    pub usage: Vec<ChannelUsage>,
    /// Observations dropped as unusable (channel 0).
    pub discarded: usize,
}

impl ScanReport {
    pub fn recommendations_for(&self, band: Band) -> Option<&BandRecommendations> {
        self.recommendations.iter().find(|r| r.band == band)
    }

    pub fn usage_for(&self, band: Band) -> Option<&ChannelUsage> {
        self.usage.iter().find(|u| u.band == band)
    }
}

/// Runs the per-cycle pipeline against a fixed channel plan.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    recommender: ChannelRecommender,
}

impl Analyzer {
    pub fn new(plan: ChannelPlan) -> Self {
        Analyzer {
            recommender: ChannelRecommender::new(plan),
        }
    }

    pub fn with_recommender(recommender: ChannelRecommender) -> Self {
        Analyzer { recommender }
    }

    pub fn plan(&self) -> &ChannelPlan {
        self.recommender.plan()
    }

    pub fn analyze(&self, observations: &[NetworkObservation]) -> ScanReport {
        let usable: Vec<NetworkObservation> = observations
            .iter()
            .filter(|o| o.is_usable())
            .cloned()
            .collect();
        let discarded = observations.len() - usable.len();
        if discarded > 0 {
            tracing::debug!(discarded, "dropped observations without a channel");
        }

        let mut networks = congestion::score_observations(&usable);
        networks.sort_by_key(|n| n.congestion_score);

        let recommendations = self.recommender.recommend(&usable);
        let usage = Band::ALL
            .iter()
            .map(|&band| self.channel_usage(&usable, band))
            .collect();

        ScanReport {
            networks,
            recommendations,
            usage,
            discarded,
        }
    }

    fn channel_usage(&self, observations: &[NetworkObservation], band: Band) -> ChannelUsage {
        let occupancy = OccupancyMap::for_band(observations, band);
        ChannelUsage {
            band,
            detected: occupancy.iter().map(|o| o.channel).collect(),
            counts: self
                .plan()
                .all_channels(band)
                .iter()
                .map(|&ch| (ch, occupancy.network_count(ch)))
                .collect(),
        }
    }
}
