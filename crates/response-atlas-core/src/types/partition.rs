//! Sentiment partitions and per-partition cluster aggregates.

use serde::{Deserialize, Serialize};

use super::response::{PolarityCategory, Response};

/// One of the three sentiment-based views over a single shared clustering.
///
/// Clustering is performed once over the whole input; partitions are filtered
/// views that keep the original cluster labels. A cluster can be absent from
/// a partition if none of its members carry that sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Every non-noise response.
    All,
    /// Non-noise responses with positive polarity.
    Positive,
    /// Non-noise responses with negative polarity.
    Negative,
}

impl Partition {
    /// All partitions in presentation order.
    pub const ALL: [Partition; 3] = [Partition::All, Partition::Positive, Partition::Negative];

    /// Whether a response belongs to this partition.
    ///
    /// Noise rows never belong to any partition; that filter happens before
    /// this predicate is consulted (see `aggregate`).
    pub fn contains(&self, response: &Response) -> bool {
        match self {
            Partition::All => true,
            Partition::Positive => response.polarity_category == PolarityCategory::Positive,
            Partition::Negative => response.polarity_category == PolarityCategory::Negative,
        }
    }

    /// Stable lowercase name, used as the output key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::All => "all",
            Partition::Positive => "positive",
            Partition::Negative => "negative",
        }
    }
}

/// Aggregate statistics for one cluster within one partition.
///
/// The coordinate is the arithmetic mean of member coordinates restricted to
/// the partition, so a positive centroid can sit elsewhere than the
/// all-partition centroid of the same cluster label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Cluster label shared with the other partitions.
    pub cluster_label: i32,
    /// Mean x coordinate of members in this partition.
    pub x: f32,
    /// Mean y coordinate of members in this partition.
    pub y: f32,
    /// Member count in this partition.
    pub member_count: usize,
}
