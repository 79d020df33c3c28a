//! Output bundle returned by a pipeline run.

use serde::{Deserialize, Serialize};

use super::partition::{Centroid, Partition};
use super::response::Response;
use super::table::Column;

/// One partition's filtered responses and centroid table.
///
/// Noise rows (`cluster_label == -1`) never appear here; they exist only
/// between the clusterer and the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionTable {
    /// Which partition this is.
    pub partition: Partition,
    /// Responses belonging to the partition, in input order.
    pub responses: Vec<Response>,
    /// Per-cluster aggregates. Clusters with zero members in this partition
    /// are absent — callers must not assume the ALL label set appears here.
    pub centroids: Vec<Centroid>,
}

/// Complete result of one pipeline run, consumed by summarization and
/// visualization collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteredSurvey {
    /// All non-noise responses with centroids.
    pub all: PartitionTable,
    /// Positive-polarity view.
    pub positive: PartitionTable,
    /// Negative-polarity view.
    pub negative: PartitionTable,
    /// Demographic columns of the input, carried through untouched.
    pub demographics: Vec<Column>,
    /// Number of rows the clusterer marked as noise and dropped.
    pub noise_count: usize,
}

impl ClusteredSurvey {
    /// Look up a partition table by its tag.
    pub fn partition(&self, partition: Partition) -> &PartitionTable {
        match partition {
            Partition::All => &self.all,
            Partition::Positive => &self.positive,
            Partition::Negative => &self.negative,
        }
    }
}
