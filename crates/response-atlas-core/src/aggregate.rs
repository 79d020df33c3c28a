//! Joins cluster labels with sentiment categories into partitioned output
//! tables.
//!
//! One shared clustering; three filtered views (all, positive, negative).
//! Noise rows are dropped before any partitioning, so they never reach a
//! partition table or a centroid computation.

use std::collections::BTreeMap;

use crate::types::{Centroid, Partition, PartitionTable, Response};

pub struct ClusterAggregator;

impl ClusterAggregator {
    /// Split the labelled responses into the three partition tables
    /// (all, positive, negative) and return them alongside the number of
    /// noise rows dropped.
    pub fn aggregate(responses: Vec<Response>) -> ([PartitionTable; 3], usize) {
        let noise_count = responses.iter().filter(|r| r.is_noise()).count();
        let clustered: Vec<Response> =
            responses.into_iter().filter(|r| !r.is_noise()).collect();

        let tables = Partition::ALL.map(|partition| {
            let members: Vec<Response> = clustered
                .iter()
                .filter(|r| partition.contains(r))
                .cloned()
                .collect();
            let centroids = compute_centroids(&members);
            PartitionTable {
                partition,
                responses: members,
                centroids,
            }
        });

        tracing::debug!(noise = noise_count, "aggregated partitions");
        (tables, noise_count)
    }
}

/// Group by cluster label and compute the mean coordinate and member count
/// per group. Labels come out in ascending order.
fn compute_centroids(members: &[Response]) -> Vec<Centroid> {
    let mut groups: BTreeMap<i32, (f64, f64, usize)> = BTreeMap::new();
    for response in members {
        let entry = groups.entry(response.cluster_label).or_insert((0.0, 0.0, 0));
        entry.0 += response.coords[0] as f64;
        entry.1 += response.coords[1] as f64;
        entry.2 += 1;
    }
    groups
        .into_iter()
        .map(|(cluster_label, (sum_x, sum_y, member_count))| Centroid {
            cluster_label,
            x: (sum_x / member_count as f64) as f32,
            y: (sum_y / member_count as f64) as f32,
            member_count,
        })
        .collect()
}
