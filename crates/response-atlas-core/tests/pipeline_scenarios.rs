//! End-to-end scenarios for the survey clustering pipeline.
//!
//! Everything here runs against the deterministic stubs, so the suite is
//! fast and reproducible on any machine.

use serde_json::json;

use response_atlas_core::cluster::{candidate_grid, ClusterParams};
use response_atlas_core::error::{InputError, PipelineError};
use response_atlas_core::pipeline::Pipeline;
use response_atlas_core::stubs::{StubEmbeddingProvider, StubSentimentScorer};
use response_atlas_core::types::{ClusteredSurvey, Granularity, InputTable, Partition};

fn survey_table(n: usize) -> InputTable {
    let texts = (0..n)
        .map(|i| {
            Some(match i % 4 {
                0 => format!("Support resolved my billing issue {i} quickly, great help"),
                1 => format!("The mobile app {i} crashes constantly, terrible experience"),
                2 => format!("Delivery took two weeks for order {i}"),
                _ => format!("Pricing for plan {i} seems fair overall"),
            })
        })
        .collect();
    InputTable::from_responses(texts)
}

fn run_pipeline(table: &InputTable, granularity: Granularity) -> ClusteredSurvey {
    let embedder = StubEmbeddingProvider::with_dimensions(64);
    let sentiment = StubSentimentScorer::new();
    Pipeline::new(&embedder, &sentiment)
        .run(table, granularity)
        .expect("pipeline run should succeed on valid input")
}

// ============================================================
// Input validation
// ============================================================

#[test]
fn test_empty_table_cites_empty_table() {
    let embedder = StubEmbeddingProvider::new();
    let sentiment = StubSentimentScorer::new();
    let err = Pipeline::new(&embedder, &sentiment)
        .run(&InputTable::new(), Granularity::Default)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Input(InputError::EmptyTable)));
    assert!(
        err.to_string().contains("empty"),
        "message should cite the empty table, got: {err}"
    );
}

#[test]
fn test_missing_text_column_cites_column_name() {
    let embedder = StubEmbeddingProvider::new();
    let sentiment = StubSentimentScorer::new();
    let table = InputTable::new().with_column("age", vec![json!(28), json!(64)]);
    let err = Pipeline::new(&embedder, &sentiment)
        .run(&table, Granularity::Default)
        .unwrap_err();

    assert!(err.is_input(), "missing column is an input error");
    assert!(
        err.to_string().contains("responses"),
        "message should name the missing column, got: {err}"
    );
}

#[test]
fn test_unsupported_granularity_cites_value() {
    let err = "fine".parse::<Granularity>().unwrap_err();
    assert!(
        err.to_string().contains("fine"),
        "message should cite the rejected value, got: {err}"
    );
}

// ============================================================
// Grid construction
// ============================================================

#[test]
fn test_default_grid_at_n_1000_equals_floor_set() {
    let grid = candidate_grid(1000, Granularity::Default);
    let mut mcs: Vec<usize> = grid.iter().map(|p| p.min_cluster_size).collect();
    mcs.dedup();
    assert_eq!(mcs, vec![17, 20, 22, 25, 27, 30, 32, 35]);
}

#[test]
fn test_default_grid_at_n_100_is_floor_dominated() {
    let grid = candidate_grid(100, Granularity::Default);
    let mut mcs: Vec<usize> = grid.iter().map(|p| p.min_cluster_size).collect();
    mcs.dedup();
    assert_eq!(mcs, vec![17, 20, 22, 25, 27, 30, 32, 35]);

    let ms: Vec<usize> = grid[..4].iter().map(|p| p.min_samples).collect();
    assert_eq!(ms, vec![5, 6, 7, 8]);
}

// ============================================================
// Label and partition invariants
// ============================================================

#[test]
fn test_every_row_gets_exactly_one_fate() {
    let n = 40;
    let survey = run_pipeline(&survey_table(n), Granularity::Default);
    assert_eq!(
        survey.all.responses.len() + survey.noise_count,
        n,
        "every row is either clustered or noise"
    );
}

#[test]
fn test_labels_are_dense_from_zero() {
    let survey = run_pipeline(&survey_table(60), Granularity::Default);
    let mut labels: Vec<i32> = survey
        .all
        .responses
        .iter()
        .map(|r| r.cluster_label)
        .collect();
    labels.sort_unstable();
    labels.dedup();
    for (expected, &label) in labels.iter().enumerate() {
        assert_eq!(
            label, expected as i32,
            "non-noise labels must be densely packed from 0, got {labels:?}"
        );
    }
}

#[test]
fn test_no_noise_in_any_partition_or_centroid() {
    let survey = run_pipeline(&survey_table(50), Granularity::Default);
    for partition in Partition::ALL {
        let table = survey.partition(partition);
        assert!(
            table.responses.iter().all(|r| r.cluster_label >= 0),
            "noise leaked into partition {}",
            partition.as_str()
        );
        assert!(
            table.centroids.iter().all(|c| c.cluster_label >= 0),
            "noise centroid in partition {}",
            partition.as_str()
        );
    }
}

#[test]
fn test_centroids_equal_member_means() {
    let survey = run_pipeline(&survey_table(50), Granularity::Default);
    for partition in Partition::ALL {
        let table = survey.partition(partition);
        for centroid in &table.centroids {
            let members: Vec<[f32; 2]> = table
                .responses
                .iter()
                .filter(|r| r.cluster_label == centroid.cluster_label)
                .map(|r| r.coords)
                .collect();
            assert_eq!(
                members.len(),
                centroid.member_count,
                "member count mismatch in {}",
                partition.as_str()
            );
            let mean_x: f32 =
                members.iter().map(|c| c[0]).sum::<f32>() / members.len() as f32;
            let mean_y: f32 =
                members.iter().map(|c| c[1]).sum::<f32>() / members.len() as f32;
            assert!(
                (centroid.x - mean_x).abs() < 1e-4 && (centroid.y - mean_y).abs() < 1e-4,
                "centroid ({}, {}) is not the member mean ({mean_x}, {mean_y})",
                centroid.x,
                centroid.y
            );
        }
    }
}

#[test]
fn test_positive_and_negative_are_subsets_of_all() {
    let survey = run_pipeline(&survey_table(40), Granularity::Default);
    let all_ids: Vec<_> = survey.all.responses.iter().map(|r| r.id).collect();
    for partition in [Partition::Positive, Partition::Negative] {
        for response in &survey.partition(partition).responses {
            assert!(
                all_ids.contains(&response.id),
                "{} row missing from the all partition",
                partition.as_str()
            );
        }
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn test_identical_input_identical_output() {
    let table = survey_table(35);
    let first = run_pipeline(&table, Granularity::Default);
    let second = run_pipeline(&table, Granularity::Default);

    assert_eq!(first.noise_count, second.noise_count);
    assert_eq!(first.all.centroids, second.all.centroids);
    let labels = |s: &ClusteredSurvey| -> Vec<(usize, i32)> {
        s.all
            .responses
            .iter()
            .map(|r| (r.row, r.cluster_label))
            .collect()
    };
    assert_eq!(labels(&first), labels(&second));
    let coords = |s: &ClusteredSurvey| -> Vec<[f32; 2]> {
        s.all.responses.iter().map(|r| r.coords).collect()
    };
    assert_eq!(coords(&first), coords(&second));
}

#[test]
fn test_broad_granularity_runs() {
    let survey = run_pipeline(&survey_table(30), Granularity::Broad);
    assert_eq!(survey.all.responses.len() + survey.noise_count, 30);
}

// ============================================================
// Fallback
// ============================================================

#[test]
fn test_small_homogeneous_input_uses_fallback_without_failing() {
    // A handful of near-identical answers cannot form two clusters at any
    // grid candidate, so the search falls back to {10, 5}. The run still
    // succeeds; rows end up in one cluster or as noise.
    let table = survey_table(12);
    let survey = run_pipeline(&table, Granularity::Default);
    assert_eq!(survey.all.responses.len() + survey.noise_count, 12);
    assert!(
        survey.all.centroids.len() <= 1,
        "fallback input should yield at most one cluster, got {}",
        survey.all.centroids.len()
    );
}

// ============================================================
// Sentiment join
// ============================================================

#[test]
fn test_partition_membership_follows_polarity() {
    let survey = run_pipeline(&survey_table(50), Granularity::Default);
    for response in &survey.positive.responses {
        assert!(response.polarity > 0.0, "positive partition requires polarity > 0");
    }
    for response in &survey.negative.responses {
        assert!(response.polarity < 0.0, "negative partition requires polarity < 0");
    }
}

#[test]
fn test_demographics_are_untouched() {
    let regions: Vec<_> = (0..20).map(|i| json!(format!("region-{}", i % 3))).collect();
    let table = survey_table(20).with_column("region", regions.clone());
    let embedder = StubEmbeddingProvider::with_dimensions(64);
    let sentiment = StubSentimentScorer::new();
    let survey = Pipeline::new(&embedder, &sentiment)
        .run(&table, Granularity::Default)
        .expect("pipeline run should succeed");

    assert_eq!(survey.demographics.len(), 1);
    assert_eq!(survey.demographics[0].name, "region");
    assert_eq!(survey.demographics[0].values, regions);
}

#[test]
fn test_fallback_params_are_fixed() {
    assert_eq!(ClusterParams::fallback(), ClusterParams::new(10, 5));
}
