//! End-to-end orchestration: validate, normalize, embed, reduce, cluster,
//! score sentiment, aggregate.
//!
//! A pipeline run is a pure function of (input table, granularity, config);
//! no state survives between calls beyond what the caller keeps.

use uuid::Uuid;

use crate::aggregate::ClusterAggregator;
use crate::cluster::ClusterOptimizer;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::normalize::clean_column;
use crate::reduce::DimensionalityReducer;
use crate::traits::{check_batch_shape, EmbeddingProvider, SentimentScorer};
use crate::types::{
    ClusteredSurvey, Granularity, InputTable, PolarityCategory, Response,
    SubjectivityCategory,
};

/// Survey clustering pipeline.
///
/// Embedding and sentiment scoring are external capabilities injected at
/// construction; everything else is owned here.
pub struct Pipeline<'a> {
    embedder: &'a dyn EmbeddingProvider,
    sentiment: &'a dyn SentimentScorer,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(embedder: &'a dyn EmbeddingProvider, sentiment: &'a dyn SentimentScorer) -> Self {
        Self::with_config(embedder, sentiment, PipelineConfig::default())
    }

    pub fn with_config(
        embedder: &'a dyn EmbeddingProvider,
        sentiment: &'a dyn SentimentScorer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            sentiment,
            config,
        }
    }

    /// Run the full pipeline over `table` and return the partitioned result.
    ///
    /// # Errors
    ///
    /// - `InputError` for an empty table, a missing text column, or
    ///   degenerate (variance-free) embeddings
    /// - `ComputationError` if embedding, reduction, or clustering fails
    pub fn run(&self, table: &InputTable, granularity: Granularity) -> Result<ClusteredSurvey> {
        let raw_texts = table.text_values(&self.config.text_column)?;
        let n = raw_texts.len();
        tracing::info!(
            rows = n,
            granularity = %granularity,
            model = self.embedder.model_id(),
            "pipeline run starting"
        );

        let cleaned = clean_column(&raw_texts);

        let embeddings = self.embedder.embed_batch(&cleaned)?;
        check_batch_shape(&embeddings, n, self.embedder.dimensions())?;

        let reducer =
            DimensionalityReducer::new(self.config.variance_threshold, self.config.manifold_seed);
        let coords = reducer.reduce(&embeddings)?;

        let optimizer = ClusterOptimizer::with_fallback(granularity, self.config.fallback);
        let (labels, params) = optimizer.optimize(&coords)?;
        tracing::debug!(
            min_cluster_size = params.min_cluster_size,
            min_samples = params.min_samples,
            "clustering committed"
        );

        // Sentiment is scored on the raw text; normalization strips the
        // punctuation and casing the lexicon keys on.
        let scores = self.sentiment.score_batch(&raw_texts);

        let responses: Vec<Response> = (0..n)
            .map(|row| Response {
                id: Uuid::new_v4(),
                row,
                raw_text: raw_texts[row].clone(),
                cleaned_text: cleaned[row].clone(),
                embedding: embeddings[row].clone(),
                coords: coords[row],
                polarity: scores[row].polarity,
                polarity_category: PolarityCategory::from_polarity(scores[row].polarity),
                subjectivity: scores[row].subjectivity,
                subjectivity_category: SubjectivityCategory::from_subjectivity(
                    scores[row].subjectivity,
                ),
                cluster_label: labels[row],
            })
            .collect();

        let (tables, noise_count) = ClusterAggregator::aggregate(responses);
        let [all, positive, negative] = tables;

        let demographics = table
            .demographic_columns(&self.config.text_column)
            .into_iter()
            .cloned()
            .collect();

        tracing::info!(
            clustered = all.responses.len(),
            noise = noise_count,
            clusters = all.centroids.len(),
            "pipeline run complete"
        );
        Ok(ClusteredSurvey {
            all,
            positive,
            negative,
            demographics,
            noise_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::stubs::{StubEmbeddingProvider, StubSentimentScorer};
    use serde_json::json;

    fn pipeline_fixtures() -> (StubEmbeddingProvider, StubSentimentScorer) {
        (StubEmbeddingProvider::with_dimensions(32), StubSentimentScorer::new())
    }

    fn survey_table(n: usize) -> InputTable {
        let texts = (0..n)
            .map(|i| Some(format!("The checkout flow number {i} was great and fast")))
            .collect();
        InputTable::from_responses(texts)
    }

    #[test]
    fn test_empty_table_is_input_error() {
        let (embedder, sentiment) = pipeline_fixtures();
        let pipeline = Pipeline::new(&embedder, &sentiment);
        let err = pipeline
            .run(&InputTable::new(), Granularity::Default)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)), "got {err:?}");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_missing_text_column_is_input_error() {
        let (embedder, sentiment) = pipeline_fixtures();
        let pipeline = Pipeline::new(&embedder, &sentiment);
        let table = InputTable::new().with_column("age", vec![json!(30), json!(41)]);
        let err = pipeline.run(&table, Granularity::Default).unwrap_err();
        assert!(err.to_string().contains("responses"), "got: {err}");
    }

    #[test]
    fn test_run_labels_every_row() {
        let (embedder, sentiment) = pipeline_fixtures();
        let pipeline = Pipeline::new(&embedder, &sentiment);
        let n = 30;
        let survey = pipeline.run(&survey_table(n), Granularity::Default).unwrap();

        assert_eq!(survey.all.responses.len() + survey.noise_count, n);
        for response in &survey.all.responses {
            assert!(response.cluster_label >= 0);
            assert_eq!(response.embedding.len(), 32);
        }
    }

    #[test]
    fn test_demographics_carried_through() {
        let (embedder, sentiment) = pipeline_fixtures();
        let pipeline = Pipeline::new(&embedder, &sentiment);
        let table = survey_table(10).with_column(
            "region",
            (0..10).map(|i| json!(format!("r{i}"))).collect(),
        );
        let survey = pipeline.run(&table, Granularity::Default).unwrap();
        assert_eq!(survey.demographics.len(), 1);
        assert_eq!(survey.demographics[0].name, "region");
        assert_eq!(survey.demographics[0].values.len(), 10);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let (embedder, sentiment) = pipeline_fixtures();
        let pipeline = Pipeline::new(&embedder, &sentiment);
        let table = survey_table(25);

        let first = pipeline.run(&table, Granularity::Default).unwrap();
        let second = pipeline.run(&table, Granularity::Default).unwrap();

        let labels = |s: &ClusteredSurvey| -> Vec<i32> {
            s.all.responses.iter().map(|r| r.cluster_label).collect()
        };
        assert_eq!(labels(&first), labels(&second));
        assert_eq!(first.all.centroids, second.all.centroids);
        for (a, b) in first
            .all
            .responses
            .iter()
            .zip(&second.all.responses)
        {
            assert_eq!(a.coords, b.coords);
        }
    }
}
