//! Seeded train/test splitting.
//!
//! Rows are shuffled with a seeded RNG and partitioned by the configured
//! test fraction; optionally the shuffle is stratified by the target so each
//! class keeps its proportion in both partitions. Every row lands in exactly
//! one partition, and both partitions preserve the original row order.

use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::SplitConfig;
use crate::error::Result;

/// Partitions a table into train and test subsets.
pub struct TrainTestSplitter;

impl TrainTestSplitter {
    /// Split `df` into (train, test).
    pub fn split(
        df: &DataFrame,
        target: &str,
        config: &SplitConfig,
    ) -> Result<(DataFrame, DataFrame)> {
        let height = df.height();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut test_indices: Vec<IdxSize> = if config.stratify {
            Self::stratified_test_indices(df, target, config.test_size, &mut rng)?
        } else {
            let mut indices: Vec<IdxSize> = (0..height as IdxSize).collect();
            indices.shuffle(&mut rng);
            let n_test = (height as f64 * config.test_size).round() as usize;
            indices.truncate(n_test);
            indices
        };

        test_indices.sort_unstable();

        let mut in_test = vec![false; height];
        for &idx in &test_indices {
            in_test[idx as usize] = true;
        }
        let train_indices: Vec<IdxSize> = (0..height as IdxSize)
            .filter(|&i| !in_test[i as usize])
            .collect();

        let train = df.take(&IdxCa::from_vec("idx".into(), train_indices))?;
        let test = df.take(&IdxCa::from_vec("idx".into(), test_indices))?;

        debug!(
            "Split {} rows into {} train / {} test (seed {})",
            height,
            train.height(),
            test.height(),
            config.seed
        );

        Ok((train, test))
    }

    /// Pick test indices per target class, keeping class proportions.
    fn stratified_test_indices(
        df: &DataFrame,
        target: &str,
        test_size: f64,
        rng: &mut StdRng,
    ) -> Result<Vec<IdxSize>> {
        let target_series = df.column(target)?.as_materialized_series().clone();

        // BTreeMap keeps class iteration order independent of row order
        let mut groups: std::collections::BTreeMap<String, Vec<IdxSize>> =
            std::collections::BTreeMap::new();
        for i in 0..df.height() {
            let key = target_series.get(i)?.to_string();
            groups.entry(key).or_default().push(i as IdxSize);
        }

        let mut test_indices = Vec::new();
        for (_, mut indices) in groups {
            indices.shuffle(rng);
            let n_test = ((indices.len() as f64) * test_size).round() as usize;
            test_indices.extend(indices.into_iter().take(n_test));
        }

        Ok(test_indices)
    }
}
