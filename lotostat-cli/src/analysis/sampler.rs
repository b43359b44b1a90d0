use anyhow::Result;
use chrono::Datelike;
use clap::ValueEnum;
use rand::SeedableRng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use lotostat_db::models::{Draw, LotteryConfig, NumberStats, Pool, PoolSpec, Suggestion};

use crate::analysis::compute_stats;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Favorise les numéros les plus sortis
    Hot,
    /// Favorise les numéros les moins sortis
    Cold,
    /// Favorise les numéros absents depuis longtemps
    Overdue,
    /// Moitié fréquence, moitié retard
    #[default]
    Balanced,
    /// Tirage uniforme
    Random,
}

pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn normalized(raw: impl Iterator<Item = f64>) -> Vec<f64> {
    let raw: Vec<f64> = raw.collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|w| w / total).collect()
}

/// Un poids strictement positif par numéro, dans l'ordre de `stats`.
pub fn strategy_weights(stats: &[NumberStats], strategy: Strategy) -> Vec<f64> {
    let max_freq = stats.iter().map(|s| s.frequency).max().unwrap_or(0);
    match strategy {
        Strategy::Hot => stats.iter().map(|s| s.frequency as f64 + 1.0).collect(),
        Strategy::Cold => stats
            .iter()
            .map(|s| (max_freq - s.frequency) as f64 + 1.0)
            .collect(),
        Strategy::Overdue => stats.iter().map(|s| s.gap as f64 + 1.0).collect(),
        Strategy::Random => vec![1.0; stats.len()],
        Strategy::Balanced => {
            let hot = normalized(stats.iter().map(|s| s.frequency as f64 + 1.0));
            let overdue = normalized(stats.iter().map(|s| s.gap as f64 + 1.0));
            hot.iter().zip(&overdue).map(|(h, o)| (h + o) / 2.0).collect()
        }
    }
}

pub fn generate_suggestions(
    draws: &[Draw],
    config: &LotteryConfig,
    strategy: Strategy,
    count: usize,
    seed: u64,
) -> Result<Vec<Suggestion>> {
    let mut rng = StdRng::seed_from_u64(seed);

    let main_stats = compute_stats(draws, config, Pool::Main);
    let main_weights = strategy_weights(&main_stats, strategy);
    let special = config.special().map(|spec| {
        let stats = compute_stats(draws, config, Pool::Special);
        let weights = strategy_weights(&stats, strategy);
        (spec, stats, weights)
    });

    let mut suggestions = Vec::with_capacity(count);

    for _ in 0..count {
        let (mut main, main_score) =
            sample_without_replacement(config.main(), &main_stats, &main_weights, &mut rng)?;
        main.sort();

        let (special_numbers, special_score) = match &special {
            Some((spec, stats, weights)) => {
                let (mut numbers, score) = sample_without_replacement(spec, stats, weights, &mut rng)?;
                numbers.sort();
                (numbers, score)
            }
            None => (Vec::new(), 1.0),
        };

        suggestions.push(Suggestion {
            main,
            special: special_numbers,
            score: main_score * special_score,
        });
    }

    Ok(suggestions)
}

/// Score : produit de `poids / poids moyen` sur les numéros retenus (1.0 pour un tirage uniforme).
fn sample_without_replacement(
    spec: &PoolSpec,
    stats: &[NumberStats],
    weights: &[f64],
    rng: &mut StdRng,
) -> Result<(Vec<u32>, f64)> {
    let mean_weight = weights.iter().sum::<f64>() / weights.len() as f64;
    let mut available: Vec<(u32, f64)> = stats
        .iter()
        .zip(weights)
        .map(|(s, &w)| (s.number, w))
        .collect();
    let mut selected = Vec::with_capacity(spec.count());
    let mut score = 1.0f64;

    for _ in 0..spec.count() {
        let current: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&current)?;
        let idx = dist.sample(rng);

        let (number, weight) = available.remove(idx);
        selected.push(number);
        score *= weight / mean_weight;
    }

    Ok((selected, score))
}
