pub mod cache;
pub mod parse;
pub mod sampler;

use std::cmp::Ordering;

use lotostat_db::models::{
    AnalysisResults, Draw, GameAnalysis, LotteryConfig, NumberAnalysis, NumberStats, Pool, PoolSpec,
};

use crate::analysis::parse::parse_history;

/// Longueur des listes chaudes / froides / en retard.
pub const TOP_K: usize = 5;

pub fn analyze(historical_text: &str, config: &LotteryConfig) -> GameAnalysis {
    analyze_with_top(historical_text, config, TOP_K)
}

pub fn analyze_with_top(historical_text: &str, config: &LotteryConfig, top: usize) -> GameAnalysis {
    let draws = parse_history(historical_text, config);
    analyze_draws(&draws, config, top)
}

/// `draws` en ordre chronologique : le dernier élément est le tirage le plus récent.
pub fn analyze_draws(draws: &[Draw], config: &LotteryConfig, top: usize) -> GameAnalysis {
    let main = rank_stats(&pool_stats(draws, config.main(), Pool::Main), draws.len(), top);
    let special = config
        .special()
        .map(|spec| rank_stats(&pool_stats(draws, spec, Pool::Special), draws.len(), top));

    GameAnalysis {
        draw_count: draws.len(),
        main,
        special,
    }
}

/// Fréquence et retard de chaque numéro du pool. Vide si le jeu n'a pas ce pool.
pub fn compute_stats(draws: &[Draw], config: &LotteryConfig, pool: Pool) -> Vec<NumberStats> {
    match pool.spec_of(config) {
        Some(spec) => pool_stats(draws, spec, pool),
        None => Vec::new(),
    }
}

fn pool_stats(draws: &[Draw], spec: &PoolSpec, pool: Pool) -> Vec<NumberStats> {
    let range = spec.range();
    let mut stats: Vec<NumberStats> = range
        .numbers()
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: draws.len() as u32,
        })
        .collect();

    // Du plus récent au plus ancien : la première apparition donne le retard
    for (age, draw) in draws.iter().rev().enumerate() {
        for &n in pool.numbers_from(draw) {
            if let Some(idx) = range.index_of(n) {
                let stat = &mut stats[idx];
                if stat.frequency == 0 {
                    stat.gap = age as u32;
                }
                stat.frequency += 1;
            }
        }
    }

    stats
}

fn top_by<F>(stats: &[NumberStats], top: usize, value: fn(&NumberStats) -> u32, order: F) -> Vec<NumberAnalysis>
where
    F: Fn(u32, u32) -> Ordering,
{
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| order(value(a), value(b)).then(a.number.cmp(&b.number)));
    sorted
        .iter()
        .take(top)
        .map(|s| NumberAnalysis {
            number: s.number,
            value: value(s),
        })
        .collect()
}

/// Sans tirage valide, les trois listes restent vides.
pub fn rank_stats(stats: &[NumberStats], draw_count: usize, top: usize) -> AnalysisResults {
    if draw_count == 0 {
        return AnalysisResults::default();
    }

    AnalysisResults {
        hot_numbers: top_by(stats, top, |s| s.frequency, |a, b| b.cmp(&a)),
        cold_numbers: top_by(stats, top, |s| s.frequency, |a, b| a.cmp(&b)),
        overdue_numbers: top_by(stats, top, |s| s.gap, |a, b| b.cmp(&a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotostat_db::models::NumberRange;
    use lotostat_db::presets::preset;

    fn five_of_ten() -> LotteryConfig {
        LotteryConfig::single(
            "Test",
            PoolSpec::new("Numéros", 5, NumberRange::new(1, 10).unwrap()).unwrap(),
        )
    }

    fn numbers(list: &[NumberAnalysis]) -> Vec<u32> {
        list.iter().map(|a| a.number).collect()
    }

    fn values(list: &[NumberAnalysis]) -> Vec<u32> {
        list.iter().map(|a| a.value).collect()
    }

    #[test]
    fn test_empty_text_gives_empty_lists() {
        for config in [five_of_ten(), preset("euromillions").unwrap()] {
            let result = analyze("", &config);
            assert_eq!(result.draw_count, 0);
            assert!(result.main.is_empty());
            if let Some(special) = &result.special {
                assert!(special.is_empty());
            }
        }
    }

    #[test]
    fn test_unparseable_text_gives_empty_lists() {
        let result = analyze("pas de données\n???\n\t\n", &five_of_ten());
        assert_eq!(result.draw_count, 0);
        assert!(result.main.is_empty());
    }

    #[test]
    fn test_hot_and_cold_scenario() {
        let result = analyze("1 2 3 4 5\n1 2 3 4 6\n2 3 4 5 7", &five_of_ten());
        assert_eq!(result.draw_count, 3);

        assert_eq!(numbers(&result.main.hot_numbers[..3]), vec![2, 3, 4]);
        assert_eq!(values(&result.main.hot_numbers[..3]), vec![3, 3, 3]);
        assert_eq!(numbers(&result.main.hot_numbers), vec![2, 3, 4, 1, 5]);

        assert_eq!(numbers(&result.main.cold_numbers), vec![8, 9, 10, 6, 7]);
        assert_eq!(values(&result.main.cold_numbers), vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_malformed_line_contributes_nothing() {
        let with_noise = analyze("1 2 3 4 5\na b c\n6 7 8 9 10", &five_of_ten());
        let clean = analyze("1 2 3 4 5\n6 7 8 9 10", &five_of_ten());
        assert_eq!(with_noise.draw_count, 2);
        assert_eq!(with_noise, clean);
    }

    #[test]
    fn test_overdue_scenario() {
        let config = five_of_ten();
        let draws = parse_history("1 2 3 4 5\n6 7 8 9 10", &config);
        let stats = compute_stats(&draws, &config, Pool::Main);
        assert_eq!(stats[0].gap, 1);
        assert_eq!(stats[5].gap, 0);

        let result = analyze_draws(&draws, &config, TOP_K);
        assert_eq!(numbers(&result.main.overdue_numbers), vec![1, 2, 3, 4, 5]);
        assert_eq!(values(&result.main.overdue_numbers), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_never_seen_gap_is_draw_count() {
        let config = LotteryConfig::single(
            "Test",
            PoolSpec::new("Numéros", 5, NumberRange::new(1, 12).unwrap()).unwrap(),
        );
        let result = analyze("1 2 3 4 5\n6 7 8 9 10", &config);
        assert_eq!(result.main.overdue_numbers[0], NumberAnalysis { number: 11, value: 2 });
        assert_eq!(result.main.overdue_numbers[1], NumberAnalysis { number: 12, value: 2 });
        assert_eq!(result.main.overdue_numbers[2], NumberAnalysis { number: 1, value: 1 });
    }

    #[test]
    fn test_recency_follows_line_order() {
        let config = five_of_ten();
        let forward = analyze("1 2 3 4 5\n6 7 8 9 10", &config);
        let backward = analyze("6 7 8 9 10\n1 2 3 4 5", &config);
        assert_eq!(numbers(&forward.main.overdue_numbers), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&backward.main.overdue_numbers), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_orderings_are_monotonic() {
        let config = preset("euromillions").unwrap();
        let text = "\
            3 14 25 36 47 2 11\n\
            1 14 22 36 50 2 5\n\
            7 8 25 30 47 1 11\n\
            14 19 25 33 41 3 11\n\
            2 9 14 36 44 2 12\n";
        let result = analyze_with_top(text, &config, 20);
        for results in [&result.main, result.special.as_ref().unwrap()] {
            assert!(results.hot_numbers.windows(2).all(|w| w[0].value >= w[1].value));
            assert!(results.cold_numbers.windows(2).all(|w| w[0].value <= w[1].value));
            assert!(results.overdue_numbers.windows(2).all(|w| w[0].value >= w[1].value));
        }
    }

    #[test]
    fn test_numbers_stay_in_range() {
        let config = preset("powerball").unwrap();
        let text = "0 70 71 5 6 27 0\n1 2 3 4 5 26\n999 12 13 14 15 1\n";
        let result = analyze_with_top(text, &config, 100);
        let main_range = config.main().range();
        let special_range = config.special().unwrap().range();
        for a in result.main.hot_numbers.iter().chain(&result.main.cold_numbers).chain(&result.main.overdue_numbers) {
            assert!(main_range.contains(a.number));
        }
        let special = result.special.unwrap();
        for a in special.hot_numbers.iter().chain(&special.cold_numbers).chain(&special.overdue_numbers) {
            assert!(special_range.contains(a.number));
        }
    }

    #[test]
    fn test_counts_sum_to_draws_times_pick() {
        let config = preset("euromillions").unwrap();
        let text = "1 2 3 4 5 1 2\n6 7 8 9 10 3 4\nbruit\n1 12 23 34 45 1 12\n";
        let draws = parse_history(text, &config);
        let main: u32 = compute_stats(&draws, &config, Pool::Main).iter().map(|s| s.frequency).sum();
        let special: u32 = compute_stats(&draws, &config, Pool::Special).iter().map(|s| s.frequency).sum();
        assert_eq!(main as usize, config.main().count() * draws.len());
        assert_eq!(special as usize, config.special().unwrap().count() * draws.len());
    }

    #[test]
    fn test_out_of_range_numbers_lower_the_sum() {
        let config = preset("lotto649").unwrap();
        let draws = parse_history("1 2 3 4 5 99\n7 8 9 10 11 12", &config);
        assert_eq!(draws.len(), 2);
        let total: u32 = compute_stats(&draws, &config, Pool::Main).iter().map(|s| s.frequency).sum();
        // 99 est écarté mais la ligne reste valide
        assert_eq!(total, 11);
        assert!((total as usize) < config.main().count() * draws.len());
    }

    #[test]
    fn test_special_pool_is_independent() {
        let config = preset("euromillions").unwrap();
        let result = analyze("1 2 3 4 5 11 12\n1 2 3 4 6 11 10", &config);
        let special = result.special.unwrap();
        assert_eq!(special.hot_numbers[0], NumberAnalysis { number: 11, value: 2 });
        assert_eq!(special.cold_numbers[0], NumberAnalysis { number: 1, value: 0 });
        assert_eq!(result.main.hot_numbers[0], NumberAnalysis { number: 1, value: 2 });
    }

    #[test]
    fn test_single_domain_has_no_special() {
        let result = analyze("1 2 3 4 5 6", &preset("lotto649").unwrap());
        assert!(result.special.is_none());
        assert!(compute_stats(&[], &preset("lotto649").unwrap(), Pool::Special).is_empty());
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let config = preset("loto").unwrap();
        let text = "4 8 15 16 23 2\n42 8 15 4 1 10\n";
        assert_eq!(analyze(text, &config), analyze(text, &config));
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let config = preset("euromillions").unwrap();
        let texts = ["1 2 3 4 5 1 2", "10 20 30 40 50 11 12\n1 2 3 4 5 6 7", ""];
        let expected: Vec<GameAnalysis> = texts.iter().map(|t| analyze(t, &config)).collect();
        let config = &config;

        std::thread::scope(|scope| {
            let handles: Vec<_> = texts
                .iter()
                .map(|&t| scope.spawn(move || analyze(t, config)))
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(&handle.join().unwrap(), want);
            }
        });
    }

    #[test]
    fn test_top_larger_than_pool() {
        let result = analyze_with_top("1 2 3 4 5", &five_of_ten(), 50);
        assert_eq!(result.main.hot_numbers.len(), 10);
        assert_eq!(result.main.cold_numbers.len(), 10);
    }
}
