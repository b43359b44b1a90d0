use lotostat_db::models::{Draw, LotteryConfig, NumberRange};

/// Résultat du parsing d'un historique : les tirages valides, en ordre chronologique
/// (première ligne = tirage le plus ancien), et les lignes écartées (numérotées à partir de 1).
#[derive(Debug, Default)]
pub struct ParsedHistory {
    pub draws: Vec<Draw>,
    pub skipped_lines: Vec<usize>,
}

/// Chaque suite de chiffres compte pour un entier. `None` pour une suite trop grande pour `u32`,
/// qui occupe sa position mais sera hors plage pour tous les pools.
pub fn extract_integers(line: &str) -> Vec<Option<u32>> {
    line.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u32>().ok())
        .collect()
}

fn keep_in_range(values: &[Option<u32>], range: NumberRange) -> Vec<u32> {
    values
        .iter()
        .flatten()
        .copied()
        .filter(|&n| range.contains(n))
        .collect()
}

pub fn parse_line(line: &str, config: &LotteryConfig) -> Option<Draw> {
    let values = extract_integers(line);
    let main_spec = config.main();
    if values.len() < main_spec.count() {
        return None;
    }

    let (main_values, rest) = values.split_at(main_spec.count());
    let main = keep_in_range(main_values, main_spec.range());
    let special = match config.special() {
        Some(spec) => {
            let taken = spec.count().min(rest.len());
            keep_in_range(&rest[..taken], spec.range())
        }
        None => Vec::new(),
    };

    Some(Draw { main, special })
}

pub fn parse_history_report(text: &str, config: &LotteryConfig) -> ParsedHistory {
    let mut parsed = ParsedHistory::default();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, config) {
            Some(draw) => parsed.draws.push(draw),
            None => parsed.skipped_lines.push(i + 1),
        }
    }
    parsed
}

pub fn parse_history(text: &str, config: &LotteryConfig) -> Vec<Draw> {
    parse_history_report(text, config).draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotostat_db::presets::preset;

    #[test]
    fn test_extract_integers_permissive() {
        assert_eq!(
            extract_integers("12-05-2024: 1, 2;3 | 40"),
            vec![Some(12), Some(5), Some(2024), Some(1), Some(2), Some(3), Some(40)]
        );
        assert!(extract_integers("a b c").is_empty());
        assert!(extract_integers("").is_empty());
    }

    #[test]
    fn test_extract_integers_overflow_keeps_position() {
        assert_eq!(
            extract_integers("1 99999999999999999999 3"),
            vec![Some(1), None, Some(3)]
        );
    }

    #[test]
    fn test_parse_line_with_special() {
        let config = preset("euromillions").unwrap();
        let draw = parse_line("3 14 25 36 47 + 2 11", &config).unwrap();
        assert_eq!(draw.main, vec![3, 14, 25, 36, 47]);
        assert_eq!(draw.special, vec![2, 11]);
    }

    #[test]
    fn test_parse_line_too_short_is_discarded() {
        let config = preset("euromillions").unwrap();
        assert!(parse_line("1 2 3 4", &config).is_none());
        assert!(parse_line("a b c", &config).is_none());
    }

    #[test]
    fn test_parse_line_drops_out_of_range_individually() {
        let config = preset("euromillions").unwrap();
        let draw = parse_line("1 2 3 4 77 13 5", &config).unwrap();
        assert_eq!(draw.main, vec![1, 2, 3, 4]);
        assert_eq!(draw.special, vec![5]);
    }

    #[test]
    fn test_parse_line_partial_special_tolerated() {
        let config = preset("euromillions").unwrap();
        let draw = parse_line("1 2 3 4 5 9", &config).unwrap();
        assert_eq!(draw.special, vec![9]);
        let draw = parse_line("1 2 3 4 5", &config).unwrap();
        assert!(draw.special.is_empty());
    }

    #[test]
    fn test_parse_line_single_domain_ignores_extra() {
        let config = preset("lotto649").unwrap();
        let draw = parse_line("1 2 3 4 5 6 7 8", &config).unwrap();
        assert_eq!(draw.main, vec![1, 2, 3, 4, 5, 6]);
        assert!(draw.special.is_empty());
    }

    #[test]
    fn test_parse_history_report_skips_and_orders() {
        let config = preset("lotto649").unwrap();
        let text = "1 2 3 4 5 6\n\nbonjour\n7 8 9 10 11 12\n";
        let parsed = parse_history_report(text, &config);
        assert_eq!(parsed.draws.len(), 2);
        assert_eq!(parsed.draws[0].main[0], 1);
        assert_eq!(parsed.draws[1].main[0], 7);
        assert_eq!(parsed.skipped_lines, vec![3]);
    }
}
