use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::import::ImportResult;
use lotostat_db::models::{
    AnalysisResults, Draw, GameAnalysis, LotteryConfig, NumberAnalysis, NumberStats, PoolSpec,
    Suggestion,
};
use lotostat_db::presets::Preset;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn format_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn pool_label(spec: &PoolSpec) -> String {
    format!("{} ({}, {} par tirage)", spec.name(), spec.range(), spec.count())
}

pub fn display_presets(presets: &[Preset]) {
    let mut table = new_table(vec!["Identifiant", "Jeu", "Numéros", "Spécial"]);
    for p in presets {
        let special = p
            .config
            .special()
            .map(pool_label)
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            p.slug.to_string(),
            p.config.game_name.clone(),
            pool_label(p.config.main()),
            special,
        ]);
    }
    println!("{table}");
}

pub fn display_games(games: &[(String, u32)]) {
    if games.is_empty() {
        println!("Aucun historique en base.");
        return;
    }
    let mut table = new_table(vec!["Jeu", "Tirages"]);
    for (game, count) in games {
        table.add_row(vec![game.clone(), count.to_string()]);
    }
    println!("{table}");
}

pub fn display_draws(config: &LotteryConfig, draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut header = vec!["#", config.main().name()];
    if let Some(special) = config.special() {
        header.push(special.name());
    }
    let mut table = new_table(header);

    // Le plus récent en premier
    for (i, draw) in draws.iter().rev().enumerate() {
        let mut row = vec![(i + 1).to_string(), format_numbers(&draw.main)];
        if config.special().is_some() {
            row.push(format_numbers(&draw.special));
        }
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Lignes lues      : {}", result.total_lines);
    println!("  Tirages ajoutés  : {}", result.imported);
    if result.skipped > 0 {
        println!("  Lignes ignorées  : {}", result.skipped);
    }
}

fn cell(entry: Option<&NumberAnalysis>, color: Color) -> Cell {
    match entry {
        Some(a) => Cell::new(format!("{:2}  ({})", a.number, a.value)).fg(color),
        None => Cell::new(""),
    }
}

fn display_results(title: &str, results: &AnalysisResults) {
    println!("── {title} ──");
    if results.is_empty() {
        println!("Aucun résultat.");
        return;
    }

    let mut table = new_table(vec!["Rang", "Chauds (sorties)", "Froids (sorties)", "En retard (tirages)"]);
    let rows = results
        .hot_numbers
        .len()
        .max(results.cold_numbers.len())
        .max(results.overdue_numbers.len());
    for i in 0..rows {
        table.add_row(vec![
            Cell::new(i + 1),
            cell(results.hot_numbers.get(i), Color::Red),
            cell(results.cold_numbers.get(i), Color::Blue),
            cell(results.overdue_numbers.get(i), Color::Yellow),
        ]);
    }
    println!("{table}");
}

pub fn display_analysis(config: &LotteryConfig, analysis: &GameAnalysis) {
    println!("\n📊 {} — {} tirages analysés\n", config.game_name, analysis.draw_count);
    if analysis.draw_count == 0 {
        println!("Aucun tirage valide dans l'historique.");
        return;
    }

    display_results(&pool_label(config.main()), &analysis.main);
    if let (Some(spec), Some(results)) = (config.special(), &analysis.special) {
        println!();
        display_results(&pool_label(spec), results);
    }
}

pub fn display_stats(spec: &PoolSpec, stats: &[NumberStats]) {
    println!("\n── {} : détail ──", spec.name());
    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:2}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_suggestions(config: &LotteryConfig, suggestions: &[Suggestion], strategy: &str) {
    println!("\n🎲 Suggestions ({strategy})\n");

    let mut header = vec!["#", config.main().name()];
    if let Some(special) = config.special() {
        header.push(special.name());
    }
    header.push("Score");
    let mut table = new_table(header);

    for (i, sug) in suggestions.iter().enumerate() {
        let mut row = vec![(i + 1).to_string(), format_numbers(&sug.main)];
        if config.special().is_some() {
            row.push(format_numbers(&sug.special));
        }
        row.push(format!("{:.4}", sug.score));
        table.add_row(row);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 14, 25]), " 3 - 14 - 25");
        assert_eq!(format_numbers(&[]), "");
    }
}
