use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lotostat_db::rusqlite::Connection;
use tracing::{debug, info};

use lotostat_db::db::append_draws;
use lotostat_db::models::LotteryConfig;

use crate::analysis::parse::parse_history_report;

/// Lit un historique depuis un fichier, ou depuis l'entrée standard si le chemin est `-`.
pub fn read_history(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Erreur de lecture de l'entrée standard")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Impossible d'ouvrir {:?}", path))
}

pub struct ImportResult {
    pub total_lines: u32,
    pub imported: u32,
    pub skipped: u32,
}

/// Ajoute les tirages valides de `text` à l'historique stocké du jeu.
pub fn import_history(
    conn: &Connection,
    game: &str,
    config: &LotteryConfig,
    text: &str,
) -> Result<ImportResult> {
    let parsed = parse_history_report(text, config);
    for line in &parsed.skipped_lines {
        debug!("Ligne {} ignorée : moins de {} numéros", line, config.main().count());
    }

    let imported = append_draws(conn, game, config, &parsed.draws)?;
    let result = ImportResult {
        total_lines: (parsed.draws.len() + parsed.skipped_lines.len()) as u32,
        imported: imported as u32,
        skipped: parsed.skipped_lines.len() as u32,
    };
    info!(
        "Import {} : {} tirages ajoutés, {} lignes ignorées",
        game, result.imported, result.skipped
    );
    Ok(result)
}
