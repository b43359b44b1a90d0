use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{Draw, LotteryConfig};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    game          TEXT NOT NULL,
    seq           INTEGER NOT NULL,
    main          TEXT NOT NULL,
    special       TEXT NOT NULL DEFAULT '',
    imported_at   TEXT NOT NULL,
    PRIMARY KEY (game, seq)
);

CREATE TABLE IF NOT EXISTS games (
    game          TEXT PRIMARY KEY,
    config        TEXT NOT NULL
);
";

pub const DB_PATH_ENV: &str = "LOTOSTAT_DB";

pub fn db_path() -> PathBuf {
    if let Some(path) = std::env::var_os(DB_PATH_ENV) {
        return PathBuf::from(path);
    }
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotostat.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    debug!("Base ouverte : {:?}", path);
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_numbers(s: &str) -> Result<Vec<u32>> {
    s.split_whitespace()
        .map(|n| {
            n.parse::<u32>()
                .with_context(|| format!("Numéro corrompu en base : '{}'", n))
        })
        .collect()
}

/// Configuration sous laquelle l'historique du jeu a été découpé, `None` si rien n'est stocké.
pub fn stored_config(conn: &Connection, game: &str) -> Result<Option<LotteryConfig>> {
    let json: Option<String> = conn
        .query_row("SELECT config FROM games WHERE game = ?1", [game], |row| row.get(0))
        .optional()?;
    json.map(|json| {
        serde_json::from_str(&json)
            .with_context(|| format!("Configuration corrompue en base pour {}", game))
    })
    .transpose()
}

/// Refuse une configuration différente de celle qui a servi à découper l'historique stocké.
pub fn check_config(conn: &Connection, game: &str, config: &LotteryConfig) -> Result<()> {
    if let Some(stored) = stored_config(conn, game)? {
        if stored != *config {
            bail!(
                "L'historique de {} a été importé avec une autre configuration ({}). \
                 Lancez d'abord : lotostat clear --game {}",
                game,
                serde_json::to_string(&stored)?,
                game
            );
        }
    }
    Ok(())
}

/// Ajoute les tirages à la suite de l'historique du jeu, dans l'ordre donné (plus ancien d'abord).
pub fn append_draws(
    conn: &Connection,
    game: &str,
    config: &LotteryConfig,
    draws: &[Draw],
) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    check_config(&tx, game, config)?;
    tx.execute(
        "INSERT OR IGNORE INTO games (game, config) VALUES (?1, ?2)",
        rusqlite::params![game, serde_json::to_string(config)?],
    ).context("Échec de l'enregistrement du jeu")?;

    let last_seq: i64 = tx.query_row(
        "SELECT COALESCE(MAX(seq), 0) FROM draws WHERE game = ?1",
        [game],
        |row| row.get(0),
    )?;
    let imported_at = chrono::Local::now().to_rfc3339();

    let mut inserted = 0;
    for (i, draw) in draws.iter().enumerate() {
        inserted += tx.execute(
            "INSERT INTO draws (game, seq, main, special, imported_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                game,
                last_seq + 1 + i as i64,
                join_numbers(&draw.main),
                join_numbers(&draw.special),
                imported_at,
            ],
        ).context("Échec de l'insertion")?;
    }

    tx.commit().context("Échec du commit")?;
    Ok(inserted)
}

/// Les `limit` derniers tirages du jeu, en ordre chronologique (le plus récent en dernier).
pub fn fetch_last_draws(
    conn: &Connection,
    game: &str,
    config: &LotteryConfig,
    limit: u32,
) -> Result<Vec<Draw>> {
    check_config(conn, game, config)?;
    let mut stmt = conn.prepare(
        "SELECT main, special FROM draws WHERE game = ?1 ORDER BY seq DESC LIMIT ?2"
    )?;
    let rows = stmt.query_map(rusqlite::params![game, limit], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?.collect::<Result<Vec<_>, _>>()?;

    let mut draws = rows
        .iter()
        .map(|(main, special)| {
            Ok(Draw {
                main: split_numbers(main)?,
                special: split_numbers(special)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    draws.reverse();
    Ok(draws)
}

pub fn count_draws(conn: &Connection, game: &str) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE game = ?1",
        [game],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn clear_draws(conn: &Connection, game: &str) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    let deleted = tx.execute("DELETE FROM draws WHERE game = ?1", [game])
        .context("Échec de la suppression")?;
    tx.execute("DELETE FROM games WHERE game = ?1", [game])
        .context("Échec de la suppression")?;
    tx.commit().context("Échec du commit")?;
    Ok(deleted)
}

/// Jeux présents en base avec leur nombre de tirages.
pub fn list_games(conn: &Connection) -> Result<Vec<(String, u32)>> {
    let mut stmt = conn.prepare(
        "SELECT game, COUNT(*) FROM draws GROUP BY game ORDER BY game"
    )?;
    let games = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(games)
}
