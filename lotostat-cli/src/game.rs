use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use lotostat_db::models::LotteryConfig;
use lotostat_db::presets::{all_presets, preset};

#[derive(Debug, Clone, Args)]
pub struct GameArgs {
    /// Jeu prédéfini (voir `lotostat presets`)
    #[arg(short, long, default_value = "euromillions")]
    pub game: String,

    /// Configuration personnalisée (JSON), prioritaire sur --game
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Un jeu résolu : l'identifiant sous lequel son historique est rangé, et sa configuration.
#[derive(Debug, Clone)]
pub struct Game {
    pub slug: String,
    pub config: LotteryConfig,
}

pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

pub fn load_config_file(path: &Path) -> Result<LotteryConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: LotteryConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    Ok(config)
}

impl GameArgs {
    pub fn resolve(&self) -> Result<Game> {
        if let Some(path) = &self.config {
            let config = load_config_file(path)?;
            let slug = slugify(&config.game_name);
            if slug.is_empty() {
                bail!("Le nom du jeu dans {:?} ne contient aucun caractère utilisable", path);
            }
            debug!("Configuration personnalisée '{}' chargée depuis {:?}", config.game_name, path);
            return Ok(Game { slug, config });
        }

        match preset(&self.game) {
            Some(config) => Ok(Game {
                slug: self.game.trim().to_lowercase(),
                config,
            }),
            None => {
                let known = all_presets()
                    .iter()
                    .map(|p| p.slug)
                    .collect::<Vec<_>>()
                    .join(", ");
                bail!("Jeu inconnu : '{}' (disponibles : {})", self.game, known)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(game: &str, config: Option<PathBuf>) -> GameArgs {
        GameArgs {
            game: game.to_string(),
            config,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Mega Millions"), "megamillions");
        assert_eq!(slugify("Lotto 6/49"), "lotto649");
        assert_eq!(slugify("  "), "");
    }

    #[test]
    fn test_resolve_preset() {
        let game = args(" EuroMillions ", None).resolve().unwrap();
        assert_eq!(game.slug, "euromillions");
        assert_eq!(game.config.game_name, "EuroMillions");
    }

    #[test]
    fn test_resolve_unknown_preset() {
        let err = args("bingo", None).resolve().unwrap_err();
        assert!(err.to_string().contains("bingo"));
    }

    #[test]
    fn test_resolve_config_file() {
        let path = std::env::temp_dir().join(format!("lotostat-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"gameName":"Keno Maison","mainNumbersCount":10,"mainNumbersRange":{"min":1,"max":70}}"#,
        )
        .unwrap();
        let game = args("euromillions", Some(path.clone())).resolve().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(game.slug, "kenomaison");
        assert_eq!(game.config.main().count(), 10);
        assert!(game.config.special().is_none());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(args("euromillions", Some(PathBuf::from("/nonexistent/game.json"))).resolve().is_err());
    }
}
