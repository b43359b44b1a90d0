use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use lotostat_cli::analysis::cache::AnalysisCache;
use lotostat_cli::analysis::parse::parse_history;
use lotostat_cli::analysis::sampler::{Strategy, date_seed, generate_suggestions};
use lotostat_cli::analysis::{TOP_K, analyze_draws, compute_stats};
use lotostat_cli::display::{
    display_analysis, display_draws, display_games, display_import_summary, display_presets,
    display_stats, display_suggestions,
};
use lotostat_cli::game::{Game, GameArgs};
use lotostat_cli::import::{import_history, read_history};
use lotostat_db::db::{
    append_draws, clear_draws, count_draws, db_path, fetch_last_draws, list_games, migrate, open_db,
};
use lotostat_db::models::{Draw, Pool, validate_draw};
use lotostat_db::presets::all_presets;
use lotostat_db::rusqlite::Connection;

const MIN_WATCH_INTERVAL_MS: u64 = 50;

#[derive(Parser)]
#[command(name = "lotostat", about = "Numéros chauds, froids et en retard à partir d'un historique de tirages")]
struct Cli {
    /// Niveau de log (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Fichier d'historique (texte libre, un tirage par ligne, le plus ancien en premier ; `-` pour stdin).
    /// Sans fichier, l'historique stocké en base est utilisé.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Nombre de tirages stockés à analyser (les plus récents)
    #[arg(short, long, default_value = "100")]
    window: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Lister les jeux prédéfinis
    Presets,

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les jeux ayant un historique en base
    Games,

    /// Importer un historique texte dans la base
    Import {
        #[command(flatten)]
        game: GameArgs,

        /// Fichier texte (`-` pour stdin)
        #[arg(short, long, default_value = "-")]
        file: PathBuf,
    },

    /// Ajouter un tirage manuellement (numéros principaux puis spéciaux)
    Add {
        #[command(flatten)]
        game: GameArgs,

        numbers: Vec<u32>,
    },

    /// Lister les derniers tirages stockés
    List {
        #[command(flatten)]
        game: GameArgs,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Supprimer l'historique stocké d'un jeu
    Clear {
        #[command(flatten)]
        game: GameArgs,
    },

    /// Afficher les statistiques (chauds, froids, en retard)
    Stats {
        #[command(flatten)]
        game: GameArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Longueur des classements
        #[arg(short, long, default_value_t = TOP_K)]
        top: usize,

        /// Afficher aussi le détail par numéro
        #[arg(long)]
        full: bool,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggérer des grilles selon une stratégie
    Suggest {
        #[command(flatten)]
        game: GameArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Stratégie de pondération
        #[arg(short, long, value_enum, default_value_t = Strategy::default())]
        strategy: Strategy,

        /// Nombre de grilles à suggérer
        #[arg(short, long, default_value = "3")]
        count: usize,

        /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Surveiller un fichier d'historique et réafficher les statistiques à chaque modification
    Watch {
        #[command(flatten)]
        game: GameArgs,

        /// Fichier à surveiller
        #[arg(short, long)]
        file: PathBuf,

        /// Intervalle de relecture en millisecondes (minimum 50)
        #[arg(short, long, default_value = "1000", value_parser = clap::value_parser!(u64).range(MIN_WATCH_INTERVAL_MS..))]
        interval: u64,

        /// Longueur des classements
        #[arg(short, long, default_value_t = TOP_K)]
        top: usize,
    },
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn connect() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Presets => {
            display_presets(&all_presets());
            Ok(())
        }
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::Games => {
            display_games(&list_games(&connect()?)?);
            Ok(())
        }
        Command::Import { game, file } => cmd_import(&game.resolve()?, &file),
        Command::Add { game, numbers } => cmd_add(&game.resolve()?, &numbers),
        Command::List { game, last } => cmd_list(&game.resolve()?, last),
        Command::Clear { game } => cmd_clear(&game.resolve()?),
        Command::Stats {
            game,
            source,
            top,
            full,
            json,
        } => cmd_stats(&game.resolve()?, &source, top, full, json),
        Command::Suggest {
            game,
            source,
            strategy,
            count,
            seed,
        } => cmd_suggest(&game.resolve()?, &source, strategy, count, seed),
        Command::Watch {
            game,
            file,
            interval,
            top,
        } => cmd_watch(&game.resolve()?, &file, interval, top),
    }
}

/// Tirages à analyser, en ordre chronologique : depuis un fichier, ou depuis la base.
fn load_draws(game: &Game, source: &SourceArgs) -> Result<Vec<Draw>> {
    match &source.file {
        Some(path) => {
            let text = read_history(path)?;
            Ok(parse_history(&text, &game.config))
        }
        None => {
            let conn = connect()?;
            let n = count_draws(&conn, &game.slug)?;
            if n == 0 {
                bail!(
                    "Aucun historique pour {}. Passez --file ou lancez d'abord : lotostat import --game {}",
                    game.config.game_name,
                    game.slug
                );
            }
            fetch_last_draws(&conn, &game.slug, &game.config, source.window.min(n))
        }
    }
}

fn cmd_import(game: &Game, file: &Path) -> Result<()> {
    let text = read_history(file)?;
    let conn = connect()?;
    let result = import_history(&conn, &game.slug, &game.config, &text)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_add(game: &Game, numbers: &[u32]) -> Result<()> {
    let main_count = game.config.main().count();
    if numbers.len() < main_count {
        bail!("{} numéros attendus, {} fournis", main_count, numbers.len());
    }
    let (main, special) = numbers.split_at(main_count);
    let draw = Draw {
        main: main.to_vec(),
        special: special.to_vec(),
    };
    validate_draw(&draw, &game.config)?;

    let conn = connect()?;
    append_draws(&conn, &game.slug, &game.config, std::slice::from_ref(&draw))?;
    info!("Tirage ajouté à {}", game.slug);
    println!("Tirage inséré avec succès.");
    display_draws(&game.config, &[draw]);
    Ok(())
}

fn cmd_list(game: &Game, last: u32) -> Result<()> {
    let conn = connect()?;
    let n = count_draws(&conn, &game.slug)?;
    if n == 0 {
        println!("Base vide pour {}. Lancez d'abord : lotostat import --game {}", game.config.game_name, game.slug);
        return Ok(());
    }
    let draws = fetch_last_draws(&conn, &game.slug, &game.config, last)?;
    display_draws(&game.config, &draws);
    Ok(())
}

fn cmd_clear(game: &Game) -> Result<()> {
    let conn = connect()?;
    let deleted = clear_draws(&conn, &game.slug)?;
    println!("{} tirages supprimés pour {}.", deleted, game.config.game_name);
    Ok(())
}

fn cmd_stats(game: &Game, source: &SourceArgs, top: usize, full: bool, json: bool) -> Result<()> {
    let draws = load_draws(game, source)?;
    let analysis = analyze_draws(&draws, &game.config, top);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    display_analysis(&game.config, &analysis);
    if full && !draws.is_empty() {
        display_stats(game.config.main(), &compute_stats(&draws, &game.config, Pool::Main));
        if let Some(spec) = game.config.special() {
            display_stats(spec, &compute_stats(&draws, &game.config, Pool::Special));
        }
    }
    Ok(())
}

fn cmd_suggest(
    game: &Game,
    source: &SourceArgs,
    strategy: Strategy,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    let draws = load_draws(game, source)?;
    if draws.is_empty() {
        warn!("Aucun tirage valide : les suggestions seront uniformes");
    }

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        ds
    });

    let suggestions = generate_suggestions(&draws, &game.config, strategy, count, effective_seed)?;
    display_suggestions(&game.config, &suggestions, &format!("{:?}", strategy).to_lowercase());
    Ok(())
}

fn cmd_watch(game: &Game, file: &Path, interval: u64, top: usize) -> Result<()> {
    let mut cache = AnalysisCache::new(top);
    info!("Surveillance de {:?} toutes les {} ms", file, interval);

    loop {
        match std::fs::read_to_string(file) {
            Ok(text) => {
                let (analysis, recomputed) = cache.get(&text, &game.config);
                if recomputed {
                    display_analysis(&game.config, analysis);
                }
            }
            Err(e) => warn!("Lecture impossible de {:?} : {}", file, e),
        }
        std::thread::sleep(Duration::from_millis(interval));
    }
}
