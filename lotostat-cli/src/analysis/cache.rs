use lotostat_db::models::{GameAnalysis, LotteryConfig};

use crate::analysis::analyze_with_top;

#[derive(Debug)]
struct Cached {
    text: String,
    config: LotteryConfig,
    analysis: GameAnalysis,
}

/// Garde la dernière analyse et ne la recalcule que si le texte ou la configuration a changé.
#[derive(Debug)]
pub struct AnalysisCache {
    top: usize,
    cached: Option<Cached>,
}

impl AnalysisCache {
    pub fn new(top: usize) -> Self {
        Self { top, cached: None }
    }

    pub fn is_stale(&self, text: &str, config: &LotteryConfig) -> bool {
        match &self.cached {
            Some(c) => c.text != text || c.config != *config,
            None => true,
        }
    }

    /// Retourne l'analyse à jour et `true` si elle vient d'être recalculée.
    pub fn get(&mut self, text: &str, config: &LotteryConfig) -> (&GameAnalysis, bool) {
        let recomputed = self.is_stale(text, config);
        if recomputed {
            self.cached = None;
        }
        let top = self.top;
        let cached = self.cached.get_or_insert_with(|| Cached {
            text: text.to_string(),
            config: config.clone(),
            analysis: analyze_with_top(text, config, top),
        });
        (&cached.analysis, recomputed)
    }
}
