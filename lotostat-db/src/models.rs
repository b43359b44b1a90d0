use std::ops::RangeInclusive;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Taille maximale d'un pool de numéros.
pub const MAX_POOL_SIZE: usize = 1000;

/// Bornes inclusives d'un pool. `min <= max` est garanti à la construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct NumberRange {
    pub(crate) min: u32,
    pub(crate) max: u32,
}

#[derive(Deserialize)]
struct RangeBounds {
    min: u32,
    max: u32,
}

impl TryFrom<RangeBounds> for NumberRange {
    type Error = anyhow::Error;

    fn try_from(bounds: RangeBounds) -> Result<Self> {
        NumberRange::new(bounds.min, bounds.max)
    }
}

impl NumberRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            bail!("Plage invalide : min {} > max {}", min, max);
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, n: u32) -> bool {
        (self.min..=self.max).contains(&n)
    }

    pub fn len(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn numbers(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// Position de `n` dans la plage, `None` hors limites.
    pub fn index_of(&self, n: u32) -> Option<usize> {
        self.contains(n).then(|| (n - self.min) as usize)
    }
}

impl std::fmt::Display for NumberRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Un pool de boules : combien sont tirées, et dans quelle plage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSpec {
    pub(crate) name: String,
    pub(crate) count: usize,
    pub(crate) range: NumberRange,
}

impl PoolSpec {
    pub fn new(name: impl Into<String>, count: usize, range: NumberRange) -> Result<Self> {
        let name = name.into();
        if count == 0 {
            bail!("Le pool '{}' doit tirer au moins un numéro", name);
        }
        if range.len() > MAX_POOL_SIZE {
            bail!(
                "Le pool '{}' est trop grand ({} numéros, maximum {})",
                name,
                range.len(),
                MAX_POOL_SIZE
            );
        }
        if count > range.len() {
            bail!(
                "Le pool '{}' tire {} numéros mais sa plage {} n'en contient que {}",
                name,
                count,
                range,
                range.len()
            );
        }
        Ok(Self { name, count, range })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn range(&self) -> NumberRange {
        self.range
    }
}

/// Forme d'un jeu : un seul pool, ou un pool principal plus un pool spécial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameShape {
    SingleDomain { main: PoolSpec },
    DualDomain { main: PoolSpec, special: PoolSpec },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLotteryConfig", into = "RawLotteryConfig")]
pub struct LotteryConfig {
    pub game_name: String,
    pub shape: GameShape,
}

impl LotteryConfig {
    pub fn single(game_name: impl Into<String>, main: PoolSpec) -> Self {
        Self {
            game_name: game_name.into(),
            shape: GameShape::SingleDomain { main },
        }
    }

    pub fn dual(game_name: impl Into<String>, main: PoolSpec, special: PoolSpec) -> Self {
        Self {
            game_name: game_name.into(),
            shape: GameShape::DualDomain { main, special },
        }
    }

    pub fn main(&self) -> &PoolSpec {
        match &self.shape {
            GameShape::SingleDomain { main } | GameShape::DualDomain { main, .. } => main,
        }
    }

    pub fn special(&self) -> Option<&PoolSpec> {
        match &self.shape {
            GameShape::SingleDomain { .. } => None,
            GameShape::DualDomain { special, .. } => Some(special),
        }
    }
}

/// Forme à plat des fichiers de configuration JSON, champs spéciaux optionnels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLotteryConfig {
    game_name: String,
    #[serde(default = "default_main_name")]
    main_name: String,
    main_numbers_count: usize,
    main_numbers_range: NumberRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_numbers_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special_numbers_range: Option<NumberRange>,
}

fn default_main_name() -> String {
    "Numéros".to_string()
}

impl TryFrom<RawLotteryConfig> for LotteryConfig {
    type Error = anyhow::Error;

    fn try_from(raw: RawLotteryConfig) -> Result<Self> {
        let main = PoolSpec::new(raw.main_name, raw.main_numbers_count, raw.main_numbers_range)?;
        match (raw.special_name, raw.special_numbers_count, raw.special_numbers_range) {
            (None, None, None) => Ok(LotteryConfig::single(raw.game_name, main)),
            (Some(name), Some(count), Some(range)) => {
                let special = PoolSpec::new(name, count, range)?;
                Ok(LotteryConfig::dual(raw.game_name, main, special))
            }
            _ => bail!(
                "Configuration '{}' incomplète : specialName, specialNumbersCount et specialNumbersRange vont ensemble",
                raw.game_name
            ),
        }
    }
}

impl From<LotteryConfig> for RawLotteryConfig {
    fn from(config: LotteryConfig) -> Self {
        let (main, special) = match config.shape {
            GameShape::SingleDomain { main } => (main, None),
            GameShape::DualDomain { main, special } => (main, Some(special)),
        };
        RawLotteryConfig {
            game_name: config.game_name,
            main_numbers_count: main.count,
            main_name: main.name,
            main_numbers_range: main.range,
            special_numbers_count: special.as_ref().map(|s| s.count),
            special_numbers_range: special.as_ref().map(|s| s.range),
            special_name: special.map(|s| s.name),
        }
    }
}

/// Un tirage historique. Les numéros hors plage ont déjà été écartés.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draw {
    pub main: Vec<u32>,
    pub special: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Special,
}

impl Pool {
    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u32] {
        match self {
            Pool::Main => &draw.main,
            Pool::Special => &draw.special,
        }
    }

    pub fn spec_of<'a>(&self, config: &'a LotteryConfig) -> Option<&'a PoolSpec> {
        match self {
            Pool::Main => Some(config.main()),
            Pool::Special => config.special(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberStats {
    pub number: u32,
    pub frequency: u32,
    pub gap: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberAnalysis {
    pub number: u32,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub hot_numbers: Vec<NumberAnalysis>,
    pub cold_numbers: Vec<NumberAnalysis>,
    pub overdue_numbers: Vec<NumberAnalysis>,
}

impl AnalysisResults {
    pub fn is_empty(&self) -> bool {
        self.hot_numbers.is_empty() && self.cold_numbers.is_empty() && self.overdue_numbers.is_empty()
    }
}

/// Résultats pour un jeu complet : le pool principal et, si le jeu en a un, le pool spécial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub draw_count: usize,
    pub main: AnalysisResults,
    pub special: Option<AnalysisResults>,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub main: Vec<u32>,
    pub special: Vec<u32>,
    pub score: f64,
}

/// Validation stricte d'un tirage saisi à la main.
pub fn validate_draw(draw: &Draw, config: &LotteryConfig) -> Result<()> {
    validate_pool(&draw.main, config.main())?;
    match config.special() {
        Some(spec) => validate_pool(&draw.special, spec)?,
        None if !draw.special.is_empty() => {
            bail!("Le jeu {} n'a pas de numéro spécial", config.game_name)
        }
        None => {}
    }
    Ok(())
}

fn validate_pool(numbers: &[u32], spec: &PoolSpec) -> Result<()> {
    if numbers.len() != spec.count {
        bail!(
            "{} : {} attendus, {} fournis",
            spec.name,
            spec.count,
            numbers.len()
        );
    }
    for &n in numbers {
        if !spec.range.contains(n) {
            bail!("{} {} hors limites ({})", spec.name, n, spec.range);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("{} en double : {}", spec.name, numbers[i]);
            }
        }
    }
    Ok(())
}
