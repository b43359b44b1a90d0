use crate::models::{LotteryConfig, NumberRange, PoolSpec};

pub struct Preset {
    pub slug: &'static str,
    pub config: LotteryConfig,
}

fn pool(name: &str, count: usize, min: u32, max: u32) -> PoolSpec {
    PoolSpec {
        name: name.to_string(),
        count,
        range: NumberRange { min, max },
    }
}

pub fn all_presets() -> Vec<Preset> {
    vec![
        Preset {
            slug: "euromillions",
            config: LotteryConfig::dual("EuroMillions", pool("Boules", 5, 1, 50), pool("Étoiles", 2, 1, 12)),
        },
        Preset {
            slug: "loto",
            config: LotteryConfig::dual("Loto", pool("Boules", 5, 1, 49), pool("Numéro Chance", 1, 1, 10)),
        },
        Preset {
            slug: "eurojackpot",
            config: LotteryConfig::dual("EuroJackpot", pool("Numéros", 5, 1, 50), pool("Euronumbers", 2, 1, 12)),
        },
        Preset {
            slug: "powerball",
            config: LotteryConfig::dual("Powerball", pool("White Balls", 5, 1, 69), pool("Powerball", 1, 1, 26)),
        },
        Preset {
            slug: "megamillions",
            config: LotteryConfig::dual("Mega Millions", pool("White Balls", 5, 1, 70), pool("Mega Ball", 1, 1, 25)),
        },
        Preset {
            slug: "lotto649",
            config: LotteryConfig::single("Lotto 6/49", pool("Numéros", 6, 1, 49)),
        },
        Preset {
            slug: "uklotto",
            config: LotteryConfig::single("UK Lotto", pool("Numbers", 6, 1, 59)),
        },
    ]
}

pub fn preset(slug: &str) -> Option<LotteryConfig> {
    let slug = slug.trim().to_lowercase();
    all_presets()
        .into_iter()
        .find(|p| p.slug == slug)
        .map(|p| p.config)
}
