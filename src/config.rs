use std::env;
use std::path::PathBuf;

pub const MIN_MATCHES_RANGE: (u32, u32) = (1, 38);
pub const DEFAULT_MIN_MATCHES: u32 = 5;
pub const DEFAULT_JITTER_SEED: u64 = 0x5eed_2024;
const DEFAULT_API_BASE: &str = "https://v3.football.api-sports.io";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub min_matches: u32,
    pub jitter_seed: u64,
    pub api_key: Option<String>,
    pub api_base: String,
    pub results_years: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            min_matches: DEFAULT_MIN_MATCHES,
            jitter_seed: DEFAULT_JITTER_SEED,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            results_years: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_dir = env_path("DATA_DIR").unwrap_or(defaults.data_dir);
        let output_dir = env_path("OUTPUT_DIR").unwrap_or(defaults.output_dir);
        let min_matches = clamp_min_matches(
            env::var("RADAR_MIN_MATCHES")
                .ok()
                .and_then(|val| val.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_MIN_MATCHES),
        );
        let jitter_seed = env::var("RADAR_JITTER_SEED")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_JITTER_SEED);
        let api_key = env::var("API_FOOTBALL_KEY")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        let api_base = env::var("API_FOOTBALL_BASE")
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let results_years = env::var("RESULTS_YEARS")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(defaults.results_years)
            .clamp(1, 20);
        Self {
            data_dir,
            output_dir,
            min_matches,
            jitter_seed,
            api_key,
            api_base,
            results_years,
        }
    }
}

pub fn clamp_min_matches(value: u32) -> u32 {
    value.clamp(MIN_MATCHES_RANGE.0, MIN_MATCHES_RANGE.1)
}

fn env_path(name: &str) -> Option<PathBuf> {
    let raw = env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
