//! Runtime configuration.
//!
//! Built once in `main` and handed to the loading and output code. Nothing
//! below the loader reads the environment.
use std::path::PathBuf;

use crate::calendar::{current_fin_year, normalize_fin_year};
use crate::error::{Error, Result};

pub const DEFAULT_DATA_FILE: &str = "mgnrega_records.json";
pub const DEFAULT_STATE: &str = "MANIPUR";
pub const DEFAULT_PREVIEW_ROWS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// data.gov.in dump, `.json` or `.csv`.
    pub data_file: PathBuf,
    /// Upper-cased state filter.
    pub state_name: String,
    /// Always in `"YYYY-YYYY"` form.
    pub fin_year: String,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            state_name: DEFAULT_STATE.to_string(),
            fin_year: current_fin_year(),
            output_dir: PathBuf::from("."),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Config {
    /// Read `MGNREGA_DATA_FILE`, `MGNREGA_STATE`, `FIN_YEAR`,
    /// `MGNREGA_OUTPUT_DIR` and `MGNREGA_PREVIEW_ROWS`, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = var("MGNREGA_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(state) = var("MGNREGA_STATE") {
            config.state_name = state.to_uppercase();
        }
        if let Some(fin_year) = var("FIN_YEAR") {
            config.fin_year = normalize_fin_year(&fin_year);
        }
        if let Some(dir) = var("MGNREGA_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(rows) = var("MGNREGA_PREVIEW_ROWS") {
            config.preview_rows = rows.parse().map_err(|_| {
                Error::Config(format!("MGNREGA_PREVIEW_ROWS must be a count, got {:?}", rows))
            })?;
        }
        Ok(config)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.state_name, "MANIPUR");
        assert_eq!(config.preview_rows, DEFAULT_PREVIEW_ROWS);
        assert!(config.fin_year.len() == 9 && config.fin_year.contains('-'));
    }

    #[test]
    fn env_values_are_normalized() {
        let config = Config::from_lookup(lookup(&[
            ("MGNREGA_STATE", " assam "),
            ("FIN_YEAR", "2025-26"),
            ("MGNREGA_OUTPUT_DIR", "out"),
            ("MGNREGA_PREVIEW_ROWS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.state_name, "ASSAM");
        assert_eq!(config.fin_year, "2025-2026");
        assert_eq!(config.output_path("a.json"), PathBuf::from("out").join("a.json"));
        assert_eq!(config.preview_rows, 3);
    }

    #[test]
    fn bad_preview_rows_is_rejected() {
        let err = Config::from_lookup(lookup(&[("MGNREGA_PREVIEW_ROWS", "many")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
