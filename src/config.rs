//! Run configuration, constructed either programmatically or (for the CLI)
//! parsed from `std::env::args()`, mirroring the teacher's `Config` struct.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub t_max: i32,
    pub stem_max: i32,
    /// Only meaningful with the `concurrent` feature; `None` means "let
    /// rayon pick".
    pub thread_count: Option<usize>,
    pub save_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            t_max: 30,
            stem_max: 30,
            thread_count: None,
            save_path: None,
        }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error for ConfigError {}

impl Config {
    /// Parse `res <complex> [t_max] [stem_max] [db]` / `prod ...`-style
    /// positional arguments, as the teacher's CLI does. The subcommand and
    /// complex/ring name are the caller's concern (see `main.rs`); this only
    /// reads the numeric truncation parameters that follow them.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(t_max) = args.first() {
            config.t_max = t_max.parse().map_err(|_| ConfigError {
                message: format!("t_max is not an integer: {t_max}"),
            })?;
            config.stem_max = config.t_max;
        }
        if let Some(stem_max) = args.get(1) {
            config.stem_max = stem_max.parse().map_err(|_| ConfigError {
                message: format!("stem_max is not an integer: {stem_max}"),
            })?;
        }
        if let Some(db) = args.get(2) {
            config.save_path = Some(PathBuf::from(db));
        }
        Ok(config)
    }
}
