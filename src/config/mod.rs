// src/config/mod.rs
// Console pipeline tuning knobs: compiled defaults with env overrides.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

/// Give up on history once this many buffered characters accumulate.
pub const DEFAULT_MAX_BUFFERED_CHARS: u64 = 32 * 1024 * 1024;

/// How often the flusher wakes up to drain pending lines.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 50;

/// Most lines a single flush pass will deliver to the display.
pub const DEFAULT_MAX_LINES_PER_FLUSH: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    // ── Buffer Configuration
    pub max_buffered_chars: u64,

    // ── Flusher Configuration
    pub flush_interval_ms: u64,
    pub max_lines_per_flush: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_buffered_chars: DEFAULT_MAX_BUFFERED_CHARS,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            max_lines_per_flush: DEFAULT_MAX_LINES_PER_FLUSH,
        }
    }
}

// Values may carry trailing comments or whitespace in .env files.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        // A missing .env file is not an error, just means env vars only.
        let _ = dotenvy::dotenv();

        Self {
            max_buffered_chars: env_var_or("PROCVIEW_MAX_BUFFERED_CHARS", DEFAULT_MAX_BUFFERED_CHARS),
            flush_interval_ms: env_var_or("PROCVIEW_FLUSH_INTERVAL_MS", DEFAULT_FLUSH_INTERVAL_MS),
            max_lines_per_flush: env_var_or("PROCVIEW_MAX_LINES_PER_FLUSH", DEFAULT_MAX_LINES_PER_FLUSH),
        }
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<ConsoleConfig> = Lazy::new(ConsoleConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_defaults() {
        let config = ConsoleConfig::default();

        assert_eq!(config.max_buffered_chars, 32 * 1024 * 1024);
        assert_eq!(config.flush_interval_ms, 50);
        assert_eq!(config.max_lines_per_flush, 100);
    }

    #[test]
    fn test_env_override() {
        let original = env::var("PROCVIEW_FLUSH_INTERVAL_MS").ok();

        unsafe {
            env::set_var("PROCVIEW_FLUSH_INTERVAL_MS", "25");
        }
        let config = ConsoleConfig::from_env();
        assert_eq!(config.flush_interval_ms, 25);

        unsafe {
            match original {
                Some(val) => env::set_var("PROCVIEW_FLUSH_INTERVAL_MS", val),
                None => env::remove_var("PROCVIEW_FLUSH_INTERVAL_MS"),
            }
        }
    }

    #[test]
    fn test_env_parse_failure_falls_back() {
        let original = env::var("PROCVIEW_MAX_LINES_PER_FLUSH").ok();

        unsafe {
            env::set_var("PROCVIEW_MAX_LINES_PER_FLUSH", "not-a-number");
        }
        let config = ConsoleConfig::from_env();
        assert_eq!(config.max_lines_per_flush, DEFAULT_MAX_LINES_PER_FLUSH);

        unsafe {
            match original {
                Some(val) => env::set_var("PROCVIEW_MAX_LINES_PER_FLUSH", val),
                None => env::remove_var("PROCVIEW_MAX_LINES_PER_FLUSH"),
            }
        }
    }
}
