use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::processing::HashAlgorithm;

/// Smallest accepted perceptual hash grid side
pub const MIN_HASH_SIZE: u32 = 4;

/// Largest accepted perceptual hash grid side
pub const MAX_HASH_SIZE: u32 = 16;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for the image grouping operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest used for exact duplicate detection
    pub hash_algorithm: HashAlgorithm,

    /// Side length of the perceptual hash grid (4-16)
    pub hash_size: u32,

    /// Maximum Hamming distance for two images to count as similar
    pub threshold: u32,

    /// Number of threads to use for fingerprinting (0 = auto)
    pub threads: usize,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Md5,
            hash_size: 8,
            threshold: 5,
            threads: 0, // Auto
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_perceptual(self.hash_size, self.threshold)
    }

    /// Number of worker threads to build the pool with
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Check the perceptual hashing parameters once, before any item is touched
pub fn validate_perceptual(hash_size: u32, threshold: u32) -> Result<()> {
    if !(MIN_HASH_SIZE..=MAX_HASH_SIZE).contains(&hash_size) {
        return Err(Error::Configuration(format!(
            "Hash size must be between {} and {}, got {}",
            MIN_HASH_SIZE, MAX_HASH_SIZE, hash_size
        )));
    }

    let max_threshold = hash_size * hash_size;
    if threshold > max_threshold {
        return Err(Error::Configuration(format!(
            "Threshold must be between 0 and {} for hash_size={}",
            max_threshold, hash_size
        )));
    }

    Ok(())
}
