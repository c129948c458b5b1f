//! Runtime configuration (TOML file + env overrides).

pub mod scoring;

pub use scoring::ScoringConfig;
