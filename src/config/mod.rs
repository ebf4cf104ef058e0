// src/config/mod.rs
pub mod settings;
pub mod sources;

pub use settings::HarvestSettings;
pub use sources::{load_sources_from, ParserKind, SeniorityMode, SourceConfig};
