//! # Retitle Core
//!
//! Compiles catalog metadata and numbering choices into rename rules: match
//! patterns over existing file names paired with canonical replacement
//! names. Handles uniform episode offsets, episodes split into part files,
//! air-date matching and movies.
//!
//! The crate is pure. Metadata comes in through [`MetadataSource`] and rules
//! leave through [`RuleStore`]; both are implemented over HTTP in
//! `retitle-remote` and in memory in [`memory`].
//!
//! ## Quick Start
//!
//! ```rust
//! use retitle_core::{NamingConfig, PartEpisodeMap, RuleCompiler, SeasonMetadata, ShowMetadata};
//!
//! let config = NamingConfig::builder("Show")
//!     .with_pad_zero(true)
//!     .with_part_episodes("5:2".parse::<PartEpisodeMap>().unwrap())
//!     .build()
//!     .unwrap();
//! let compiler = RuleCompiler::new(config).unwrap();
//!
//! let show = ShowMetadata::new(42, "The Show", "2021-07-01")
//!     .with_season(SeasonMetadata::numbered(1, 1, 12));
//! let batch = compiler.compile_show(&show);
//!
//! assert_eq!(batch.naming_format, "The.Show.2021.{[tmdbid=42;type=tv]}");
//! // Two part rules and episodes 1-4; episodes 6-12 would be displaced
//! // past episode 12, so that interval is skipped.
//! assert_eq!(batch.len(), 3);
//! assert_eq!(batch.rules[1].offset, 1);
//! assert_eq!(batch.skipped.len(), 1);
//! ```
pub mod collab;
pub mod compiler;
pub mod error;
pub mod memory;
pub mod offset;
pub mod range;
mod report;
pub mod template;
pub mod types;

// Re-export primary API
pub use collab::{MetadataSource, PublishReport, RuleGroup, RuleRejection, RuleStore, publish};
pub use compiler::RuleCompiler;
pub use error::{Result, RuleError};
pub use memory::{MemoryStore, StaticMetadata};
pub use range::compile_range;
pub use types::{
    EpisodeMetadata, MediaKind, MovieMetadata, NamingConfig, NamingConfigBuilder, PartEpisode,
    PartEpisodeMap, RenameRule, RuleBatch, RuleScope, SeasonMetadata, SeasonSelection,
    ShowMetadata, Skip, SkipReason,
};
