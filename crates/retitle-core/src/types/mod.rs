pub mod config;
pub mod metadata;
pub mod rule;

pub use config::{NamingConfig, NamingConfigBuilder, PartEpisode, PartEpisodeMap, SeasonSelection};
pub use metadata::{EpisodeMetadata, MediaKind, MovieMetadata, SeasonMetadata, ShowMetadata};
pub use rule::{RenameRule, RuleBatch, RuleScope, Skip, SkipReason};
