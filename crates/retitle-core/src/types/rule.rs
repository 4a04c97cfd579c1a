use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a rule covers, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleScope {
    /// A whole season matched by its source episode range.
    Season { season: u32, start: u32, end: u32 },
    /// A run of non-part episodes between part episodes.
    Interval { season: u32, start: u32, end: u32 },
    /// One part file of a split episode.
    Part { season: u32, episode: u32, part: u32 },
    /// One episode matched by its air date.
    AirDate {
        season: u32,
        episode: u32,
        air_date: String,
    },
    /// A movie.
    Movie,
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Season { season, start, end } => {
                write!(f, "S{season:02} episodes {start}-{end}")
            }
            Self::Interval { season, start, end } => {
                write!(f, "S{season:02} interval {start}-{end}")
            }
            Self::Part {
                season,
                episode,
                part,
            } => write!(f, "S{season:02}E{episode:02} part{part}"),
            Self::AirDate {
                season,
                episode,
                air_date,
            } => write!(f, "S{season:02}E{episode:02} aired {air_date}"),
            Self::Movie => write!(f, "movie"),
        }
    }
}

/// One match/replace pair handed to the rename engine.
///
/// `anchor_prefix`/`anchor_suffix` bound the text in which the engine adds
/// `offset` to the episode number; both are empty exactly when `offset == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRule {
    pub match_pattern: String,
    pub replace_template: String,
    pub anchor_prefix: String,
    pub anchor_suffix: String,
    pub offset: i32,
    pub scope: RuleScope,
}

impl RenameRule {
    /// Returns `true` if the engine must shift the episode number.
    #[must_use]
    pub fn has_offset(&self) -> bool {
        self.offset != 0
    }
}

/// Why a season, interval or episode produced no rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The catalog returned no episodes for the season.
    #[error("season has no episodes")]
    EmptySeason,

    /// Episode numbers are not strictly increasing.
    #[error("episode {episode} is out of order")]
    UnorderedEpisodes { episode: u32 },

    /// Subtracting the offset leaves source numbers at or below zero.
    #[error("offset {offset} maps episodes to source range {start}..={end}")]
    NonPositiveSource { offset: i32, start: i64, end: i64 },

    /// A part episode lies outside the season's episode range.
    #[error("part episode {episode} is outside episodes {first}..={last}")]
    PartEpisodeOutOfRange { episode: u32, first: u32, last: u32 },

    /// The episodes after the last part episode would be displaced past the season end.
    #[error(
        "episodes after {after} shifted by {offset} pass the last episode {last}"
    )]
    TrailingIntervalOverflow { after: u32, offset: i32, last: u32 },

    /// Date mode needs an air date.
    #[error("episode {episode} has no air date")]
    MissingAirDate { episode: u32 },
}

/// A skipped unit of work, recorded instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skip {
    pub season: u32,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "season {}: {}", self.season, self.reason)
    }
}

/// The ordered rules produced for one show or movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBatch {
    /// Canonical naming format; the storage collaborator keys rule groups by it.
    pub naming_format: String,

    /// Rules in generation order.
    pub rules: Vec<RenameRule>,

    /// Units skipped while compiling.
    pub skipped: Vec<Skip>,
}

impl RuleBatch {
    #[must_use]
    pub fn new(naming_format: impl Into<String>) -> Self {
        Self {
            naming_format: naming_format.into(),
            rules: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_display() {
        let scope = RuleScope::Part {
            season: 1,
            episode: 5,
            part: 2,
        };
        assert_eq!(scope.to_string(), "S01E05 part2");

        let scope = RuleScope::Interval {
            season: 2,
            start: 6,
            end: 8,
        };
        assert_eq!(scope.to_string(), "S02 interval 6-8");
    }

    #[test]
    fn skip_display_names_season_and_reason() {
        let skip = Skip {
            season: 3,
            reason: SkipReason::NonPositiveSource {
                offset: 2,
                start: -1,
                end: 10,
            },
        };
        let text = skip.to_string();
        assert!(text.starts_with("season 3:"));
        assert!(text.contains("-1..=10"));
    }

    #[test]
    fn rule_serializes_with_camel_case_fields() {
        let rule = RenameRule {
            match_pattern: "a".into(),
            replace_template: "b".into(),
            anchor_prefix: String::new(),
            anchor_suffix: String::new(),
            offset: 0,
            scope: RuleScope::Movie,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["matchPattern"], "a");
        assert_eq!(json["replaceTemplate"], "b");
        assert_eq!(json["scope"]["kind"], "movie");
        assert!(!rule.has_offset());
    }
}
