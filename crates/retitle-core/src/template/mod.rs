//! # Naming Template Builder
//!
//! Assembles title, season, episode, year and catalog id tokens into the
//! match/replace pairs of [`RenameRule`]s.

mod part_label;

pub use part_label::{PartLabelDetector, roman_to_arabic};

use crate::offset::PartSlot;
use crate::types::{MediaKind, MovieMetadata, RenameRule, RuleScope, ShowMetadata};

/// Delimiters that may precede an episode number in a source file name.
pub const EPISODE_PREFIX: &str = "(?:E|Ep|EP|[Ee]pisode|[Ee]p)";

/// Marker that identifies a part file.
pub const PART_MARKER: &str = "(?:[Pp]art|PART)";

/// Returns the year of a `YYYY-MM-DD` date, or `""` when it is too short.
#[must_use]
pub fn year_of(date: &str) -> &str {
    date.get(..4).unwrap_or("")
}

/// Writes a display name the way canonical file names carry it.
#[must_use]
pub fn dotted(name: &str) -> String {
    name.trim().replace(' ', ".")
}

/// The `{[tmdbid=..;type=..]}` tag closing every canonical name.
#[must_use]
pub fn id_tag(id: u64, kind: MediaKind) -> String {
    format!("{{[tmdbid={id};type={kind}]}}")
}

/// How the season number of a source file name is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonMarker {
    /// `S<ss>` must be present.
    Exact,
    /// `S<ss>` may be present.
    Optional,
    /// Any two-digit `Sxx` may be present.
    Any,
}

impl SeasonMarker {
    fn pattern(self, season: u32) -> String {
        match self {
            Self::Exact => format!(".*S{season:02}"),
            Self::Optional => format!(".*?(?:S{season:02})?"),
            Self::Any => r".*?(?:S\d{2})?".to_string(),
        }
    }
}

/// Rule builder for the seasons of one show.
#[derive(Debug, Clone)]
pub struct ShowTemplate {
    title_pattern: String,
    show_name: String,
    year: String,
    id_tag: String,
}

impl ShowTemplate {
    /// Prepares the tokens shared by every rule of `show`, matching files
    /// whose names start with `file_title`.
    #[must_use]
    pub fn new(show: &ShowMetadata, file_title: &str) -> Self {
        Self {
            title_pattern: regex::escape(file_title),
            show_name: dotted(&show.name),
            year: year_of(&show.first_air_date).to_string(),
            id_tag: id_tag(show.id, show.kind),
        }
    }

    /// The canonical name used as the rule-group key.
    #[must_use]
    pub fn naming_format(&self) -> String {
        format!("{}.{}.{}", self.show_name, self.year, self.id_tag)
    }

    fn canonical(&self, season: u32, episode: &str) -> String {
        format!(
            "{}.S{season:02}E{episode}.{}.{}",
            self.show_name, self.year, self.id_tag
        )
    }

    /// Anchors for a rule in `season`, empty when `offset` is zero.
    #[must_use]
    pub fn anchors(&self, season: u32, offset: i32) -> (String, String) {
        if offset == 0 {
            return (String::new(), String::new());
        }
        (
            format!("{}.S{season:02}E", self.show_name),
            format!(".{}.", self.year),
        )
    }

    fn rule(
        &self,
        season: u32,
        match_pattern: String,
        replace_template: String,
        offset: i32,
        scope: RuleScope,
    ) -> RenameRule {
        let (anchor_prefix, anchor_suffix) = self.anchors(season, offset);
        RenameRule {
            match_pattern,
            replace_template,
            anchor_prefix,
            anchor_suffix,
            offset,
            scope,
        }
    }

    /// Rule for a season's episode range under a uniform offset.
    ///
    /// `range` is a compiled range group.
    #[must_use]
    pub fn season_rule(
        &self,
        season: u32,
        range: &str,
        marker: SeasonMarker,
        offset: i32,
        scope: RuleScope,
    ) -> RenameRule {
        let pattern = format!(
            "{}{}{EPISODE_PREFIX}?{range}",
            self.title_pattern,
            marker.pattern(season)
        );
        self.rule(season, pattern, self.canonical(season, r"\1"), offset, scope)
    }

    /// Rule for a run of unsplit episodes in a season that has part files.
    ///
    /// The trailing lookahead keeps the rule off part files.
    #[must_use]
    pub fn interval_rule(
        &self,
        season: u32,
        range: &str,
        offset: i32,
        scope: RuleScope,
    ) -> RenameRule {
        let pattern = format!(
            "{}{}{EPISODE_PREFIX}?{range}(?!.*{PART_MARKER})",
            self.title_pattern,
            SeasonMarker::Optional.pattern(season)
        );
        self.rule(season, pattern, self.canonical(season, r"\1"), offset, scope)
    }

    /// Rule for one part file. The episode is written at `width` digits.
    #[must_use]
    pub fn part_rule(&self, season: u32, slot: &PartSlot, width: usize) -> RenameRule {
        let episode = format!("{:0width$}", slot.episode);
        let pattern = format!(
            "{}{}{EPISODE_PREFIX}?{episode}.*?{PART_MARKER}{}.*",
            self.title_pattern,
            SeasonMarker::Optional.pattern(season),
            slot.part
        );
        let scope = RuleScope::Part {
            season,
            episode: slot.episode,
            part: slot.part,
        };
        self.rule(
            season,
            pattern,
            self.canonical(season, &episode),
            slot.displacement,
            scope,
        )
    }

    /// Rule matching one episode by its compact air date (`YYYYMMDD`).
    #[must_use]
    pub fn air_date_rule(&self, season: u32, episode: u32, compact_date: &str) -> RenameRule {
        let pattern = format!(
            "{}.*{}.*",
            self.title_pattern,
            regex::escape(compact_date)
        );
        let scope = RuleScope::AirDate {
            season,
            episode,
            air_date: compact_date.to_string(),
        };
        self.rule(
            season,
            pattern,
            self.canonical(season, &format!("{episode:02}")),
            0,
            scope,
        )
    }
}

/// Rule builder for a movie.
#[derive(Debug, Clone)]
pub struct MovieTemplate {
    title_pattern: String,
    movie_name: String,
    year: String,
    id_tag: String,
}

impl MovieTemplate {
    #[must_use]
    pub fn new(movie: &MovieMetadata, file_title: &str) -> Self {
        Self {
            title_pattern: regex::escape(file_title),
            movie_name: dotted(&movie.title),
            year: year_of(&movie.release_date).to_string(),
            id_tag: id_tag(movie.id, MediaKind::Movie),
        }
    }

    /// The canonical name used as the rule-group key.
    #[must_use]
    pub fn naming_format(&self) -> String {
        format!("{}.{}.{}", self.movie_name, self.year, self.id_tag)
    }

    /// The single movie rule, with `.part<N>` before the id tag when a part
    /// label was detected. Movies never carry an offset.
    #[must_use]
    pub fn rule(&self, part_label: Option<&str>) -> RenameRule {
        let replace_template = match part_label {
            Some(part) => format!(
                "{}.{}.part{part}.{}",
                self.movie_name, self.year, self.id_tag
            ),
            None => self.naming_format(),
        };
        RenameRule {
            match_pattern: format!("{}.*", self.title_pattern),
            replace_template,
            anchor_prefix: String::new(),
            anchor_suffix: String::new(),
            offset: 0,
            scope: RuleScope::Movie,
        }
    }
}
