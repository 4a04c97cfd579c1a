use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog media kind, used in the `type=` part of the id tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Tv,
    Movie,
}

impl MediaKind {
    /// Returns the lowercase tag written into naming formats.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One episode as reported by the metadata catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    /// Canonical episode number (1-based).
    pub episode_number: u32,

    /// Air date as `YYYY-MM-DD`, or empty when unknown.
    #[serde(default)]
    pub air_date: String,
}

impl EpisodeMetadata {
    /// Creates an episode without an air date.
    #[must_use]
    pub fn new(episode_number: u32) -> Self {
        Self {
            episode_number,
            air_date: String::new(),
        }
    }

    /// Sets the air date.
    #[must_use]
    pub fn with_air_date(mut self, air_date: impl Into<String>) -> Self {
        self.air_date = air_date.into();
        self
    }

    /// Returns the air date with separators removed (`20200514`),
    /// or `None` when the catalog has no date for this episode.
    #[must_use]
    pub fn compact_air_date(&self) -> Option<String> {
        let trimmed = self.air_date.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.replace('-', ""))
        }
    }
}

/// One season and its episodes, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonMetadata {
    /// Season number; 0 holds specials.
    pub season_number: u32,

    /// Episodes sorted by strictly increasing episode number.
    #[serde(default)]
    pub episodes: Vec<EpisodeMetadata>,
}

impl SeasonMetadata {
    #[must_use]
    pub fn new(season_number: u32, episodes: Vec<EpisodeMetadata>) -> Self {
        Self {
            season_number,
            episodes,
        }
    }

    /// Builds a season whose episodes are numbered `first..=last` with no air dates.
    #[must_use]
    pub fn numbered(season_number: u32, first: u32, last: u32) -> Self {
        Self::new(season_number, (first..=last).map(EpisodeMetadata::new).collect())
    }

    /// Returns `true` for the specials season.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.season_number == 0
    }

    #[must_use]
    pub fn first_episode(&self) -> Option<u32> {
        self.episodes.first().map(|e| e.episode_number)
    }

    #[must_use]
    pub fn last_episode(&self) -> Option<u32> {
        self.episodes.last().map(|e| e.episode_number)
    }

    /// Returns the first episode number that breaks the ordering invariant
    /// (zero, repeated, or smaller than its predecessor).
    #[must_use]
    pub fn first_out_of_order(&self) -> Option<u32> {
        let mut previous = 0u32;
        for episode in &self.episodes {
            if episode.episode_number <= previous {
                return Some(episode.episode_number);
            }
            previous = episode.episode_number;
        }
        None
    }
}

/// Show-level metadata with every season's episode list already attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMetadata {
    /// Catalog id, written into the `tmdbid=` tag.
    pub id: u64,

    /// Display name of the show.
    pub name: String,

    /// First air date as `YYYY-MM-DD`, or empty.
    #[serde(default)]
    pub first_air_date: String,

    /// Catalog media kind.
    #[serde(rename = "type", default)]
    pub kind: MediaKind,

    /// Seasons in catalog order.
    #[serde(default)]
    pub seasons: Vec<SeasonMetadata>,
}

impl ShowMetadata {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, first_air_date: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            first_air_date: first_air_date.into(),
            kind: MediaKind::Tv,
            seasons: Vec::new(),
        }
    }

    /// Appends a season.
    #[must_use]
    pub fn with_season(mut self, season: SeasonMetadata) -> Self {
        self.seasons.push(season);
        self
    }

    /// Returns the highest last-episode number over the regular seasons.
    ///
    /// Specials are excluded: their numbering is unrelated to continuous
    /// episode numbering across seasons.
    #[must_use]
    pub fn max_episode_number(&self) -> Option<u32> {
        self.seasons
            .iter()
            .filter(|s| !s.is_special())
            .filter_map(SeasonMetadata::last_episode)
            .max()
    }
}

/// Movie-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMetadata {
    /// Catalog id, written into the `tmdbid=` tag.
    pub id: u64,

    /// Localized title.
    pub title: String,

    /// Release date as `YYYY-MM-DD`, or empty.
    #[serde(default)]
    pub release_date: String,

    /// Title in the original language.
    #[serde(default)]
    pub original_title: String,
}

impl MovieMetadata {
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, release_date: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            original_title: title.clone(),
            title,
            release_date: release_date.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_air_date_strips_dashes() {
        let ep = EpisodeMetadata::new(3).with_air_date("2020-05-14");
        assert_eq!(ep.compact_air_date().as_deref(), Some("20200514"));
        assert_eq!(EpisodeMetadata::new(4).compact_air_date(), None);
    }

    #[test]
    fn season_bounds() {
        let season = SeasonMetadata::numbered(1, 1, 12);
        assert_eq!(season.first_episode(), Some(1));
        assert_eq!(season.last_episode(), Some(12));
        assert_eq!(season.first_out_of_order(), None);
        assert!(!season.is_special());

        let empty = SeasonMetadata::new(2, Vec::new());
        assert_eq!(empty.first_episode(), None);
        assert_eq!(empty.last_episode(), None);
    }

    #[test]
    fn out_of_order_episodes_are_reported() {
        let season = SeasonMetadata::new(
            1,
            vec![
                EpisodeMetadata::new(1),
                EpisodeMetadata::new(3),
                EpisodeMetadata::new(3),
            ],
        );
        assert_eq!(season.first_out_of_order(), Some(3));

        let zero = SeasonMetadata::new(1, vec![EpisodeMetadata::new(0)]);
        assert_eq!(zero.first_out_of_order(), Some(0));
    }

    #[test]
    fn max_episode_skips_specials() {
        let show = ShowMetadata::new(1, "Show", "2001-01-01")
            .with_season(SeasonMetadata::numbered(0, 1, 400))
            .with_season(SeasonMetadata::numbered(1, 1, 24))
            .with_season(SeasonMetadata::numbered(2, 25, 48));
        assert_eq!(show.max_episode_number(), Some(48));
    }

    #[test]
    fn show_deserializes_catalog_type_field() {
        let json = r#"{
            "id": 37854,
            "name": "One Piece",
            "first_air_date": "1999-10-20",
            "type": "tv",
            "seasons": [{"season_number": 1, "episodes": [{"episode_number": 1, "air_date": "1999-10-20"}]}]
        }"#;
        let show: ShowMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(show.kind, MediaKind::Tv);
        assert_eq!(show.seasons[0].episodes[0].air_date, "1999-10-20");
    }
}
