//! TMDB response shapes and their conversion into core metadata.

use retitle_core::{
    EpisodeMetadata, MediaKind, MovieMetadata, SeasonMetadata, ShowMetadata,
};
use serde::{Deserialize, Serialize};

// ============ TV Show Details ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvSeriesDetail {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Series type as TMDB reports it ("Scripted", "Miniseries", ...).
    #[serde(rename = "type", default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetail {
    pub season_number: u32,
    #[serde(default)]
    pub episodes: Vec<TvEpisode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvEpisode {
    pub episode_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
}

// ============ Movie Details ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
}

/// Error document TMDB returns with non-200 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbErrorBody {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
}

impl TvSeriesDetail {
    /// Media kind for the id tag; anything but `movie` is a TV show.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        match self.series_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            _ => MediaKind::Tv,
        }
    }

    /// Builds core metadata from the series and its fetched seasons.
    #[must_use]
    pub fn into_show(self, seasons: Vec<SeasonMetadata>) -> ShowMetadata {
        let kind = self.kind();
        ShowMetadata {
            id: self.id,
            name: self.name,
            first_air_date: self.first_air_date.unwrap_or_default(),
            kind,
            seasons,
        }
    }
}

impl From<SeasonDetail> for SeasonMetadata {
    fn from(detail: SeasonDetail) -> Self {
        let episodes = detail
            .episodes
            .into_iter()
            .map(|e| {
                EpisodeMetadata::new(e.episode_number).with_air_date(e.air_date.unwrap_or_default())
            })
            .collect();
        SeasonMetadata::new(detail.season_number, episodes)
    }
}

impl From<MovieDetail> for MovieMetadata {
    fn from(detail: MovieDetail) -> Self {
        let original_title = detail
            .original_title
            .unwrap_or_else(|| detail.title.clone());
        MovieMetadata {
            id: detail.id,
            title: detail.title,
            release_date: detail.release_date.unwrap_or_default(),
            original_title,
        }
    }
}
