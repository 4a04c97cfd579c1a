use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};

/// Which seasons of a show receive rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonSelection {
    /// Every season; the specials season only when `include_specials` is set.
    All { include_specials: bool },
    /// Exactly these season numbers (0 selects specials explicitly).
    Only(BTreeSet<u32>),
}

impl Default for SeasonSelection {
    fn default() -> Self {
        Self::All {
            include_specials: false,
        }
    }
}

impl SeasonSelection {
    /// Selects the given season numbers.
    pub fn only(seasons: impl IntoIterator<Item = u32>) -> Self {
        Self::Only(seasons.into_iter().collect())
    }

    #[must_use]
    pub fn includes(&self, season: u32) -> bool {
        match self {
            Self::All { include_specials } => season != 0 || *include_specials,
            Self::Only(set) => set.contains(&season),
        }
    }
}

/// A canonical episode split into `parts` source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartEpisode {
    pub episode: u32,
    pub parts: u32,
}

/// Upper bound on parts per episode; anything above is a typo.
const MAX_PARTS: u32 = 99;

/// Part episodes sorted ascending by episode number.
///
/// Offsets accumulate over this list in order, so it is sorted once here and
/// never re-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PartEpisodeMap {
    entries: Vec<PartEpisode>,
}

impl PartEpisodeMap {
    /// Builds the map from `(episode, parts)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPartMap` for episode 0, a part count
    /// outside `2..=99`, or an episode listed twice.
    pub fn new(pairs: impl IntoIterator<Item = (u32, u32)>) -> Result<Self> {
        let mut entries: Vec<PartEpisode> = pairs
            .into_iter()
            .map(|(episode, parts)| PartEpisode { episode, parts })
            .collect();
        entries.sort_by_key(|e| e.episode);

        for entry in &entries {
            if entry.episode == 0 {
                return Err(RuleError::InvalidPartMap(
                    "episode numbers start at 1".into(),
                ));
            }
            if !(2..=MAX_PARTS).contains(&entry.parts) {
                return Err(RuleError::InvalidPartMap(format!(
                    "episode {} has {} parts, expected 2..={MAX_PARTS}",
                    entry.episode, entry.parts
                )));
            }
        }
        if let Some(pair) = entries.windows(2).find(|w| w[0].episode == w[1].episode) {
            return Err(RuleError::InvalidPartMap(format!(
                "episode {} listed more than once",
                pair[0].episode
            )));
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[PartEpisode] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromStr for PartEpisodeMap {
    type Err = RuleError;

    /// Parses `"5:2,9:3"` (episode 5 in two parts, episode 9 in three).
    fn from_str(s: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let (episode, parts) = item.split_once(':').ok_or_else(|| {
                RuleError::InvalidPartMap(format!("expected EPISODE:PARTS, got {item:?}"))
            })?;
            let episode = episode.trim().parse().map_err(|_| {
                RuleError::InvalidPartMap(format!("bad episode number in {item:?}"))
            })?;
            let parts = parts.trim().parse().map_err(|_| {
                RuleError::InvalidPartMap(format!("bad part count in {item:?}"))
            })?;
            pairs.push((episode, parts));
        }
        Self::new(pairs)
    }
}

/// The user's numbering choices for one compiler run.
///
/// Built once through [`NamingConfigBuilder`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingConfig {
    file_title: String,
    use_original_season_numbering: bool,
    episode_offset: i32,
    pad_zero: bool,
    episode_continuous: bool,
    target_seasons: SeasonSelection,
    part_episodes: Option<PartEpisodeMap>,
    date_mode: bool,
}

impl NamingConfig {
    /// Starts a configuration for files whose names begin with `file_title`.
    pub fn builder(file_title: impl Into<String>) -> NamingConfigBuilder {
        NamingConfigBuilder::new(file_title)
    }

    /// Title fragment as it appears in the existing file names.
    #[must_use]
    pub fn file_title(&self) -> &str {
        &self.file_title
    }

    #[must_use]
    pub fn use_original_season_numbering(&self) -> bool {
        self.use_original_season_numbering
    }

    #[must_use]
    pub fn episode_offset(&self) -> i32 {
        self.episode_offset
    }

    #[must_use]
    pub fn pad_zero(&self) -> bool {
        self.pad_zero
    }

    #[must_use]
    pub fn episode_continuous(&self) -> bool {
        self.episode_continuous
    }

    #[must_use]
    pub fn target_seasons(&self) -> &SeasonSelection {
        &self.target_seasons
    }

    #[must_use]
    pub fn has_part_episodes(&self) -> bool {
        self.part_episodes.is_some()
    }

    #[must_use]
    pub fn part_episodes(&self) -> Option<&PartEpisodeMap> {
        self.part_episodes.as_ref()
    }

    #[must_use]
    pub fn is_date_mode(&self) -> bool {
        self.date_mode
    }
}

/// Validating builder for [`NamingConfig`].
#[derive(Debug, Clone)]
pub struct NamingConfigBuilder {
    config: NamingConfig,
}

impl NamingConfigBuilder {
    fn new(file_title: impl Into<String>) -> Self {
        Self {
            config: NamingConfig {
                file_title: file_title.into(),
                use_original_season_numbering: false,
                episode_offset: 0,
                pad_zero: false,
                episode_continuous: false,
                target_seasons: SeasonSelection::default(),
                part_episodes: None,
                date_mode: false,
            },
        }
    }

    /// Match the season marker (`S01`) present in the existing file names.
    pub fn with_original_season_numbering(mut self, enabled: bool) -> Self {
        self.config.use_original_season_numbering = enabled;
        self
    }

    /// Canonical minus source episode number, applied to every season.
    pub fn with_episode_offset(mut self, offset: i32) -> Self {
        self.config.episode_offset = offset;
        self
    }

    /// Zero-pad episode numbers in the match patterns.
    pub fn with_pad_zero(mut self, enabled: bool) -> Self {
        self.config.pad_zero = enabled;
        self
    }

    /// Size the padding from the whole show rather than each season.
    pub fn with_episode_continuous(mut self, enabled: bool) -> Self {
        self.config.episode_continuous = enabled;
        self
    }

    pub fn with_target_seasons(mut self, seasons: SeasonSelection) -> Self {
        self.config.target_seasons = seasons;
        self
    }

    /// Switch to part-episode mode with the given split episodes.
    pub fn with_part_episodes(mut self, map: PartEpisodeMap) -> Self {
        self.config.part_episodes = Some(map);
        self
    }

    /// Identify episodes by air date instead of episode number.
    pub fn with_date_mode(mut self, enabled: bool) -> Self {
        self.config.date_mode = enabled;
        self
    }

    /// Validates the combination of choices.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidConfig` when the title fragment is empty or
    /// the selected modes contradict each other.
    pub fn build(self) -> Result<NamingConfig> {
        let mut config = self.config;
        config.file_title = config.file_title.trim().to_string();

        if config.file_title.is_empty() {
            return Err(RuleError::InvalidConfig("file title fragment is empty".into()));
        }
        if config.date_mode {
            if config.part_episodes.is_some() {
                return Err(RuleError::InvalidConfig(
                    "date mode cannot be combined with part episodes".into(),
                ));
            }
            if config.episode_offset != 0 {
                return Err(RuleError::InvalidConfig(
                    "date mode cannot be combined with an episode offset".into(),
                ));
            }
        }
        if let Some(map) = &config.part_episodes {
            if map.is_empty() {
                return Err(RuleError::InvalidConfig(
                    "part-episode mode needs at least one part episode".into(),
                ));
            }
            if config.episode_offset != 0 {
                return Err(RuleError::InvalidConfig(
                    "part episodes derive their own offsets; drop the episode offset".into(),
                ));
            }
            if config.use_original_season_numbering {
                return Err(RuleError::InvalidConfig(
                    "part episodes are matched without the original season marker".into(),
                ));
            }
        }
        if config.episode_continuous && !config.pad_zero {
            return Err(RuleError::InvalidConfig(
                "continuous numbering only sizes zero padding; enable padding".into(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_selection_all_excludes_specials_by_default() {
        let all = SeasonSelection::default();
        assert!(all.includes(1));
        assert!(!all.includes(0));

        let with_specials = SeasonSelection::All {
            include_specials: true,
        };
        assert!(with_specials.includes(0));
    }

    #[test]
    fn season_selection_only() {
        let only = SeasonSelection::only([0, 2]);
        assert!(only.includes(0));
        assert!(only.includes(2));
        assert!(!only.includes(1));
    }

    #[test]
    fn part_map_is_sorted_on_construction() {
        let map = PartEpisodeMap::new([(9, 3), (5, 2)]).unwrap();
        let episodes: Vec<u32> = map.entries().iter().map(|e| e.episode).collect();
        assert_eq!(episodes, vec![5, 9]);
    }

    #[test]
    fn part_map_rejects_bad_entries() {
        assert!(matches!(
            PartEpisodeMap::new([(5, 1)]),
            Err(RuleError::InvalidPartMap(_))
        ));
        assert!(matches!(
            PartEpisodeMap::new([(0, 2)]),
            Err(RuleError::InvalidPartMap(_))
        ));
        assert!(matches!(
            PartEpisodeMap::new([(5, 2), (5, 3)]),
            Err(RuleError::InvalidPartMap(_))
        ));
    }

    #[test]
    fn part_map_parses_from_text() {
        let map: PartEpisodeMap = "9:3, 5:2".parse().unwrap();
        assert_eq!(
            map.entries(),
            &[
                PartEpisode { episode: 5, parts: 2 },
                PartEpisode { episode: 9, parts: 3 },
            ]
        );
        assert!("5-2".parse::<PartEpisodeMap>().is_err());
        assert!("x:2".parse::<PartEpisodeMap>().is_err());
    }

    #[test]
    fn builder_trims_title_and_keeps_choices() {
        let config = NamingConfig::builder("  One.Piece ")
            .with_episode_offset(-2)
            .with_pad_zero(true)
            .with_episode_continuous(true)
            .build()
            .unwrap();

        assert_eq!(config.file_title(), "One.Piece");
        assert_eq!(config.episode_offset(), -2);
        assert!(config.pad_zero());
        assert!(config.episode_continuous());
        assert!(!config.has_part_episodes());
        assert!(!config.is_date_mode());
    }

    #[test]
    fn builder_rejects_conflicting_modes() {
        let parts = PartEpisodeMap::new([(5, 2)]).unwrap();

        assert!(NamingConfig::builder("").build().is_err());
        assert!(NamingConfig::builder("T")
            .with_date_mode(true)
            .with_part_episodes(parts.clone())
            .build()
            .is_err());
        assert!(NamingConfig::builder("T")
            .with_date_mode(true)
            .with_episode_offset(1)
            .build()
            .is_err());
        assert!(NamingConfig::builder("T")
            .with_part_episodes(parts.clone())
            .with_episode_offset(1)
            .build()
            .is_err());
        assert!(NamingConfig::builder("T")
            .with_part_episodes(parts)
            .with_original_season_numbering(true)
            .build()
            .is_err());
        assert!(NamingConfig::builder("T")
            .with_episode_continuous(true)
            .build()
            .is_err());
    }
}
