//! In-memory collaborators.
//!
//! [`StaticMetadata`] serves metadata loaded from a file or built in code;
//! [`MemoryStore`] keeps published rules in a map.

use std::collections::BTreeMap;

use crate::collab::{MetadataSource, RuleGroup, RuleStore};
use crate::error::{Result, RuleError};
use crate::types::{MovieMetadata, RenameRule, ShowMetadata};

/// Metadata held in memory, keyed by catalog id.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    shows: BTreeMap<u64, ShowMetadata>,
    movies: BTreeMap<u64, MovieMetadata>,
}

impl StaticMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_show(mut self, show: ShowMetadata) -> Self {
        self.shows.insert(show.id, show);
        self
    }

    #[must_use]
    pub fn with_movie(mut self, movie: MovieMetadata) -> Self {
        self.movies.insert(movie.id, movie);
        self
    }
}

impl MetadataSource for StaticMetadata {
    fn show(&self, id: u64) -> Result<ShowMetadata> {
        self.shows
            .get(&id)
            .cloned()
            .ok_or_else(|| RuleError::Metadata(format!("show {id} not found")))
    }

    fn movie(&self, id: u64) -> Result<MovieMetadata> {
        self.movies
            .get(&id)
            .cloned()
            .ok_or_else(|| RuleError::Metadata(format!("movie {id} not found")))
    }
}

/// Rule groups and rules held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    groups: Vec<RuleGroup>,
    rules: BTreeMap<i64, Vec<RenameRule>>,
    reject_pattern: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every rule whose match pattern equals `pattern`.
    #[must_use]
    pub fn rejecting(mut self, pattern: impl Into<String>) -> Self {
        self.reject_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Rules stored under `group`, in insertion order.
    #[must_use]
    pub fn rules(&self, group: &RuleGroup) -> &[RenameRule] {
        self.rules.get(&group.id).map(Vec::as_slice).unwrap_or_default()
    }
}

impl RuleStore for MemoryStore {
    fn find_group(&self, title: &str) -> Result<Option<RuleGroup>> {
        Ok(self.groups.iter().find(|g| g.title == title).cloned())
    }

    fn create_group(&mut self, title: &str) -> Result<RuleGroup> {
        let id = i64::try_from(self.groups.len())
            .map_err(|_| RuleError::Storage("too many groups".into()))?
            + 1;
        let group = RuleGroup {
            id,
            title: title.to_string(),
        };
        self.groups.push(group.clone());
        Ok(group)
    }

    fn add_rule(&mut self, group: &RuleGroup, rule: &RenameRule) -> Result<()> {
        if self.reject_pattern.as_deref() == Some(rule.match_pattern.as_str()) {
            return Err(RuleError::Storage(format!(
                "rule {} rejected",
                rule.match_pattern
            )));
        }
        if !self.groups.iter().any(|g| g.id == group.id) {
            return Err(RuleError::Storage(format!("group {} does not exist", group.id)));
        }
        self.rules.entry(group.id).or_default().push(rule.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleScope, SeasonMetadata};

    #[test]
    fn static_metadata_lookup() {
        let source = StaticMetadata::new()
            .with_show(ShowMetadata::new(5, "S", "2000-01-01").with_season(SeasonMetadata::numbered(1, 1, 3)))
            .with_movie(MovieMetadata::new(6, "M", "2001-01-01"));

        assert_eq!(source.show(5).unwrap().seasons.len(), 1);
        assert_eq!(source.movie(6).unwrap().title, "M");
        assert!(matches!(source.show(6), Err(RuleError::Metadata(_))));
        assert!(source.movie(5).is_err());
    }

    #[test]
    fn store_rejects_unknown_group() {
        let mut store = MemoryStore::new();
        let ghost = RuleGroup {
            id: 42,
            title: "ghost".into(),
        };
        let rule = RenameRule {
            match_pattern: "a".into(),
            replace_template: "b".into(),
            anchor_prefix: String::new(),
            anchor_suffix: String::new(),
            offset: 0,
            scope: RuleScope::Movie,
        };
        assert!(store.add_rule(&ghost, &rule).is_err());

        let group = store.create_group("real").unwrap();
        store.add_rule(&group, &rule).unwrap();
        assert_eq!(store.rules(&group), &[rule]);
        assert_eq!(store.groups().len(), 1);
    }
}
