//! Collaborator seams: where metadata comes from and where rules go.
//!
//! The compiler only depends on these traits, so it can run against the
//! remote clients or the in-memory fakes in [`crate::memory`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{MovieMetadata, RenameRule, RuleBatch, RuleScope, ShowMetadata};

/// Supplies catalog metadata.
pub trait MetadataSource {
    /// Returns the show with every season's episodes attached.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Metadata` when the show cannot be fetched.
    fn show(&self, id: u64) -> Result<ShowMetadata>;

    /// Returns the movie.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Metadata` when the movie cannot be fetched.
    fn movie(&self, id: u64) -> Result<MovieMetadata>;
}

/// A stored group of rules, keyed by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub id: i64,
    pub title: String,
}

/// Persists rules under rule groups.
pub trait RuleStore {
    /// Returns the group whose title equals `title` exactly.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Storage` when the store cannot be queried.
    fn find_group(&self, title: &str) -> Result<Option<RuleGroup>>;

    /// Creates a group named `title`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Storage` when the store refuses the group.
    fn create_group(&mut self, title: &str) -> Result<RuleGroup>;

    /// Adds one rule to `group`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Storage` when the store rejects the rule.
    fn add_rule(&mut self, group: &RuleGroup, rule: &RenameRule) -> Result<()>;
}

/// A rule the store refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRejection {
    /// Position of the rule in the batch.
    pub index: usize,
    pub scope: RuleScope,
    pub message: String,
}

/// Outcome of [`publish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub group: RuleGroup,
    /// `true` when the group was created by this run.
    pub created_group: bool,
    pub accepted: usize,
    pub rejected: Vec<RuleRejection>,
}

impl PublishReport {
    /// Returns `true` when every rule was accepted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl fmt::Display for PublishReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.created_group { "created" } else { "reused" };
        writeln!(
            f,
            "Group {} ({action}, id {}): {} accepted, {} rejected",
            self.group.title,
            self.group.id,
            self.accepted,
            self.rejected.len()
        )?;
        for rejection in &self.rejected {
            writeln!(
                f,
                "  [{}] {}: {}",
                rejection.index + 1,
                rejection.scope,
                rejection.message
            )?;
        }
        Ok(())
    }
}

/// Stores `batch` under the group named by its naming format.
///
/// An existing group with that exact title is reused; otherwise one is
/// created. Rules are added in batch order and a rejected rule does not stop
/// the rest.
///
/// # Errors
///
/// Returns the store's error when the group cannot be found or created.
pub fn publish<S: RuleStore + ?Sized>(store: &mut S, batch: &RuleBatch) -> Result<PublishReport> {
    let (group, created_group) = match store.find_group(&batch.naming_format)? {
        Some(group) => {
            info!(group = %group.title, id = group.id, "reusing rule group");
            (group, false)
        }
        None => {
            let group = store.create_group(&batch.naming_format)?;
            info!(group = %group.title, id = group.id, "created rule group");
            (group, true)
        }
    };

    let mut accepted = 0;
    let mut rejected = Vec::new();
    for (index, rule) in batch.rules.iter().enumerate() {
        match store.add_rule(&group, rule) {
            Ok(()) => accepted += 1,
            Err(e) => {
                warn!(scope = %rule.scope, error = %e, "rule rejected");
                rejected.push(RuleRejection {
                    index,
                    scope: rule.scope.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(PublishReport {
        group,
        created_group,
        accepted,
        rejected,
    })
}
