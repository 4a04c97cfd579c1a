//! # Rule Compiler
//!
//! Walks a show's seasons, applies the numbering configuration and collects
//! the resulting rules into a [`RuleBatch`].

use tracing::{debug, info, warn};

use crate::collab::MetadataSource;
use crate::error::Result;
use crate::offset::{PartPlan, shift_range};
use crate::range::{compile_range, digit_count};
use crate::template::{MovieTemplate, PartLabelDetector, SeasonMarker, ShowTemplate};
use crate::types::{
    MovieMetadata, NamingConfig, PartEpisodeMap, RenameRule, RuleBatch, RuleScope,
    SeasonMetadata, ShowMetadata, Skip, SkipReason,
};

/// Narrowest padded width; single-digit shows still pad to `01`.
const MIN_PADDED_WIDTH: usize = 2;

/// Compiles metadata into rename rules under one [`NamingConfig`].
///
/// # Example
///
/// ```
/// use retitle_core::{NamingConfig, RuleCompiler, SeasonMetadata, ShowMetadata};
///
/// let config = NamingConfig::builder("Show").with_pad_zero(true).build().unwrap();
/// let compiler = RuleCompiler::new(config).unwrap();
///
/// let show = ShowMetadata::new(1, "My Show", "2020-01-01")
///     .with_season(SeasonMetadata::numbered(1, 1, 12));
/// let batch = compiler.compile_show(&show);
///
/// assert_eq!(batch.len(), 1);
/// assert_eq!(batch.rules[0].replace_template, r"My.Show.S01E\1.2020.{[tmdbid=1;type=tv]}");
/// ```
pub struct RuleCompiler {
    config: NamingConfig,
    part_labels: PartLabelDetector,
}

impl RuleCompiler {
    /// Creates a compiler for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the part-label patterns fail to compile.
    pub fn new(config: NamingConfig) -> Result<Self> {
        Ok(Self {
            config,
            part_labels: PartLabelDetector::new()?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Fetches a show from `source` and compiles it.
    ///
    /// # Errors
    ///
    /// Returns the metadata collaborator's error; compiling itself never fails.
    pub fn compile_show_from<M: MetadataSource + ?Sized>(
        &self,
        source: &M,
        id: u64,
    ) -> Result<RuleBatch> {
        let show = source.show(id)?;
        Ok(self.compile_show(&show))
    }

    /// Fetches a movie from `source` and compiles it.
    ///
    /// # Errors
    ///
    /// Returns the metadata collaborator's error.
    pub fn compile_movie_from<M: MetadataSource + ?Sized>(
        &self,
        source: &M,
        id: u64,
    ) -> Result<RuleBatch> {
        let movie = source.movie(id)?;
        Ok(self.compile_movie(&movie))
    }

    /// Compiles every selected season of `show`.
    ///
    /// Problems confined to one season are recorded in
    /// [`RuleBatch::skipped`] and the remaining seasons still compile.
    #[must_use]
    pub fn compile_show(&self, show: &ShowMetadata) -> RuleBatch {
        let template = ShowTemplate::new(show, self.config.file_title());
        let mut batch = RuleBatch::new(template.naming_format());
        let show_max = show.max_episode_number();

        for season in &show.seasons {
            let number = season.season_number;
            if !self.config.target_seasons().includes(number) {
                debug!(season = number, "season not selected");
                continue;
            }

            let (Some(first), Some(last)) = (season.first_episode(), season.last_episode())
            else {
                record_skip(&mut batch, number, SkipReason::EmptySeason);
                continue;
            };
            if let Some(episode) = season.first_out_of_order() {
                record_skip(&mut batch, number, SkipReason::UnorderedEpisodes { episode });
                continue;
            }

            let width = self.digit_width(show_max, last);

            if self.config.is_date_mode() {
                self.compile_air_dates(&template, season, &mut batch);
            } else if let Some(map) = self.config.part_episodes() {
                compile_parts(&template, number, map, (first, last), width, &mut batch);
            } else {
                self.compile_uniform(&template, number, (first, last), width, &mut batch);
            }
        }

        info!(
            naming_format = %batch.naming_format,
            rules = batch.rules.len(),
            skipped = batch.skipped.len(),
            "compiled show"
        );
        batch
    }

    /// Compiles the single rule for `movie`.
    #[must_use]
    pub fn compile_movie(&self, movie: &MovieMetadata) -> RuleBatch {
        let template = MovieTemplate::new(movie, self.config.file_title());
        let mut batch = RuleBatch::new(template.naming_format());

        let part = self.part_labels.detect(self.config.file_title());
        if let Some(part) = &part {
            debug!(part = %part, "detected part label");
        }
        push_rule(&mut batch, template.rule(part.as_deref()));

        info!(naming_format = %batch.naming_format, "compiled movie");
        batch
    }

    /// Padded width of episode numbers in a season whose last episode is
    /// `season_last`.
    ///
    /// Without padding numbers are written naturally (width 1). With
    /// padding, the width follows the largest episode number of the season,
    /// or of the whole show for continuous numbering, and is at least 2.
    #[must_use]
    pub fn digit_width(&self, show_max: Option<u32>, season_last: u32) -> usize {
        if !self.config.pad_zero() {
            return 1;
        }
        let largest = if self.config.episode_continuous() {
            show_max.unwrap_or(season_last)
        } else {
            season_last
        };
        digit_count(u64::from(largest)).max(MIN_PADDED_WIDTH)
    }

    fn compile_uniform(
        &self,
        template: &ShowTemplate,
        season: u32,
        (first, last): (u32, u32),
        width: usize,
        batch: &mut RuleBatch,
    ) {
        let offset = self.config.episode_offset();
        let (start, end) = match shift_range(first, last, offset) {
            Ok(range) => range,
            Err(reason) => {
                record_skip(batch, season, reason);
                return;
            }
        };

        let marker = if self.config.use_original_season_numbering() {
            SeasonMarker::Exact
        } else {
            SeasonMarker::Any
        };
        let range = compile_range(i64::from(start), i64::from(end), width);
        let scope = RuleScope::Season { season, start, end };
        push_rule(batch, template.season_rule(season, &range, marker, offset, scope));
    }

    fn compile_air_dates(
        &self,
        template: &ShowTemplate,
        season: &SeasonMetadata,
        batch: &mut RuleBatch,
    ) {
        let number = season.season_number;
        for episode in &season.episodes {
            match episode.compact_air_date() {
                Some(date) => push_rule(
                    batch,
                    template.air_date_rule(number, episode.episode_number, &date),
                ),
                None => {
                    info!(
                        season = number,
                        episode = episode.episode_number,
                        "no air date, episode skipped"
                    );
                    batch.skipped.push(Skip {
                        season: number,
                        reason: SkipReason::MissingAirDate {
                            episode: episode.episode_number,
                        },
                    });
                }
            }
        }
    }
}

fn compile_parts(
    template: &ShowTemplate,
    season: u32,
    map: &PartEpisodeMap,
    (first, last): (u32, u32),
    width: usize,
    batch: &mut RuleBatch,
) {
    let (plan, outside) = PartPlan::for_season(map, first, last);
    for reason in outside {
        record_skip(batch, season, reason);
    }

    for slot in plan.slots() {
        push_rule(batch, template.part_rule(season, &slot, width));
    }

    let intervals = plan.intervals();
    for interval in &intervals.intervals {
        let range = compile_range(i64::from(interval.start), i64::from(interval.end), width);
        let scope = RuleScope::Interval {
            season,
            start: interval.start,
            end: interval.end,
        };
        push_rule(
            batch,
            template.interval_rule(season, &range, interval.displacement, scope),
        );
    }
    if let Some(reason) = intervals.dropped {
        record_skip(batch, season, reason);
    }
}

fn push_rule(batch: &mut RuleBatch, rule: RenameRule) {
    debug!(
        scope = %rule.scope,
        pattern = %rule.match_pattern,
        offset = rule.offset,
        "rule"
    );
    batch.rules.push(rule);
}

fn record_skip(batch: &mut RuleBatch, season: u32, reason: SkipReason) {
    warn!(season, reason = %reason, "skipped");
    batch.skipped.push(Skip { season, reason });
}
