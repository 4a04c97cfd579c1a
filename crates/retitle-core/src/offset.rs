//! # Episode Offset Engine
//!
//! Reconciles canonical episode numbers with the numbers found in source
//! file names, either by one uniform shift per season or by accounting for
//! episodes that were split into several part files.

use crate::types::{PartEpisode, PartEpisodeMap, SkipReason};

/// Source episode range for a season shifted uniformly by `offset`.
///
/// Source numbers are `canonical - offset`.
///
/// # Errors
///
/// Returns [`SkipReason::NonPositiveSource`] when either end of the source
/// range would be zero or negative.
pub fn shift_range(first: u32, last: u32, offset: i32) -> Result<(u32, u32), SkipReason> {
    let start = i64::from(first) - i64::from(offset);
    let end = i64::from(last) - i64::from(offset);

    match (u32::try_from(start), u32::try_from(end)) {
        (Ok(s), Ok(e)) if s > 0 && e > 0 => Ok((s, e)),
        _ => Err(SkipReason::NonPositiveSource { offset, start, end }),
    }
}

/// One part file of a split episode and its displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSlot {
    pub episode: u32,
    pub part: u32,
    pub displacement: i32,
}

/// A run of unsplit episodes sharing one displacement.
///
/// `start..=end` are canonical episode numbers; their files carry
/// `canonical - displacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeInterval {
    pub start: u32,
    pub end: u32,
    pub displacement: i32,
}

/// Intervals kept for a season, plus the reason the trailing interval was
/// dropped, if it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalPlan {
    pub intervals: Vec<EpisodeInterval>,
    pub dropped: Option<SkipReason>,
}

/// Displacement bookkeeping for the part episodes of one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPlan {
    parts: Vec<PartEpisode>,
    last_episode: u32,
}

impl PartPlan {
    /// Plans a season whose episodes run `first..=last`.
    ///
    /// Entries of `map` outside that range are not honored; each one is
    /// returned as a [`SkipReason::PartEpisodeOutOfRange`].
    #[must_use]
    pub fn for_season(map: &PartEpisodeMap, first: u32, last: u32) -> (Self, Vec<SkipReason>) {
        let (parts, outside): (Vec<PartEpisode>, Vec<PartEpisode>) = map
            .entries()
            .iter()
            .copied()
            .partition(|p| (first..=last).contains(&p.episode));

        let skipped = outside
            .into_iter()
            .map(|p| SkipReason::PartEpisodeOutOfRange {
                episode: p.episode,
                first,
                last,
            })
            .collect();

        (
            Self {
                parts,
                last_episode: last,
            },
            skipped,
        )
    }

    /// Returns `true` when no part episode fell inside the season.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Displacement of `part` of `episode`.
    ///
    /// Every extra part of an earlier split episode pushes later numbers up
    /// by one; part `p` of `episode` itself sits `p - 1` slots further.
    #[must_use]
    pub fn displacement(&self, episode: u32, part: u32) -> i32 {
        let before: u32 = self
            .parts
            .iter()
            .take_while(|p| p.episode < episode)
            .map(|p| p.parts - 1)
            .sum();
        to_offset(before + part.saturating_sub(1))
    }

    /// Total displacement added by every honored part episode.
    #[must_use]
    pub fn total_displacement(&self) -> i32 {
        to_offset(self.parts.iter().map(|p| p.parts - 1).sum())
    }

    /// Every `(episode, part)` pair in ascending order.
    #[must_use]
    pub fn slots(&self) -> Vec<PartSlot> {
        let mut slots = Vec::new();
        let mut carried = 0u32;
        for entry in &self.parts {
            for part in 1..=entry.parts {
                slots.push(PartSlot {
                    episode: entry.episode,
                    part,
                    displacement: to_offset(carried + part - 1),
                });
            }
            carried += entry.parts - 1;
        }
        slots
    }

    /// Splits the unsplit episodes into intervals bounded by the part episodes.
    #[must_use]
    pub fn intervals(&self) -> IntervalPlan {
        let mut intervals = Vec::new();
        let mut start = 1u32;
        let mut carried = 0u32;

        for entry in &self.parts {
            if start < entry.episode {
                intervals.push(EpisodeInterval {
                    start,
                    end: entry.episode - 1,
                    displacement: to_offset(carried),
                });
            }
            carried += entry.parts - 1;
            start = entry.episode + 1;
        }

        // The trailing interval runs to the season end; displaced by any
        // nonzero total its maximum passes the last episode.
        let mut dropped = None;
        if start <= self.last_episode {
            let total = to_offset(carried);
            let displaced_max = u64::from(self.last_episode) + u64::from(carried);
            if displaced_max > u64::from(self.last_episode) {
                dropped = Some(SkipReason::TrailingIntervalOverflow {
                    after: start - 1,
                    offset: total,
                    last: self.last_episode,
                });
            } else {
                intervals.push(EpisodeInterval {
                    start,
                    end: self.last_episode,
                    displacement: total,
                });
            }
        }

        IntervalPlan { intervals, dropped }
    }
}

// Part counts are capped at 99 per episode, so any real sum fits.
fn to_offset(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(pairs: &[(u32, u32)], first: u32, last: u32) -> (PartPlan, Vec<SkipReason>) {
        let map = PartEpisodeMap::new(pairs.iter().copied()).unwrap();
        PartPlan::for_season(&map, first, last)
    }

    #[test]
    fn shift_range_subtracts_offset() {
        assert_eq!(shift_range(1, 12, 0), Ok((1, 12)));
        assert_eq!(shift_range(13, 24, 12), Ok((1, 12)));
        assert_eq!(shift_range(1, 12, -3), Ok((4, 15)));
    }

    #[test]
    fn shift_range_rejects_non_positive_source() {
        assert_eq!(
            shift_range(1, 12, 2),
            Err(SkipReason::NonPositiveSource {
                offset: 2,
                start: -1,
                end: 10,
            })
        );
        assert!(shift_range(5, 12, 5).is_err());
    }

    #[test]
    fn slots_accumulate_displacement() {
        let (plan, skipped) = plan(&[(9, 3), (5, 2)], 1, 12);
        assert!(skipped.is_empty());

        let got: Vec<(u32, u32, i32)> = plan
            .slots()
            .iter()
            .map(|s| (s.episode, s.part, s.displacement))
            .collect();
        assert_eq!(
            got,
            vec![(5, 1, 0), (5, 2, 1), (9, 1, 1), (9, 2, 2), (9, 3, 3)]
        );
        assert_eq!(plan.displacement(9, 3), 3);
        assert_eq!(plan.displacement(5, 1), 0);
        assert_eq!(plan.total_displacement(), 3);
    }

    #[test]
    fn intervals_between_parts() {
        let (plan, _) = plan(&[(5, 2), (9, 3)], 1, 12);
        let result = plan.intervals();

        assert_eq!(
            result.intervals,
            vec![
                EpisodeInterval {
                    start: 1,
                    end: 4,
                    displacement: 0,
                },
                EpisodeInterval {
                    start: 6,
                    end: 8,
                    displacement: 1,
                },
            ]
        );
        assert_eq!(
            result.dropped,
            Some(SkipReason::TrailingIntervalOverflow {
                after: 9,
                offset: 3,
                last: 12,
            })
        );
    }

    #[test]
    fn trailing_interval_dropped_when_displaced_past_season_end() {
        let (plan, _) = plan(&[(5, 2)], 1, 12);
        let result = plan.intervals();

        assert_eq!(
            result.intervals,
            vec![EpisodeInterval {
                start: 1,
                end: 4,
                displacement: 0,
            }]
        );
        assert_eq!(
            result.dropped,
            Some(SkipReason::TrailingIntervalOverflow {
                after: 5,
                offset: 1,
                last: 12,
            })
        );
    }

    #[test]
    fn trailing_interval_is_never_trimmed() {
        let (plan, _) = plan(&[(5, 2), (9, 3)], 1, 15);
        let result = plan.intervals();

        assert!(result.intervals.iter().all(|i| i.end < 9));
        assert_eq!(
            result.dropped,
            Some(SkipReason::TrailingIntervalOverflow {
                after: 9,
                offset: 3,
                last: 15,
            })
        );
    }

    #[test]
    fn adjacent_and_leading_parts_leave_no_empty_intervals() {
        let (plan, _) = plan(&[(1, 2), (2, 2), (5, 2)], 1, 10);
        let result = plan.intervals();

        assert_eq!(
            result.intervals,
            vec![EpisodeInterval {
                start: 3,
                end: 4,
                displacement: 2,
            }]
        );
        assert!(result.dropped.is_some());
    }

    #[test]
    fn last_episode_split_has_no_trailing_interval() {
        let (plan, _) = plan(&[(12, 2)], 1, 12);
        let result = plan.intervals();

        assert_eq!(result.dropped, None);
        assert_eq!(result.intervals.len(), 1);
        assert_eq!(result.intervals[0].end, 11);
    }

    #[test]
    fn out_of_range_entries_are_reported() {
        let (plan, skipped) = plan(&[(5, 2), (30, 2)], 13, 24);

        assert!(plan.is_empty());
        assert_eq!(skipped.len(), 2);
        assert!(skipped.contains(&SkipReason::PartEpisodeOutOfRange {
            episode: 30,
            first: 13,
            last: 24,
        }));
    }

    #[test]
    fn empty_plan_is_one_interval() {
        let (plan, _) = plan(&[(30, 2)], 1, 12);
        let result = plan.intervals();

        assert_eq!(
            result.intervals,
            vec![EpisodeInterval {
                start: 1,
                end: 12,
                displacement: 0,
            }]
        );
    }
}
