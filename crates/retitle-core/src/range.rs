//! # Range Pattern Compiler
//!
//! Turns an integer range into a compact regex group matching the
//! zero-padded numerals of that range, e.g. `1..=12` at width 2 becomes
//! `(0[1-9]|1[0-2])`.

/// The group returned for an empty range. It matches only the empty string.
pub const EMPTY_RANGE: &str = "()";

/// Compiles `start..=end` into a single regex group.
///
/// Numbers are written zero-padded to `digit_width`. A `start` below 1 is
/// clamped to 1; a range with `end < 1` or `start > end` yields
/// [`EMPTY_RANGE`].
///
/// When `end` has more digits than `digit_width` (e.g. `1..=12` unpadded),
/// the range is split at each power of ten and every piece is compiled at
/// its own width. Wider pieces come first in the alternation so that a
/// leftmost-first engine prefers `12` over `1`.
///
/// # Examples
///
/// ```
/// use retitle_core::range::compile_range;
///
/// assert_eq!(compile_range(1, 12, 2), "(0[1-9]|1[0-2])");
/// assert_eq!(compile_range(1, 12, 1), "(1[0-2]|[1-9])");
/// assert_eq!(compile_range(5, 3, 2), "()");
/// ```
#[must_use]
pub fn compile_range(start: i64, end: i64, digit_width: usize) -> String {
    if end < 1 || start > end {
        return EMPTY_RANGE.to_string();
    }
    // Both bounds are now >= 1.
    let start = start.max(1).unsigned_abs();
    let end = end.unsigned_abs();
    let width = digit_width.max(1);

    let mut segments = Vec::new();
    let mut low = start;
    loop {
        let segment_width = width.max(digit_count(low));
        let high = end.min(largest_with_digits(segment_width));
        segments.push((low, high, segment_width));
        if high >= end {
            break;
        }
        low = high + 1;
    }

    let terms: Vec<String> = segments
        .iter()
        .rev()
        .flat_map(|&(low, high, width)| segment_terms(low, high, width))
        .collect();

    format!("({})", terms.join("|"))
}

/// Number of decimal digits in `n` (1 for zero).
#[must_use]
pub fn digit_count(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

fn largest_with_digits(width: usize) -> u64 {
    u32::try_from(width)
        .ok()
        .and_then(|w| 10u64.checked_pow(w))
        .map_or(u64::MAX, |p| p - 1)
}

/// Terms for a range whose numbers all fit in `width` digits.
fn segment_terms(low: u64, high: u64, width: usize) -> Vec<String> {
    if width == 1 {
        return vec![digit_class(low, high)];
    }

    let mut terms = Vec::new();
    for band in (low / 100)..=(high / 100) {
        let band_low = low.max(band * 100);
        let band_high = high.min(band * 100 + 99);

        let padded = format!("{band_low:0width$}");
        let prefix = &padded[..width - 2];

        let (tens_low, ones_low) = ((band_low / 10) % 10, band_low % 10);
        let (tens_high, ones_high) = ((band_high / 10) % 10, band_high % 10);

        if tens_low == tens_high {
            terms.push(format!("{prefix}{tens_low}{}", digit_class(ones_low, ones_high)));
            continue;
        }

        // A tens digit whose ones run 0..=9 is folded into the full terms.
        let mut first_full = tens_low;
        if ones_low != 0 {
            terms.push(format!("{prefix}{tens_low}{}", digit_class(ones_low, 9)));
            first_full += 1;
        }
        let last_full = if ones_high == 9 { tens_high } else { tens_high - 1 };
        for tens in first_full..=last_full {
            terms.push(format!("{prefix}{tens}[0-9]"));
        }
        if ones_high != 9 {
            terms.push(format!("{prefix}{tens_high}{}", digit_class(0, ones_high)));
        }
    }
    terms
}

fn digit_class(low: u64, high: u64) -> String {
    if low == high {
        low.to_string()
    } else {
        format!("[{low}-{high}]")
    }
}
