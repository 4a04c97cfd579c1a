use regex::Regex;

use crate::error::Result;

/// Converts a roman numeral to a number by summing right to left.
///
/// A symbol smaller than the one to its right is subtracted, anything else is
/// added. Sequences such as `iiii` or `ic` are accepted as-is; unknown
/// characters count as zero. Case-insensitive.
///
/// ```
/// use retitle_core::template::roman_to_arabic;
///
/// assert_eq!(roman_to_arabic("iv"), 4);
/// assert_eq!(roman_to_arabic("XII"), 12);
/// assert_eq!(roman_to_arabic("iiii"), 4);
/// ```
#[must_use]
pub fn roman_to_arabic(roman: &str) -> u32 {
    let mut total: i64 = 0;
    let mut previous: i64 = 0;

    for symbol in roman.chars().rev() {
        let value = match symbol.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => 0,
        };
        if value < previous {
            total -= value;
        } else {
            total += value;
        }
        previous = value;
    }

    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

/// Finds a `part N` label in a title fragment.
pub struct PartLabelDetector {
    re_digits: Regex,
    re_roman: Regex,
}

impl PartLabelDetector {
    /// Creates a new detector with compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if regex compilation fails.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_digits: Regex::new(r"part\.?\s*(\d+)")?,
            re_roman: Regex::new(r"part\.?\s*([ivxlcdm]+)")?,
        })
    }

    /// Returns the part number found in `fragment`, if any.
    ///
    /// Digits are returned verbatim (`Part 02` gives `"02"`); roman numerals
    /// are converted (`Part.II` gives `"2"`). The label need not end at a word
    /// boundary, so `Partisan` reads as part 1.
    #[must_use]
    pub fn detect(&self, fragment: &str) -> Option<String> {
        let lowered = fragment.to_lowercase();

        if let Some(caps) = self.re_digits.captures(&lowered) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }

        self.re_roman
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| roman_to_arabic(m.as_str()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_canonical_forms() {
        assert_eq!(roman_to_arabic("i"), 1);
        assert_eq!(roman_to_arabic("ix"), 9);
        assert_eq!(roman_to_arabic("xiv"), 14);
        assert_eq!(roman_to_arabic("mcmxcix"), 1999);
    }

    #[test]
    fn roman_is_lenient() {
        assert_eq!(roman_to_arabic("iiii"), 4);
        assert_eq!(roman_to_arabic("ic"), 99);
        assert_eq!(roman_to_arabic("vv"), 10);
        assert_eq!(roman_to_arabic(""), 0);
    }

    #[test]
    fn detect_digits() {
        let detector = PartLabelDetector::new().unwrap();
        assert_eq!(detector.detect("Dune Part 2").as_deref(), Some("2"));
        assert_eq!(detector.detect("Dune.Part.02").as_deref(), Some("02"));
        assert_eq!(detector.detect("dune part2").as_deref(), Some("2"));
    }

    #[test]
    fn detect_roman() {
        let detector = PartLabelDetector::new().unwrap();
        assert_eq!(detector.detect("Kill Bill Part II").as_deref(), Some("2"));
        assert_eq!(detector.detect("Kill.Bill.PART.IV").as_deref(), Some("4"));
    }

    #[test]
    fn roman_label_inside_a_word_still_counts() {
        let detector = PartLabelDetector::new().unwrap();
        assert_eq!(detector.detect("Partisan").as_deref(), Some("1"));
        assert_eq!(detector.detect("Counterpart.Movie").as_deref(), Some("1000"));
    }

    #[test]
    fn detect_nothing() {
        let detector = PartLabelDetector::new().unwrap();
        assert_eq!(detector.detect("The Matrix"), None);
        assert_eq!(detector.detect("Departed"), None);
    }
}
