//! Khmer presentation constants
//!
//! Shared by the bulk-import grammar, the Telegram formatter and the
//! sanitizer. Source text is pasted from word-processed Khmer exam sheets,
//! so the exact marker strings matter.

use phf::phf_map;

/// Placeholder subject label for records that arrive without one.
pub const NO_SUBJECT_PLACEHOLDER: &str = "មិនមានមុខវិជ្ជា";

/// Marker authors put behind the correct option on pasted exam sheets.
pub const CORRECT_ANSWER_MARKER: &str = "(ចម្លើយត្រឹមត្រូវ)";

/// Label that introduces the answer block of a short-answer question.
pub const ANSWER_LABEL: &str = "ចម្លើយ";

/// Option prefixes in the order they appear on printed exam sheets.
pub const OPTION_PREFIXES: [&str; 4] = ["ក", "ខ", "គ", "ឃ"];

/// Latin digit → Khmer digit.
static KHMER_DIGITS: phf::Map<char, char> = phf_map! {
    '0' => '០',
    '1' => '១',
    '2' => '២',
    '3' => '៣',
    '4' => '៤',
    '5' => '៥',
    '6' => '៦',
    '7' => '៧',
    '8' => '៨',
    '9' => '៩',
};

/// Render a number with Khmer numerals (84 → ៨៤).
pub fn to_khmer_numeral(n: usize) -> String {
    n.to_string()
        .chars()
        .map(|c| KHMER_DIGITS.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Prefix for the option at `index`, falling back to Latin numbering past
/// the printed four.
pub fn option_prefix(index: usize) -> String {
    OPTION_PREFIXES
        .get(index)
        .map(|p| (*p).to_string())
        .unwrap_or_else(|| format!("{}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_khmer_numeral_conversion() {
        assert_eq!(to_khmer_numeral(0), "០");
        assert_eq!(to_khmer_numeral(84), "៨៤");
        assert_eq!(to_khmer_numeral(2025), "២០២៥");
    }

    #[test]
    fn test_option_prefix_past_printed_set() {
        assert_eq!(option_prefix(0), "ក");
        assert_eq!(option_prefix(3), "ឃ");
        assert_eq!(option_prefix(4), "5");
    }
}
