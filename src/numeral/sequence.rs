//! Label sequence generation

use super::codec::{detect_numeral_type, int_to_roman, roman_to_int, NumeralType};
use crate::error::{Result, ValidationError};

/// Most labels a single generated sequence may hold
pub const MAX_SEQUENCE_LENGTH: i64 = 1_000_000;

fn check_count(count: i64) -> Result<()> {
    if count < 0 {
        return Err(ValidationError::NegativeCount(count));
    }
    if count > MAX_SEQUENCE_LENGTH {
        return Err(ValidationError::CountTooLarge {
            count,
            max: MAX_SEQUENCE_LENGTH,
        });
    }
    Ok(())
}

/// Generate `count` consecutive Arabic labels starting at `start`
///
/// `start=12, count=3` yields `["12", "13", "14"]`.
pub fn generate_arabic_numerals(start: i64, count: i64) -> Result<Vec<String>> {
    check_count(count)?;
    if count > 0 && start.checked_add(count - 1).is_none() {
        return Err(ValidationError::SequenceOverflow { start, count });
    }

    Ok((0..count).map(|i| (start + i).to_string()).collect())
}

/// Generate `count` consecutive lowercase Roman labels starting at `start`
///
/// `start` is itself a Roman numeral in any case: `start="vii", count=3`
/// yields `["vii", "viii", "ix"]`.
pub fn generate_roman_numerals(start: &str, count: i64) -> Result<Vec<String>> {
    let first = roman_to_int(start)
        .ok_or_else(|| ValidationError::InvalidRomanNumeral(start.to_string()))?;
    check_count(count)?;

    (0..count)
        .map(|i| {
            let value = i64::from(first) + i;
            u32::try_from(value)
                .ok()
                .and_then(int_to_roman)
                .ok_or(ValidationError::RomanOutOfRange(value))
        })
        .collect()
}

/// Split a comma-separated label list
///
/// Tokens are trimmed and empty tokens dropped; content is not validated
/// since arbitrary labels are free text ("10a", "A-1").
pub fn parse_arbitrary_sequence(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check whether labels form a continuous +1 progression
///
/// All values must share one generable type (Arabic or Roman). Fewer than
/// two values are trivially continuous.
pub fn detect_sequence_continuity<S: AsRef<str>>(values: &[S]) -> bool {
    if values.len() < 2 {
        return true;
    }

    let first_type = detect_numeral_type(values[0].as_ref());
    if values
        .iter()
        .any(|v| detect_numeral_type(v.as_ref()) != first_type)
    {
        return false;
    }

    let numbers: Option<Vec<i64>> = match first_type {
        NumeralType::Arabic => values.iter().map(|v| v.as_ref().parse().ok()).collect(),
        NumeralType::Roman => values
            .iter()
            .map(|v| roman_to_int(v.as_ref()).map(i64::from))
            .collect(),
        NumeralType::Arbitrary => None,
    };

    match numbers {
        Some(numbers) => numbers.windows(2).all(|w| w[1] == w[0] + 1),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_arabic() {
        assert_eq!(
            generate_arabic_numerals(5, 4).unwrap(),
            vec!["5", "6", "7", "8"]
        );
        assert_eq!(
            generate_arabic_numerals(12, 3).unwrap(),
            vec!["12", "13", "14"]
        );
        assert!(generate_arabic_numerals(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_generate_arabic_negative_count() {
        assert_eq!(
            generate_arabic_numerals(1, -1),
            Err(ValidationError::NegativeCount(-1))
        );
    }

    #[test]
    fn test_generate_arabic_count_too_large() {
        assert_eq!(
            generate_arabic_numerals(1, i64::MAX),
            Err(ValidationError::CountTooLarge {
                count: i64::MAX,
                max: MAX_SEQUENCE_LENGTH
            })
        );
        assert!(generate_roman_numerals("i", MAX_SEQUENCE_LENGTH + 1).is_err());
        assert_eq!(
            generate_arabic_numerals(1, MAX_SEQUENCE_LENGTH).unwrap().len(),
            MAX_SEQUENCE_LENGTH as usize
        );
    }

    #[test]
    fn test_generate_arabic_overflow() {
        assert!(matches!(
            generate_arabic_numerals(i64::MAX, 2),
            Err(ValidationError::SequenceOverflow { .. })
        ));
        assert_eq!(generate_arabic_numerals(i64::MAX, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_generate_roman() {
        assert_eq!(
            generate_roman_numerals("iv", 3).unwrap(),
            vec!["iv", "v", "vi"]
        );
        assert_eq!(
            generate_roman_numerals("vii", 3).unwrap(),
            vec!["vii", "viii", "ix"]
        );
        assert_eq!(
            generate_roman_numerals("XXXVIII", 3).unwrap(),
            vec!["xxxviii", "xxxix", "xl"]
        );
    }

    #[test]
    fn test_generate_roman_invalid_start() {
        assert_eq!(
            generate_roman_numerals("iiii", 2),
            Err(ValidationError::InvalidRomanNumeral("iiii".to_string()))
        );
        assert!(generate_roman_numerals("", 1).is_err());
        assert!(generate_roman_numerals("12", 1).is_err());
    }

    #[test]
    fn test_generate_roman_past_limit() {
        assert_eq!(
            generate_roman_numerals("mmmcmxcviii", 3),
            Err(ValidationError::RomanOutOfRange(4000))
        );
    }

    #[test]
    fn test_generate_roman_negative_count() {
        assert_eq!(
            generate_roman_numerals("i", -2),
            Err(ValidationError::NegativeCount(-2))
        );
    }

    #[test]
    fn test_parse_arbitrary_sequence() {
        assert_eq!(
            parse_arbitrary_sequence(" 10a, 10b ,11"),
            vec!["10a", "10b", "11"]
        );
        assert_eq!(parse_arbitrary_sequence(",A-1,,B-2,"), vec!["A-1", "B-2"]);
        assert!(parse_arbitrary_sequence("").is_empty());
    }

    #[test]
    fn test_sequence_continuity() {
        assert!(detect_sequence_continuity(&["1", "2", "3"]));
        assert!(detect_sequence_continuity(&["viii", "ix", "x"]));
        assert!(detect_sequence_continuity(&["7"]));
        assert!(detect_sequence_continuity::<&str>(&[]));
        assert!(!detect_sequence_continuity(&["1", "3"]));
        assert!(!detect_sequence_continuity(&["ix", "1"]));
        assert!(!detect_sequence_continuity(&["a", "b"]));
    }
}
