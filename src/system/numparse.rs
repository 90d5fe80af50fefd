use std::num::{IntErrorKind, ParseIntError};

use thiserror::Error;

/// Failure modes of [`str_to_num`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumError {
    #[error("invalid base {0}, expected 2..=36")]
    Param(u32),
    #[error("not a number: {0:?}")]
    Parse(String),
    #[error("numeric overflow: {0:?}")]
    Range(String),
}

/// Integer targets accepted by [`str_to_num`].
pub trait Numeric: Copy {
    const SIGNED: bool;

    fn from_radix(src: &str, radix: u32) -> Result<Self, ParseIntError>;
}

macro_rules! impl_numeric {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl Numeric for $ty {
                const SIGNED: bool = $signed;

                fn from_radix(src: &str, radix: u32) -> Result<Self, ParseIntError> {
                    <$ty>::from_str_radix(src, radix)
                }
            }
        )*
    };
}

impl_numeric!(i32 => true, u32 => false, i64 => true, u64 => false);

/// Strict text-to-integer conversion for kernel-sourced counters.
///
/// Leading and trailing whitespace (including the newline most pseudo-files
/// end with) is accepted. Anything else around the digits, an empty token, or
/// a minus sign on an unsigned target is a [`NumError::Parse`]; magnitude
/// overflow is a [`NumError::Range`].
pub fn str_to_num<T: Numeric>(s: &str, base: u32) -> Result<T, NumError> {
    if !(2..=36).contains(&base) {
        return Err(NumError::Param(base));
    }

    let token = s.trim();
    if token.is_empty() {
        return Err(NumError::Parse(s.to_string()));
    }
    if !T::SIGNED && token.starts_with('-') {
        return Err(NumError::Parse(s.to_string()));
    }

    T::from_radix(token, base).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NumError::Range(s.to_string()),
        _ => NumError::Parse(s.to_string()),
    })
}

/// True when `name` is non-empty and made only of ASCII digits.
pub fn is_numeric_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_surrounding_whitespace() {
        assert_eq!(str_to_num::<u64>("  42\n", 10), Ok(42));
        assert_eq!(str_to_num::<i32>("\t-17 ", 10), Ok(-17));
    }

    #[test]
    fn rejects_minus_for_unsigned() {
        assert!(matches!(str_to_num::<u64>("-5", 10), Err(NumError::Parse(_))));
        assert!(matches!(str_to_num::<u32>(" -0", 10), Err(NumError::Parse(_))));
    }

    #[test]
    fn overflow_is_a_range_error() {
        assert!(matches!(
            str_to_num::<u64>("99999999999999999999", 10),
            Err(NumError::Range(_))
        ));
        assert!(matches!(
            str_to_num::<u32>("4294967296", 10),
            Err(NumError::Range(_))
        ));
        assert!(matches!(
            str_to_num::<i32>("-2147483649", 10),
            Err(NumError::Range(_))
        ));
    }

    #[test]
    fn empty_and_blank_are_parse_errors() {
        assert!(matches!(str_to_num::<i64>("", 10), Err(NumError::Parse(_))));
        assert!(matches!(str_to_num::<i64>("   \n", 10), Err(NumError::Parse(_))));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(matches!(str_to_num::<u64>("12kB", 10), Err(NumError::Parse(_))));
        assert!(matches!(str_to_num::<u64>("1 2", 10), Err(NumError::Parse(_))));
    }

    #[test]
    fn other_bases() {
        assert_eq!(str_to_num::<u32>("ff", 16), Ok(255));
        assert_eq!(str_to_num::<u32>("101", 2), Ok(5));
        assert_eq!(str_to_num::<i64>("z", 36), Ok(35));
        assert!(matches!(str_to_num::<u32>("2", 2), Err(NumError::Parse(_))));
    }

    #[test]
    fn invalid_base_is_a_param_error() {
        assert_eq!(str_to_num::<u32>("1", 1), Err(NumError::Param(1)));
        assert_eq!(str_to_num::<u32>("1", 37), Err(NumError::Param(37)));
    }

    #[test]
    fn numeric_names() {
        assert!(is_numeric_name("1234"));
        assert!(!is_numeric_name(""));
        assert!(!is_numeric_name("self"));
        assert!(!is_numeric_name("12a"));
    }
}
