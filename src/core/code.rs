//! The 3-distinct-digit rule shared by secrets and guesses

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in every secret and guess
pub const CODE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("must be exactly 3 digits")]
    NotThreeDigits,
    #[error("digits must all be different")]
    RepeatedDigit,
}

/// What the code is being used as; only changes the wording of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Secret,
    Guess,
}

impl CodeError {
    /// Human-readable message for the shared message region.
    pub fn message(&self, kind: CodeKind) -> String {
        match (kind, self) {
            (CodeKind::Secret, CodeError::NotThreeDigits) => "The secret number must be 3 digits.".into(),
            (CodeKind::Secret, CodeError::RepeatedDigit) => "The digits of the secret number must be different.".into(),
            (CodeKind::Guess, CodeError::NotThreeDigits) => "Please enter 3 digits.".into(),
            (CodeKind::Guess, CodeError::RepeatedDigit) => "The digits in your guess must be different.".into(),
        }
    }
}

/// Checks shape first (3 ASCII digits), then pairwise distinctness.
pub fn check_code(s: &str) -> Result<(), CodeError> {
    if s.len() != CODE_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodeError::NotThreeDigits);
    }
    if s.bytes().collect::<HashSet<_>>().len() != CODE_LEN {
        return Err(CodeError::RepeatedDigit);
    }
    Ok(())
}

pub fn is_valid_code(s: &str) -> bool {
    check_code(s).is_ok()
}

/// A validated secret or guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(String);

impl Code {
    pub fn parse(s: &str) -> Result<Self, CodeError> {
        let s = s.trim();
        check_code(s)?;
        Ok(Self(s.to_string()))
    }

    /// Random code with distinct digits and a non-zero leading digit.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits: Vec<u8> = (b'0'..=b'9').collect();
        digits.shuffle(rng);
        if digits[0] == b'0' {
            digits.swap(0, CODE_LEN);
        }
        Self(digits[..CODE_LEN].iter().map(|&d| d as char).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_code(&value)?;
        Ok(Self(value))
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn accepts_three_distinct_digits() {
        assert!(is_valid_code("123"));
        assert!(is_valid_code("098"));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(check_code("112"), Err(CodeError::RepeatedDigit));
        assert_eq!(check_code("12a"), Err(CodeError::NotThreeDigits));
        assert_eq!(check_code("12"), Err(CodeError::NotThreeDigits));
        assert_eq!(check_code("1234"), Err(CodeError::NotThreeDigits));
        assert_eq!(check_code(""), Err(CodeError::NotThreeDigits));
        // non-ASCII digits don't count
        assert_eq!(check_code("١٢٣"), Err(CodeError::NotThreeDigits));
    }

    #[test]
    fn exhaustive_over_all_digit_triples() {
        for n in 0..1000u32 {
            let s = format!("{n:03}");
            let b = s.as_bytes();
            let distinct = b[0] != b[1] && b[0] != b[2] && b[1] != b[2];
            assert_eq!(is_valid_code(&s), distinct, "{s}");
        }
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Code::parse(" 456 ").unwrap().as_str(), "456");
    }

    #[test]
    fn random_codes_are_valid_and_never_lead_with_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let code = Code::random(&mut rng);
            assert!(is_valid_code(code.as_str()));
            assert!(!code.as_str().starts_with('0'));
        }
    }

    #[test]
    fn messages_differ_by_kind() {
        assert_ne!(
            CodeError::RepeatedDigit.message(CodeKind::Secret),
            CodeError::RepeatedDigit.message(CodeKind::Guess)
        );
    }
}
