//! Permutations of the ten digits.

use core::{fmt, str::FromStr};
use std::error;

use rand::{Rng, seq::SliceRandom};

use crate::glyph::DIGIT_COUNT;

/// A bijection from the ten digits to themselves.
///
/// Digit `i` of the permutation is the digit whose artwork the glyph of `i` draws, so text
/// containing `i` is displayed as that digit.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Permutation([u8; DIGIT_COUNT]);

impl Permutation {
    /// The [`Permutation`] that maps every digit to itself.
    pub const IDENTITY: Self = Self([0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

    /// Draws a uniformly random [`Permutation`] from `rng`. The identity is a possible result.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = Self::IDENTITY.0;
        digits.shuffle(rng);
        Self(digits)
    }

    /// Creates a [`Permutation`] from its digits.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePermutationError`] if a value is not a digit or appears more than once.
    pub fn from_digits(digits: [u8; DIGIT_COUNT]) -> Result<Self, ParsePermutationError> {
        let mut seen = [false; DIGIT_COUNT];
        for digit in digits {
            let Some(slot) = seen.get_mut(usize::from(digit)) else {
                return Err(ParsePermutationError::OutOfRange(digit));
            };
            if *slot {
                return Err(ParsePermutationError::DuplicateDigit(digit));
            }
            *slot = true;
        }

        Ok(Self(digits))
    }

    /// Returns the digits of the [`Permutation`].
    pub const fn digits(&self) -> [u8; DIGIT_COUNT] {
        self.0
    }

    /// Returns the digit that `digit` is displayed as, or `None` if `digit` is not below ten.
    pub fn get(&self, digit: usize) -> Option<usize> {
        self.0.get(digit).copied().map(usize::from)
    }

    /// Maps every ASCII digit of `text` to the digit it is displayed as. Other characters are
    /// passed through unchanged.
    pub fn decode(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c.to_digit(10) {
                Some(digit) => char::from(b'0' + self.0[digit as usize]),
                None => c,
            })
            .collect()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{digit}")?;
        }

        Ok(())
    }
}

impl FromStr for Permutation {
    type Err = ParsePermutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != DIGIT_COUNT {
            return Err(ParsePermutationError::InvalidLength(length));
        }

        let mut digits = [0; DIGIT_COUNT];
        for (slot, c) in digits.iter_mut().zip(s.chars()) {
            if !c.is_ascii_digit() {
                return Err(ParsePermutationError::InvalidDigit(c));
            }
            *slot = c as u8 - b'0';
        }

        Self::from_digits(digits)
    }
}

/// Various errors that can occur while parsing a [`Permutation`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ParsePermutationError {
    /// The permutation does not have exactly ten digits.
    InvalidLength(usize),
    /// The permutation contains something other than a decimal digit.
    InvalidDigit(char),
    /// The value is not a digit below ten.
    OutOfRange(u8),
    /// The digit appears more than once.
    DuplicateDigit(u8),
}

impl fmt::Display for ParsePermutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(length) => {
                write!(f, "expected {DIGIT_COUNT} digits, found {length}")
            }
            Self::InvalidDigit(c) => write!(f, "{c:?} is not a decimal digit"),
            Self::OutOfRange(value) => write!(f, "{value} is not a digit"),
            Self::DuplicateDigit(digit) => write!(f, "digit {digit} appears more than once"),
        }
    }
}

impl error::Error for ParsePermutationError {}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn random_permutations_are_bijections() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..100 {
            let permutation = Permutation::random(&mut rng);
            let mut digits = permutation.digits();
            digits.sort_unstable();
            assert_eq!(digits, Permutation::IDENTITY.digits());
        }
    }

    #[test]
    fn seeded_draws_repeat() {
        let first = Permutation::random(&mut StdRng::seed_from_u64(42));
        let second = Permutation::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn parses_and_displays() {
        let permutation = "3901827465".parse::<Permutation>().unwrap();

        assert_eq!(permutation.digits(), [3, 9, 0, 1, 8, 2, 7, 4, 6, 5]);
        assert_eq!(permutation.to_string(), "3901827465");
        assert_eq!(permutation.get(1), Some(9));
        assert_eq!(permutation.get(10), None);
    }

    #[test]
    fn rejects_invalid_permutations() {
        assert_eq!(
            "012345678".parse::<Permutation>(),
            Err(ParsePermutationError::InvalidLength(9))
        );
        assert_eq!(
            "01234567a9".parse::<Permutation>(),
            Err(ParsePermutationError::InvalidDigit('a'))
        );
        assert_eq!(
            "0123456788".parse::<Permutation>(),
            Err(ParsePermutationError::DuplicateDigit(8))
        );
        assert_eq!(
            Permutation::from_digits([0, 1, 2, 3, 4, 5, 6, 7, 8, 10]),
            Err(ParsePermutationError::OutOfRange(10))
        );
    }

    #[test]
    fn decodes_displayed_digits() {
        let permutation = "3901827465".parse::<Permutation>().unwrap();

        assert_eq!(permutation.decode("1,024"), "9,308");
        assert_eq!(permutation.decode("no digits"), "no digits");
        assert_eq!(Permutation::IDENTITY.decode("0123456789"), "0123456789");
    }
}
