use std::{cmp::Ordering, fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoverabilityError, CoverabilityResult};

pub const OMEGA_SYMBOL: &str = "ω";
/// Every accepted way of writing ω in a net description, canonical first.
pub const OMEGA_SPELLINGS: [&str; 3] = [OMEGA_SYMBOL, "omega", "w"];

/// A token count extended with ω, the symbol for "unboundedly many".
///
/// ω is strictly greater than every finite value and absorbs finite
/// additions and subtractions. `ω - ω` and anything that would make a
/// finite value negative are rejected by [`ExtendedValue::checked_sub`],
/// a finite sum above `u64::MAX` by [`ExtendedValue::checked_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedValue {
    Finite(u64),
    Omega,
}

impl ExtendedValue {
    pub fn zero() -> Self {
        ExtendedValue::Finite(0)
    }

    pub fn is_omega(&self) -> bool {
        matches!(self, ExtendedValue::Omega)
    }

    /// `self + rhs`, with ω absorbing. Fails when a finite sum does not fit
    /// into a `u64`.
    pub fn checked_add(self, rhs: ExtendedValue) -> CoverabilityResult<ExtendedValue> {
        match (self, rhs) {
            (ExtendedValue::Finite(a), ExtendedValue::Finite(b)) => a
                .checked_add(b)
                .map(ExtendedValue::Finite)
                .ok_or(CoverabilityError::CountOverflow { lhs: self, rhs }),
            (ExtendedValue::Omega, _) | (_, ExtendedValue::Omega) => Ok(ExtendedValue::Omega),
        }
    }

    /// `self - rhs`. Fails when the result would be negative or when ω is
    /// subtracted, since neither can happen for an enabled transition.
    pub fn checked_sub(self, rhs: ExtendedValue) -> CoverabilityResult<ExtendedValue> {
        match (self, rhs) {
            (ExtendedValue::Finite(a), ExtendedValue::Finite(b)) if a >= b => {
                Ok(ExtendedValue::Finite(a - b))
            }
            (ExtendedValue::Omega, ExtendedValue::Finite(_)) => Ok(ExtendedValue::Omega),
            (lhs, rhs) => Err(CoverabilityError::ArithmeticInvariantViolated { lhs, rhs }),
        }
    }
}

impl Default for ExtendedValue {
    fn default() -> Self {
        ExtendedValue::zero()
    }
}

impl Ord for ExtendedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ExtendedValue::Finite(a), ExtendedValue::Finite(b)) => a.cmp(b),
            (ExtendedValue::Finite(_), ExtendedValue::Omega) => Ordering::Less,
            (ExtendedValue::Omega, ExtendedValue::Finite(_)) => Ordering::Greater,
            (ExtendedValue::Omega, ExtendedValue::Omega) => Ordering::Equal,
        }
    }
}

impl PartialOrd for ExtendedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for ExtendedValue {
    fn from(value: u64) -> Self {
        ExtendedValue::Finite(value)
    }
}

impl Display for ExtendedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtendedValue::Finite(n) => write!(f, "{}", n),
            ExtendedValue::Omega => write!(f, "{}", OMEGA_SYMBOL),
        }
    }
}

impl FromStr for ExtendedValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            symbol if OMEGA_SPELLINGS.contains(&symbol) => Ok(ExtendedValue::Omega),
            other => other
                .parse::<u64>()
                .map(ExtendedValue::Finite)
                .map_err(|_| format!("Invalid token count: {}", other)),
        }
    }
}

impl Serialize for ExtendedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtendedValue::Finite(n) => serializer.serialize_u64(*n),
            ExtendedValue::Omega => serializer.serialize_str(OMEGA_SYMBOL),
        }
    }
}

impl<'de> Deserialize<'de> for ExtendedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u64),
            Symbol(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(ExtendedValue::Finite(n)),
            Repr::Symbol(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[test]
fn test_omega_is_greatest() {
    assert!(ExtendedValue::Omega > ExtendedValue::Finite(u64::MAX));
    assert!(ExtendedValue::Finite(3) < ExtendedValue::Finite(4));
    assert_eq!(ExtendedValue::Omega.cmp(&ExtendedValue::Omega), Ordering::Equal);
}

#[test]
fn test_omega_absorbs_arithmetic() {
    let omega = ExtendedValue::Omega;
    assert_eq!(omega.checked_add(ExtendedValue::Finite(7)).unwrap(), omega);
    assert_eq!(ExtendedValue::Finite(7).checked_add(omega).unwrap(), omega);
    assert_eq!(omega.checked_sub(ExtendedValue::Finite(7)).unwrap(), omega);
    assert_eq!(omega.checked_sub(ExtendedValue::Finite(0)).unwrap(), omega);
}

#[test]
fn test_finite_arithmetic() {
    let a = ExtendedValue::Finite(5);
    assert_eq!(
        a.checked_add(ExtendedValue::Finite(2)).unwrap(),
        ExtendedValue::Finite(7)
    );
    assert_eq!(
        a.checked_sub(ExtendedValue::Finite(5)).unwrap(),
        ExtendedValue::Finite(0)
    );
}

#[test]
fn test_negative_result_is_rejected() {
    let res = ExtendedValue::Finite(1).checked_sub(ExtendedValue::Finite(2));
    assert!(matches!(
        res,
        Err(CoverabilityError::ArithmeticInvariantViolated { .. })
    ));

    let res = ExtendedValue::Omega.checked_sub(ExtendedValue::Omega);
    assert!(matches!(
        res,
        Err(CoverabilityError::ArithmeticInvariantViolated { .. })
    ));
}

#[test]
fn test_parse_and_display() {
    assert_eq!("ω".parse::<ExtendedValue>().unwrap(), ExtendedValue::Omega);
    assert_eq!("w".parse::<ExtendedValue>().unwrap(), ExtendedValue::Omega);
    assert_eq!(" 12 ".parse::<ExtendedValue>().unwrap(), ExtendedValue::Finite(12));
    assert!("-1".parse::<ExtendedValue>().is_err());
    assert_eq!(ExtendedValue::Omega.to_string(), "ω");
    assert_eq!(ExtendedValue::Finite(3).to_string(), "3");
}

#[test]
fn test_sum_above_u64_is_rejected() {
    let res = ExtendedValue::Finite(u64::MAX).checked_add(ExtendedValue::Finite(1));
    assert!(matches!(res, Err(CoverabilityError::CountOverflow { .. })));

    let res = ExtendedValue::Omega.checked_add(ExtendedValue::Finite(u64::MAX));
    assert_eq!(res.unwrap(), ExtendedValue::Omega);
}

#[test]
fn test_omega_spellings() {
    for spelling in OMEGA_SPELLINGS {
        assert_eq!(spelling.parse::<ExtendedValue>(), Ok(ExtendedValue::Omega));
    }
    assert!("Omega".parse::<ExtendedValue>().is_err());
    assert!("-1".parse::<ExtendedValue>().is_err());
}
