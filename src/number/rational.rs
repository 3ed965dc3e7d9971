use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::number::{Number, NumberError};
use crate::solver::builtins::{self, BuiltinRegistry};

/// Exact rational number, always in lowest terms with the sign on
/// the numerator. Construction normalizes, so `2/4` and `1/2` are
/// the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rational {
  value: BigRational,
}

impl Default for Rational {
  fn default() -> Self {
    Rational {
      value: BigRational::zero(),
    }
  }
}

impl Rational {
  /// Fails with `DivisionByZero` on a zero denominator.
  pub fn new(numer: BigInt, denom: BigInt) -> Result<Self, NumberError> {
    if denom.is_zero() {
      return Err(NumberError::DivisionByZero);
    }
    Ok(Rational {
      value: BigRational::new(numer, denom),
    })
  }

  pub fn numer(&self) -> &BigInt {
    self.value.numer()
  }

  pub fn denom(&self) -> &BigInt {
    self.value.denom()
  }

  pub fn is_integer(&self) -> bool {
    self.value.is_integer()
  }
}

impl From<BigInt> for Rational {
  fn from(value: BigInt) -> Self {
    Rational {
      value: BigRational::from_integer(value),
    }
  }
}

impl From<i64> for Rational {
  fn from(value: i64) -> Self {
    Rational {
      value: BigRational::from_integer(BigInt::from(value)),
    }
  }
}

impl fmt::Display for Rational {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.value.is_integer() {
      write!(f, "{}", self.value.numer())
    } else {
      write!(f, "{}/{}", self.value.numer(), self.value.denom())
    }
  }
}

impl Add for Rational {
  type Output = Rational;

  fn add(self, rhs: Self) -> Rational {
    Rational {
      value: self.value + rhs.value,
    }
  }
}

impl Sub for Rational {
  type Output = Rational;

  fn sub(self, rhs: Self) -> Rational {
    Rational {
      value: self.value - rhs.value,
    }
  }
}

impl Mul for Rational {
  type Output = Rational;

  fn mul(self, rhs: Self) -> Rational {
    Rational {
      value: self.value * rhs.value,
    }
  }
}

impl Neg for Rational {
  type Output = Rational;

  fn neg(self) -> Rational {
    Rational { value: -self.value }
  }
}

impl Add<i64> for Rational {
  type Output = Rational;

  fn add(self, rhs: i64) -> Rational {
    Rational {
      value: self.value + BigRational::from_integer(BigInt::from(rhs)),
    }
  }
}

impl Sub<i64> for Rational {
  type Output = Rational;

  fn sub(self, rhs: i64) -> Rational {
    Rational {
      value: self.value - BigRational::from_integer(BigInt::from(rhs)),
    }
  }
}

impl Mul<i64> for Rational {
  type Output = Rational;

  fn mul(self, rhs: i64) -> Rational {
    Rational {
      value: self.value * BigRational::from_integer(BigInt::from(rhs)),
    }
  }
}

impl AddAssign for Rational {
  fn add_assign(&mut self, rhs: Self) {
    self.value += rhs.value;
  }
}

impl SubAssign for Rational {
  fn sub_assign(&mut self, rhs: Self) {
    self.value -= rhs.value;
  }
}

impl MulAssign for Rational {
  fn mul_assign(&mut self, rhs: Self) {
    self.value *= rhs.value;
  }
}

impl PartialEq<i64> for Rational {
  fn eq(&self, other: &i64) -> bool {
    self.value.is_integer() && *self.value.numer() == BigInt::from(*other)
  }
}

impl Number for Rational {
  fn zero(_precision: usize) -> Self {
    Rational {
      value: BigRational::zero(),
    }
  }

  fn one(_precision: usize) -> Self {
    Rational {
      value: BigRational::one(),
    }
  }

  fn from_i64(n: i64, _precision: usize) -> Self {
    Rational::from(n)
  }

  fn parse(text: &str, _precision: usize) -> Result<Self, NumberError> {
    match text.split_once('/') {
      Some((numer, denom)) => {
        let numer = BigInt::from_str(numer)
          .map_err(|_| NumberError::InvalidFormat(text.to_string()))?;
        let denom = BigInt::from_str(denom)
          .map_err(|_| NumberError::InvalidFormat(text.to_string()))?;
        Rational::new(numer, denom)
      }
      None => BigInt::from_str(text)
        .map(Rational::from)
        .map_err(|_| NumberError::InvalidFormat(text.to_string())),
    }
  }

  fn div(&self, rhs: &Self) -> Result<Self, NumberError> {
    if rhs.value.is_zero() {
      return Err(NumberError::DivisionByZero);
    }
    Ok(Rational {
      value: self.value.clone() / rhs.value.clone(),
    })
  }

  fn rem(&self, _rhs: &Self) -> Result<Self, NumberError> {
    Err(NumberError::InvalidOperation(
      "modulo is not defined for rational values".into(),
    ))
  }

  fn pow(&self, exp: &Self) -> Result<Self, NumberError> {
    if !exp.value.is_integer() {
      return Err(NumberError::InvalidOperation(
        "rationals are not closed under fractional powers".into(),
      ));
    }
    let k = exp
      .value
      .to_integer()
      .to_i64()
      .ok_or(NumberError::OutOfRange)?;
    if k >= 0 {
      Ok(Rational {
        value: num_traits::pow::pow(self.value.clone(), k as usize),
      })
    } else {
      if self.value.is_zero() {
        return Err(NumberError::DivisionByZero);
      }
      Ok(Rational {
        value: num_traits::pow::pow(
          self.value.recip(),
          k.unsigned_abs() as usize,
        ),
      })
    }
  }

  fn abs(&self) -> Self {
    if self.value.is_negative() {
      Rational {
        value: -self.value.clone(),
      }
    } else {
      self.clone()
    }
  }

  fn factorial(&self) -> Result<Self, NumberError> {
    if !self.value.is_integer() {
      return Err(NumberError::InvalidOperation(
        "factorial of a non-integral value".into(),
      ));
    }
    let n = self
      .value
      .to_integer()
      .to_i64()
      .ok_or(NumberError::OutOfRange)?;
    if n < 0 {
      return Err(NumberError::InvalidOperation(
        "factorial of a negative value".into(),
      ));
    }
    let mut result = BigInt::from(1);
    for i in 2..=n {
      result *= i;
    }
    Ok(Rational::from(result))
  }

  fn compare(&self, rhs: &Self) -> Result<Ordering, NumberError> {
    Ok(self.value.cmp(&rhs.value))
  }

  fn to_i64(&self) -> Result<i64, NumberError> {
    self
      .value
      .to_integer()
      .to_i64()
      .ok_or(NumberError::OutOfRange)
  }

  fn builtins() -> &'static BuiltinRegistry<Self> {
    builtins::rational_builtins()
  }
}
