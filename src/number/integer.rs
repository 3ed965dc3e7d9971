use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::number::{Number, NumberError};
use crate::solver::builtins::{self, BuiltinRegistry};

/// Exact arbitrary-precision integer.
///
/// Division truncates toward zero and the remainder takes the sign of
/// the dividend, so `7 / 2 == 3`, `-7 / 2 == -3`, `7 % 2 == 1` and
/// `-7 % 2 == -1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
  value: BigInt,
}

impl Integer {
  pub fn new(value: BigInt) -> Self {
    Integer { value }
  }

  /// Greatest common divisor, always non-negative.
  pub fn gcd(&self, other: &Integer) -> Integer {
    let mut a = self.value.abs();
    let mut b = other.value.abs();
    while !b.is_zero() {
      let r = &a % &b;
      a = b;
      b = r;
    }
    Integer { value: a }
  }
}

impl From<BigInt> for Integer {
  fn from(value: BigInt) -> Self {
    Integer { value }
  }
}

impl From<i64> for Integer {
  fn from(value: i64) -> Self {
    Integer {
      value: BigInt::from(value),
    }
  }
}

impl fmt::Display for Integer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.value)
  }
}

impl Add for Integer {
  type Output = Integer;

  fn add(self, rhs: Self) -> Integer {
    Integer {
      value: self.value + rhs.value,
    }
  }
}

impl Sub for Integer {
  type Output = Integer;

  fn sub(self, rhs: Self) -> Integer {
    Integer {
      value: self.value - rhs.value,
    }
  }
}

impl Mul for Integer {
  type Output = Integer;

  fn mul(self, rhs: Self) -> Integer {
    Integer {
      value: self.value * rhs.value,
    }
  }
}

impl Neg for Integer {
  type Output = Integer;

  fn neg(self) -> Integer {
    Integer { value: -self.value }
  }
}

impl Add<i64> for Integer {
  type Output = Integer;

  fn add(self, rhs: i64) -> Integer {
    Integer {
      value: self.value + BigInt::from(rhs),
    }
  }
}

impl Sub<i64> for Integer {
  type Output = Integer;

  fn sub(self, rhs: i64) -> Integer {
    Integer {
      value: self.value - BigInt::from(rhs),
    }
  }
}

impl Mul<i64> for Integer {
  type Output = Integer;

  fn mul(self, rhs: i64) -> Integer {
    Integer {
      value: self.value * BigInt::from(rhs),
    }
  }
}

impl AddAssign for Integer {
  fn add_assign(&mut self, rhs: Self) {
    self.value += rhs.value;
  }
}

impl SubAssign for Integer {
  fn sub_assign(&mut self, rhs: Self) {
    self.value -= rhs.value;
  }
}

impl MulAssign for Integer {
  fn mul_assign(&mut self, rhs: Self) {
    self.value *= rhs.value;
  }
}

impl PartialEq<i64> for Integer {
  fn eq(&self, other: &i64) -> bool {
    self.value == BigInt::from(*other)
  }
}

impl Number for Integer {
  fn zero(_precision: usize) -> Self {
    Integer {
      value: BigInt::zero(),
    }
  }

  fn one(_precision: usize) -> Self {
    Integer {
      value: BigInt::from(1),
    }
  }

  fn from_i64(n: i64, _precision: usize) -> Self {
    Integer {
      value: BigInt::from(n),
    }
  }

  fn parse(text: &str, _precision: usize) -> Result<Self, NumberError> {
    BigInt::from_str(text)
      .map(|value| Integer { value })
      .map_err(|_| NumberError::InvalidFormat(text.to_string()))
  }

  fn div(&self, rhs: &Self) -> Result<Self, NumberError> {
    if rhs.value.is_zero() {
      return Err(NumberError::DivisionByZero);
    }
    Ok(Integer {
      value: &self.value / &rhs.value,
    })
  }

  fn rem(&self, rhs: &Self) -> Result<Self, NumberError> {
    if rhs.value.is_zero() {
      return Err(NumberError::DivisionByZero);
    }
    Ok(Integer {
      value: &self.value % &rhs.value,
    })
  }

  fn pow(&self, exp: &Self) -> Result<Self, NumberError> {
    let k = exp.to_i64()?;
    if k < 0 {
      return Err(NumberError::InvalidOperation(
        "integers are not closed under negative powers".into(),
      ));
    }
    Ok(Integer {
      value: num_traits::pow::pow(self.value.clone(), k as usize),
    })
  }

  fn abs(&self) -> Self {
    Integer {
      value: self.value.abs(),
    }
  }

  fn factorial(&self) -> Result<Self, NumberError> {
    let n = self.to_i64()?;
    if n < 0 {
      return Err(NumberError::InvalidOperation(
        "factorial of a negative value".into(),
      ));
    }
    let mut result = BigInt::from(1);
    for i in 2..=n {
      result *= i;
    }
    Ok(Integer { value: result })
  }

  fn compare(&self, rhs: &Self) -> Result<Ordering, NumberError> {
    Ok(self.value.cmp(&rhs.value))
  }

  fn to_i64(&self) -> Result<i64, NumberError> {
    self.value.to_i64().ok_or(NumberError::OutOfRange)
  }

  fn builtins() -> &'static BuiltinRegistry<Self> {
    builtins::integer_builtins()
  }
}
