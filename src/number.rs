use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use thiserror::Error;

use crate::solver::builtins::BuiltinRegistry;

pub mod integer;
pub mod rational;
pub mod real;

pub use integer::Integer;
pub use rational::Rational;
pub use real::Real;

/// Significant decimal digits used when a session does not configure
/// its own precision. Only `Real` is affected.
pub const DEFAULT_PRECISION: usize = 32;

/// Errors raised inside the numeric layer. They carry no source
/// position; the solver re-attributes them to the node that invoked
/// the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
  #[error("division by zero")]
  DivisionByZero,
  #[error("invalid number format: `{0}`")]
  InvalidFormat(String),
  #[error("invalid operation: {0}")]
  InvalidOperation(String),
  #[error("value does not fit in a machine integer")]
  OutOfRange,
}

/// Angular unit for the trigonometric builtin shape. The solver
/// always passes `Radian`; `Degree` is the conversion hook for front
/// ends that expose a degree mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
  Radian,
  Degree,
}

/// The numeric capability the solver is generic over.
///
/// One implementation per number kind: exact `Integer`, exact
/// `Rational`, precision-bounded `Real`. Arithmetic between two
/// values of the same kind is exact or precision-bounded per kind;
/// kinds are never mixed inside one tree walk.
///
/// `Display` produces the canonical text form and `parse` is its
/// strict inverse: `parse(v.to_string(), p)` reproduces `v` for every
/// value exactly representable at precision `p`.
pub trait Number:
  Clone
  + fmt::Debug
  + fmt::Display
  + PartialEq
  + PartialOrd
  + Add<Output = Self>
  + Sub<Output = Self>
  + Mul<Output = Self>
  + Neg<Output = Self>
  + Sized
  + 'static
{
  fn zero(precision: usize) -> Self;

  fn one(precision: usize) -> Self;

  fn from_i64(n: i64, precision: usize) -> Self;

  /// Strict conversion from text. Malformed input is
  /// `InvalidFormat`; a zero denominator in rational text is
  /// `DivisionByZero`.
  fn parse(text: &str, precision: usize) -> Result<Self, NumberError>;

  /// Fails with `DivisionByZero` on a zero divisor in every kind.
  fn div(&self, rhs: &Self) -> Result<Self, NumberError>;

  /// Remainder. Defined for `Integer` (sign follows the dividend);
  /// the other kinds report `InvalidOperation`.
  fn rem(&self, rhs: &Self) -> Result<Self, NumberError>;

  /// Raise to a power, per kind closure rules: `Integer` requires a
  /// non-negative exponent, `Rational` an integral one (negative
  /// inverts), `Real` is closed.
  fn pow(&self, exp: &Self) -> Result<Self, NumberError>;

  fn abs(&self) -> Self;

  /// Fails with `InvalidOperation` for negative or non-integral
  /// arguments.
  fn factorial(&self) -> Result<Self, NumberError>;

  /// Total order consistent with mathematical value within the kind.
  /// Comparing a not-a-number value is `InvalidOperation`.
  fn compare(&self, rhs: &Self) -> Result<Ordering, NumberError> {
    self.partial_cmp(rhs).ok_or_else(|| {
      NumberError::InvalidOperation(
        "comparison with a not-a-number value".into(),
      )
    })
  }

  /// Whether the value is in the not-a-number state. Always false
  /// for the exact kinds.
  fn is_nan(&self) -> bool {
    false
  }

  /// Truncating conversion to a machine integer; `OutOfRange` when
  /// the value does not fit.
  fn to_i64(&self) -> Result<i64, NumberError>;

  /// Significant-digit precision. `Some` only for `Real`.
  fn precision(&self) -> Option<usize> {
    None
  }

  /// The process-wide builtin table for this kind. Read-only after
  /// first use; shared by all solver instances.
  fn builtins() -> &'static BuiltinRegistry<Self>;
}
