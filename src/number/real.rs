use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use astro_float::{BigFloat, Consts, Radix, RoundingMode};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::number::{AngleUnit, Number, NumberError};
use crate::solver::builtins::{self, BuiltinRegistry};

const RM: RoundingMode = RoundingMode::ToEven;

/// Convert decimal digit precision to the working binary precision.
/// astro-float rounds precision up to 64-bit word boundaries, so the
/// bit count is word-aligned with one extra word of guard bits, and
/// never below two words.
fn nominal_bits(precision: usize) -> usize {
  let base_bits =
    (precision as f64 * std::f64::consts::LOG2_10).ceil() as usize;
  (((base_bits + 63) & !63) + 64).max(128)
}

fn consts() -> Result<Consts, NumberError> {
  Consts::new().map_err(|e| {
    NumberError::InvalidOperation(format!("constants cache: {}", e))
  })
}

fn is_well_formed(text: &str) -> bool {
  let t = text.strip_prefix(['+', '-']).unwrap_or(text);
  let (mantissa, exponent) = match t.split_once(['e', 'E']) {
    Some((m, e)) => (m, Some(e)),
    None => (t, None),
  };
  let mut digit_seen = false;
  let mut dot_seen = false;
  for c in mantissa.chars() {
    match c {
      '0'..='9' => digit_seen = true,
      '.' if !dot_seen => dot_seen = true,
      _ => return false,
    }
  }
  if !digit_seen {
    return false;
  }
  if let Some(exp) = exponent {
    let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
    if exp.is_empty() || !exp.chars().all(|c| c.is_ascii_digit()) {
      return false;
    }
  }
  true
}

/// Arbitrary-precision decimal number.
///
/// Carries a significant-decimal-digit precision that every operation
/// propagates: binary operations work at the larger of the two
/// operand precisions, unary operations keep their operand's.
/// Unlike the exact kinds, a `Real` can be in a not-a-number state
/// (for example `sqrt(-1)`); the state is queryable, survives
/// arithmetic, and prints as `NaN`.
#[derive(Debug, Clone)]
pub struct Real {
  value: BigFloat,
  precision: usize,
}

impl Real {
  pub fn new(value: BigFloat, precision: usize) -> Self {
    Real { value, precision }
  }

  /// Re-round an existing value to a new precision.
  pub fn with_precision(&self, precision: usize) -> Self {
    let bits = nominal_bits(precision);
    Real {
      value: self.value.add(&BigFloat::from_i128(0, bits), bits, RM),
      precision,
    }
  }

  pub fn pi(precision: usize) -> Result<Self, NumberError> {
    let bits = nominal_bits(precision);
    Ok(Real {
      value: consts()?.pi(bits, RM),
      precision,
    })
  }

  pub fn e(precision: usize) -> Result<Self, NumberError> {
    let bits = nominal_bits(precision);
    Ok(Real {
      value: consts()?.e(bits, RM),
      precision,
    })
  }

  pub fn sqrt(&self) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    Ok(Real {
      value: self.value.sqrt(bits, RM),
      precision: self.precision,
    })
  }

  pub fn exp(&self) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    Ok(Real {
      value: self.value.exp(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn ln(&self) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    Ok(Real {
      value: self.value.ln(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn lg(&self) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    Ok(Real {
      value: self.value.log10(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn sin(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let arg = self.in_radians(unit, &mut cc)?;
    Ok(Real {
      value: arg.sin(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn cos(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let arg = self.in_radians(unit, &mut cc)?;
    Ok(Real {
      value: arg.cos(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn tan(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let arg = self.in_radians(unit, &mut cc)?;
    Ok(Real {
      value: arg.tan(bits, RM, &mut cc),
      precision: self.precision,
    })
  }

  pub fn asin(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let angle = self.value.asin(bits, RM, &mut cc);
    self.angle_result(angle, unit, &mut cc)
  }

  pub fn acos(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let angle = self.value.acos(bits, RM, &mut cc);
    self.angle_result(angle, unit, &mut cc)
  }

  pub fn atan(&self, unit: AngleUnit) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let mut cc = consts()?;
    let angle = self.value.atan(bits, RM, &mut cc);
    self.angle_result(angle, unit, &mut cc)
  }

  /// Forward trig arguments: degrees scale by pi/180 on the way in.
  fn in_radians(
    &self,
    unit: AngleUnit,
    cc: &mut Consts,
  ) -> Result<BigFloat, NumberError> {
    match unit {
      AngleUnit::Radian => Ok(self.value.clone()),
      AngleUnit::Degree => {
        let bits = nominal_bits(self.precision);
        let pi = cc.pi(bits, RM);
        let half_turn = BigFloat::from_i128(180, bits);
        Ok(self.value.mul(&pi.div(&half_turn, bits, RM), bits, RM))
      }
    }
  }

  /// Inverse trig results: radians scale by 180/pi on the way out.
  fn angle_result(
    &self,
    angle: BigFloat,
    unit: AngleUnit,
    cc: &mut Consts,
  ) -> Result<Self, NumberError> {
    let bits = nominal_bits(self.precision);
    let value = match unit {
      AngleUnit::Radian => angle,
      AngleUnit::Degree => {
        let pi = cc.pi(bits, RM);
        let half_turn = BigFloat::from_i128(180, bits);
        angle.mul(&half_turn.div(&pi, bits, RM), bits, RM)
      }
    };
    Ok(Real {
      value,
      precision: self.precision,
    })
  }

  /// Mantissa, binary shift and sign of a finite value. The value is
  /// `mantissa * 2^shift`, negated when the flag is set.
  fn mantissa_parts(&self) -> Option<(BigUint, i64, bool)> {
    let (words, sig_bits, sign, exponent, _inexact) =
      self.value.as_raw_parts()?;
    if sig_bits == 0 || words.iter().all(|&w| w == 0) {
      return Some((BigUint::zero(), 0, false));
    }
    let mantissa = BigUint::from_bytes_le(
      &words
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect::<Vec<u8>>(),
    );
    let shift = exponent as i64 - (words.len() * 64) as i64;
    Some((mantissa, shift, sign.is_negative()))
  }

  /// Machine integer value, rejecting fractional input. Used by the
  /// operations that require an integral argument.
  fn integral_i64(&self) -> Result<i64, NumberError> {
    let (mantissa, shift, negative) = self.mantissa_parts().ok_or_else(|| {
      NumberError::InvalidOperation("value is not integral".into())
    })?;
    if mantissa.is_zero() {
      return Ok(0);
    }
    let int = if shift >= 0 {
      if mantissa.bits() as i64 + shift > 63 {
        return Err(NumberError::OutOfRange);
      }
      &mantissa << (shift as u64)
    } else {
      let s = (-shift) as u64;
      let frac = &mantissa % (BigUint::from(1u32) << s);
      if !frac.is_zero() {
        return Err(NumberError::InvalidOperation(
          "value is not integral".into(),
        ));
      }
      &mantissa >> s
    };
    let v = int.to_i64().ok_or(NumberError::OutOfRange)?;
    Ok(if negative { -v } else { v })
  }

  /// Decimal rendering at the value's own precision. Guard bits past
  /// the significant digit count are rounded away, not truncated, so
  /// `0.1` prints back as `0.1`.
  fn format_decimal(&self) -> String {
    let Some((mantissa, shift, negative)) = self.mantissa_parts() else {
      return "NaN".to_string();
    };
    if mantissa.is_zero() {
      return "0".to_string();
    }
    let max_digits = self.precision.max(1);
    let target_digits = max_digits + 5;

    let (digit_str, decimal_exp) = if shift >= 0 {
      let s = (&mantissa << (shift as u64)).to_string();
      let len = s.len() as i64;
      (s, len)
    } else {
      // Scale so the quotient keeps roughly target_digits significant
      // digits whatever the magnitude of the value.
      let exponent = mantissa.bits() as i64 + shift;
      let e10 = (exponent as f64 * std::f64::consts::LOG10_2).floor() as i64;
      let scale_pow = target_digits as i64 - e10;
      let ten = BigUint::from(10u32);
      let two_shift = BigUint::from(1u32) << ((-shift) as u64);
      let (num, den) = if scale_pow >= 0 {
        (&mantissa * ten.pow(scale_pow as u32), two_shift)
      } else {
        (mantissa.clone(), two_shift * ten.pow((-scale_pow) as u32))
      };
      let result = (&num + (&den >> 1u32)) / &den;
      if result.is_zero() {
        return "0".to_string();
      }
      let s = result.to_string();
      let decimal_exp = s.len() as i64 - scale_pow;
      (s, decimal_exp)
    };

    let (digit_str, decimal_exp) =
      round_digit_str(&digit_str, max_digits, decimal_exp);
    let prefix = if negative { "-" } else { "" };

    if decimal_exp <= 0 {
      let zeros = (-decimal_exp) as usize;
      let frac = format!("{}{}", "0".repeat(zeros), digit_str);
      let frac = frac.trim_end_matches('0');
      if frac.is_empty() {
        "0".to_string()
      } else {
        format!("{}0.{}", prefix, frac)
      }
    } else {
      let dp = decimal_exp as usize;
      if dp >= digit_str.len() {
        format!("{}{}{}", prefix, digit_str, "0".repeat(dp - digit_str.len()))
      } else {
        let int_part = &digit_str[..dp];
        let frac_part = digit_str[dp..].trim_end_matches('0');
        if frac_part.is_empty() {
          format!("{}{}", prefix, int_part)
        } else {
          format!("{}{}.{}", prefix, int_part, frac_part)
        }
      }
    }
  }
}

/// Round a digit string to `max` significant digits. Returns the
/// digits and the decimal exponent, bumped when a carry rolls all
/// nines over.
fn round_digit_str(digits: &str, max: usize, decimal_exp: i64) -> (String, i64) {
  if digits.len() <= max {
    return (digits.to_string(), decimal_exp);
  }
  let kept = &digits.as_bytes()[..max];
  if digits.as_bytes()[max] < b'5' {
    return (
      String::from_utf8_lossy(kept).into_owned(),
      decimal_exp,
    );
  }
  let mut bytes = kept.to_vec();
  let mut i = bytes.len();
  loop {
    if i == 0 {
      let mut rolled = vec![b'0'; max];
      rolled[0] = b'1';
      return (String::from_utf8_lossy(&rolled).into_owned(), decimal_exp + 1);
    }
    i -= 1;
    if bytes[i] == b'9' {
      bytes[i] = b'0';
    } else {
      bytes[i] += 1;
      break;
    }
  }
  (String::from_utf8_lossy(&bytes).into_owned(), decimal_exp)
}

impl Default for Real {
  fn default() -> Self {
    <Real as Number>::zero(crate::number::DEFAULT_PRECISION)
  }
}

impl fmt::Display for Real {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.value.is_nan() {
      return write!(f, "NaN");
    }
    if self.value.is_inf() {
      return if self.value.is_negative() {
        write!(f, "-Inf")
      } else {
        write!(f, "Inf")
      };
    }
    write!(f, "{}", self.format_decimal())
  }
}

impl PartialEq for Real {
  fn eq(&self, other: &Self) -> bool {
    self.value == other.value
  }
}

impl PartialOrd for Real {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    self.value.partial_cmp(&other.value)
  }
}

impl Add for Real {
  type Output = Real;

  fn add(self, rhs: Self) -> Real {
    let precision = self.precision.max(rhs.precision);
    let bits = nominal_bits(precision);
    Real {
      value: self.value.add(&rhs.value, bits, RM),
      precision,
    }
  }
}

impl Sub for Real {
  type Output = Real;

  fn sub(self, rhs: Self) -> Real {
    let precision = self.precision.max(rhs.precision);
    let bits = nominal_bits(precision);
    Real {
      value: self.value.sub(&rhs.value, bits, RM),
      precision,
    }
  }
}

impl Mul for Real {
  type Output = Real;

  fn mul(self, rhs: Self) -> Real {
    let precision = self.precision.max(rhs.precision);
    let bits = nominal_bits(precision);
    Real {
      value: self.value.mul(&rhs.value, bits, RM),
      precision,
    }
  }
}

impl Neg for Real {
  type Output = Real;

  fn neg(self) -> Real {
    Real {
      value: self.value.neg(),
      precision: self.precision,
    }
  }
}

impl Add<i64> for Real {
  type Output = Real;

  fn add(self, rhs: i64) -> Real {
    let bits = nominal_bits(self.precision);
    Real {
      value: self
        .value
        .add(&BigFloat::from_i128(rhs as i128, bits), bits, RM),
      precision: self.precision,
    }
  }
}

impl Sub<i64> for Real {
  type Output = Real;

  fn sub(self, rhs: i64) -> Real {
    let bits = nominal_bits(self.precision);
    Real {
      value: self
        .value
        .sub(&BigFloat::from_i128(rhs as i128, bits), bits, RM),
      precision: self.precision,
    }
  }
}

impl Mul<i64> for Real {
  type Output = Real;

  fn mul(self, rhs: i64) -> Real {
    let bits = nominal_bits(self.precision);
    Real {
      value: self
        .value
        .mul(&BigFloat::from_i128(rhs as i128, bits), bits, RM),
      precision: self.precision,
    }
  }
}

impl AddAssign for Real {
  fn add_assign(&mut self, rhs: Self) {
    *self = self.clone() + rhs;
  }
}

impl SubAssign for Real {
  fn sub_assign(&mut self, rhs: Self) {
    *self = self.clone() - rhs;
  }
}

impl MulAssign for Real {
  fn mul_assign(&mut self, rhs: Self) {
    *self = self.clone() * rhs;
  }
}

impl PartialEq<i64> for Real {
  fn eq(&self, other: &i64) -> bool {
    let bits = nominal_bits(self.precision);
    self.value == BigFloat::from_i128(*other as i128, bits)
  }
}

impl Number for Real {
  fn zero(precision: usize) -> Self {
    Real {
      value: BigFloat::from_i128(0, nominal_bits(precision)),
      precision,
    }
  }

  fn one(precision: usize) -> Self {
    Real {
      value: BigFloat::from_i128(1, nominal_bits(precision)),
      precision,
    }
  }

  fn from_i64(n: i64, precision: usize) -> Self {
    Real {
      value: BigFloat::from_i128(n as i128, nominal_bits(precision)),
      precision,
    }
  }

  fn parse(text: &str, precision: usize) -> Result<Self, NumberError> {
    if !is_well_formed(text) {
      return Err(NumberError::InvalidFormat(text.to_string()));
    }
    let bits = nominal_bits(precision);
    let mut cc = consts()?;
    let value = BigFloat::parse(text, Radix::Dec, bits, RM, &mut cc);
    if value.is_nan() {
      return Err(NumberError::InvalidFormat(text.to_string()));
    }
    Ok(Real { value, precision })
  }

  fn div(&self, rhs: &Self) -> Result<Self, NumberError> {
    if rhs.value.is_zero() {
      return Err(NumberError::DivisionByZero);
    }
    let precision = self.precision.max(rhs.precision);
    let bits = nominal_bits(precision);
    Ok(Real {
      value: self.value.div(&rhs.value, bits, RM),
      precision,
    })
  }

  fn rem(&self, _rhs: &Self) -> Result<Self, NumberError> {
    Err(NumberError::InvalidOperation(
      "modulo is not defined for real values".into(),
    ))
  }

  fn pow(&self, exp: &Self) -> Result<Self, NumberError> {
    let precision = self.precision.max(exp.precision);
    let bits = nominal_bits(precision);
    let mut cc = consts()?;
    Ok(Real {
      value: self.value.pow(&exp.value, bits, RM, &mut cc),
      precision,
    })
  }

  fn abs(&self) -> Self {
    Real {
      value: self.value.abs(),
      precision: self.precision,
    }
  }

  fn factorial(&self) -> Result<Self, NumberError> {
    let n = self.integral_i64()?;
    if n < 0 {
      return Err(NumberError::InvalidOperation(
        "factorial of a negative value".into(),
      ));
    }
    let bits = nominal_bits(self.precision);
    let mut result = BigFloat::from_i128(1, bits);
    for i in 2..=n {
      result = result.mul(&BigFloat::from_i128(i as i128, bits), bits, RM);
    }
    Ok(Real {
      value: result,
      precision: self.precision,
    })
  }

  fn is_nan(&self) -> bool {
    self.value.is_nan()
  }

  fn to_i64(&self) -> Result<i64, NumberError> {
    let (mantissa, shift, negative) =
      self.mantissa_parts().ok_or(NumberError::OutOfRange)?;
    if mantissa.is_zero() {
      return Ok(0);
    }
    let int = if shift >= 0 {
      if mantissa.bits() as i64 + shift > 63 {
        return Err(NumberError::OutOfRange);
      }
      &mantissa << (shift as u64)
    } else {
      &mantissa >> ((-shift) as u64)
    };
    let v = int.to_i64().ok_or(NumberError::OutOfRange)?;
    Ok(if negative { -v } else { v })
  }

  fn precision(&self) -> Option<usize> {
    Some(self.precision)
  }

  fn builtins() -> &'static BuiltinRegistry<Self> {
    builtins::real_builtins()
  }
}
