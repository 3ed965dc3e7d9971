use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::number::{
  AngleUnit, Integer, Number, NumberError, Rational, Real,
};

/// One fixed call shape of a builtin entry. Every name maps to
/// exactly one shape; the solver checks the call arity against that
/// shape and dispatches with a single match.
pub enum Builtin<N> {
  /// Zero-argument value producer.
  Constant(fn() -> Result<N, NumberError>),
  /// Zero-argument producer depending on the session precision.
  PrecisionConstant(fn(usize) -> Result<N, NumberError>),
  Unary(fn(&N) -> Result<N, NumberError>),
  Binary(fn(&N, &N) -> Result<N, NumberError>),
  /// Unary function taking an angular unit. Registered for the real
  /// kind only; the solver fixes the unit to radians.
  Angular(fn(&N, AngleUnit) -> Result<N, NumberError>),
}

/// Name to builtin mapping for one number kind. The three process
/// wide registries live behind `LazyLock` statics and are read-only
/// after initialization, so concurrent solver instances share them
/// without locking.
pub struct BuiltinRegistry<N> {
  entries: HashMap<&'static str, Builtin<N>>,
}

impl<N> BuiltinRegistry<N> {
  pub fn new() -> Self {
    BuiltinRegistry {
      entries: HashMap::new(),
    }
  }

  pub fn insert(&mut self, name: &'static str, builtin: Builtin<N>) {
    self.entries.insert(name, builtin);
  }

  pub fn get(&self, name: &str) -> Option<&Builtin<N>> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }
}

impl<N> Default for BuiltinRegistry<N> {
  fn default() -> Self {
    Self::new()
  }
}

fn abs<N: Number>(a: &N) -> Result<N, NumberError> {
  Ok(a.abs())
}

fn pow<N: Number>(a: &N, b: &N) -> Result<N, NumberError> {
  a.pow(b)
}

fn fact<N: Number>(a: &N) -> Result<N, NumberError> {
  a.factorial()
}

fn min<N: Number>(a: &N, b: &N) -> Result<N, NumberError> {
  Ok(match a.compare(b)? {
    Ordering::Greater => b.clone(),
    _ => a.clone(),
  })
}

fn max<N: Number>(a: &N, b: &N) -> Result<N, NumberError> {
  Ok(match a.compare(b)? {
    Ordering::Less => b.clone(),
    _ => a.clone(),
  })
}

static INTEGER_BUILTINS: LazyLock<BuiltinRegistry<Integer>> =
  LazyLock::new(|| {
    let mut reg = BuiltinRegistry::new();
    reg.insert("abs", Builtin::Unary(abs::<Integer>));
    reg.insert("pow", Builtin::Binary(pow::<Integer>));
    reg.insert("fact", Builtin::Unary(fact::<Integer>));
    reg.insert("gcd", Builtin::Binary(|a, b| Ok(a.gcd(b))));
    reg.insert("min", Builtin::Binary(min::<Integer>));
    reg.insert("max", Builtin::Binary(max::<Integer>));
    reg
  });

static RATIONAL_BUILTINS: LazyLock<BuiltinRegistry<Rational>> =
  LazyLock::new(|| {
    let mut reg = BuiltinRegistry::new();
    reg.insert("abs", Builtin::Unary(abs::<Rational>));
    reg.insert("pow", Builtin::Binary(pow::<Rational>));
    reg.insert("fact", Builtin::Unary(fact::<Rational>));
    reg.insert("min", Builtin::Binary(min::<Rational>));
    reg.insert("max", Builtin::Binary(max::<Rational>));
    reg
  });

static REAL_BUILTINS: LazyLock<BuiltinRegistry<Real>> = LazyLock::new(|| {
  let mut reg = BuiltinRegistry::new();
  reg.insert("abs", Builtin::Unary(abs::<Real>));
  reg.insert("pow", Builtin::Binary(pow::<Real>));
  reg.insert("fact", Builtin::Unary(fact::<Real>));
  reg.insert("min", Builtin::Binary(min::<Real>));
  reg.insert("max", Builtin::Binary(max::<Real>));
  reg.insert("sqrt", Builtin::Unary(|a| a.sqrt()));
  reg.insert("exp", Builtin::Unary(|a| a.exp()));
  reg.insert("ln", Builtin::Unary(|a| a.ln()));
  reg.insert("lg", Builtin::Unary(|a| a.lg()));
  reg.insert("sin", Builtin::Angular(|a, unit| a.sin(unit)));
  reg.insert("cos", Builtin::Angular(|a, unit| a.cos(unit)));
  reg.insert("tan", Builtin::Angular(|a, unit| a.tan(unit)));
  reg.insert("asin", Builtin::Angular(|a, unit| a.asin(unit)));
  reg.insert("acos", Builtin::Angular(|a, unit| a.acos(unit)));
  reg.insert("atan", Builtin::Angular(|a, unit| a.atan(unit)));
  reg.insert("pi", Builtin::PrecisionConstant(Real::pi));
  reg.insert("e", Builtin::PrecisionConstant(Real::e));
  reg
});

pub fn integer_builtins() -> &'static BuiltinRegistry<Integer> {
  &INTEGER_BUILTINS
}

pub fn rational_builtins() -> &'static BuiltinRegistry<Rational> {
  &RATIONAL_BUILTINS
}

pub fn real_builtins() -> &'static BuiltinRegistry<Real> {
  &REAL_BUILTINS
}
