use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;

use crate::number::{AngleUnit, Number, NumberError, DEFAULT_PRECISION};
use crate::syntax::{
  BinaryOperator, ComparisonOp, Condition, Expr, SourcePos, Statement,
  UnaryOperator,
};

pub mod builtins;

use builtins::Builtin;

/// Call depth at which evaluation gives up unless the session
/// configures its own limit.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Errors raised while solving an expression tree. Every variant
/// carries the source position of the node it is attributed to;
/// numeric-layer failures are wrapped and re-attributed by the frame
/// that invoked the operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
  #[error("unknown identifier `{name}` at {pos}")]
  UnknownIdentifier { name: String, pos: SourcePos },
  #[error(
    "wrong number of arguments for `{name}` at {pos}: \
     expected {expected}, found {found}"
  )]
  WrongArgumentsCount {
    name: String,
    expected: usize,
    found: usize,
    pos: SourcePos,
  },
  #[error("recursion deeper than {limit} calls at {pos}")]
  RecursionTooDeep { limit: usize, pos: SourcePos },
  #[error("{source} at {pos}")]
  Number {
    #[source]
    source: NumberError,
    pos: SourcePos,
  },
}

impl SolverError {
  fn number(source: NumberError, pos: SourcePos) -> Self {
    SolverError::Number { source, pos }
  }

  pub fn pos(&self) -> SourcePos {
    match self {
      SolverError::UnknownIdentifier { pos, .. }
      | SolverError::WrongArgumentsCount { pos, .. }
      | SolverError::RecursionTooDeep { pos, .. }
      | SolverError::Number { pos, .. } => *pos,
    }
  }
}

/// A user function declaration: ordered parameter names and the body
/// expression they are bound over.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
  pub name: String,
  pub params: Vec<String>,
  pub body: Expr,
  pub pos: SourcePos,
}

/// User-declared variables and functions of one solving session.
///
/// Variables store their declaring expression and are re-evaluated on
/// every lookup. Declaring a name again silently replaces the prior
/// entry. The solver reads the table but never writes it; statements
/// executed between solves are what mutate it. The stored trees are
/// kind-independent, so the same table can serve solvers of any
/// number kind.
#[derive(Debug, Clone, Default)]
pub struct Symbols {
  variables: HashMap<String, Expr>,
  functions: HashMap<String, FunctionDef>,
}

impl Symbols {
  pub fn new() -> Self {
    Symbols::default()
  }

  pub fn add_variable(&mut self, name: impl Into<String>, expr: Expr) {
    self.variables.insert(name.into(), expr);
  }

  pub fn add_function(&mut self, def: FunctionDef) {
    self.functions.insert(def.name.clone(), def);
  }

  pub fn variable(&self, name: &str) -> Option<&Expr> {
    self.variables.get(name)
  }

  pub fn function(&self, name: &str) -> Option<&FunctionDef> {
    self.functions.get(name)
  }
}

/// Recursive tree-walking evaluator for one number kind.
///
/// Identifier and call resolution follows a fixed chain: call-scoped
/// bindings first, then user symbols, then the kind's builtin
/// registry. User definitions always shadow builtins of the same
/// name, and a user function with the wrong arity is a hard error
/// rather than a fallthrough.
pub struct Solver<N: Number> {
  symbols: Symbols,
  bindings: Vec<(String, N)>,
  precision: usize,
  max_call_depth: usize,
  depth: usize,
}

impl<N: Number> Default for Solver<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: Number> Solver<N> {
  pub fn new() -> Self {
    Solver {
      symbols: Symbols::new(),
      bindings: Vec::new(),
      precision: DEFAULT_PRECISION,
      max_call_depth: DEFAULT_MAX_CALL_DEPTH,
      depth: 0,
    }
  }

  pub fn with_symbols(symbols: Symbols) -> Self {
    Solver {
      symbols,
      ..Self::new()
    }
  }

  pub fn precision(&self) -> usize {
    self.precision
  }

  /// Significant digits for `Real` literals and precision-aware
  /// builtin constants. The exact kinds ignore it.
  pub fn set_precision(&mut self, precision: usize) {
    self.precision = precision;
  }

  pub fn max_call_depth(&self) -> usize {
    self.max_call_depth
  }

  pub fn set_max_call_depth(&mut self, depth: usize) {
    self.max_call_depth = depth;
  }

  pub fn symbols(&self) -> &Symbols {
    &self.symbols
  }

  pub fn symbols_mut(&mut self) -> &mut Symbols {
    &mut self.symbols
  }

  /// Evaluate one expression tree to a value. All or nothing: any
  /// lookup failure, arity mismatch or numeric error aborts the walk
  /// and surfaces here.
  pub fn solve(&mut self, expr: &Expr) -> Result<N, SolverError> {
    self.depth = 0;
    let result = self.eval(expr);
    debug_assert!(self.bindings.is_empty());
    result
  }

  /// Execute one parsed statement: declarations update the symbol
  /// table and yield no value, expressions are solved.
  pub fn execute(
    &mut self,
    statement: &Statement,
  ) -> Result<Option<N>, SolverError> {
    match statement {
      Statement::Expression(expr) => self.solve(expr).map(Some),
      Statement::VariableDecl { name, expr, .. } => {
        self.symbols.add_variable(name.clone(), expr.clone());
        Ok(None)
      }
      Statement::FunctionDecl {
        name,
        params,
        body,
        pos,
      } => {
        self.symbols.add_function(FunctionDef {
          name: name.clone(),
          params: params.clone(),
          body: body.clone(),
          pos: *pos,
        });
        Ok(None)
      }
    }
  }

  fn eval(&mut self, expr: &Expr) -> Result<N, SolverError> {
    match expr {
      Expr::Number { text, pos } => N::parse(text, self.precision)
        .map_err(|e| SolverError::number(e, *pos)),
      Expr::Identifier { name, pos } => self.eval_identifier(name, *pos),
      Expr::FunctionCall { name, args, pos } => {
        self.eval_call(name, args, *pos)
      }
      Expr::BinaryOp {
        op,
        left,
        right,
        pos,
      } => {
        let l = self.eval(left)?;
        let r = self.eval(right)?;
        match op {
          BinaryOperator::Plus => Ok(l + r),
          BinaryOperator::Minus => Ok(l - r),
          BinaryOperator::Times => Ok(l * r),
          BinaryOperator::Divide => {
            l.div(&r).map_err(|e| SolverError::number(e, *pos))
          }
          BinaryOperator::Modulo => {
            l.rem(&r).map_err(|e| SolverError::number(e, *pos))
          }
          BinaryOperator::Power => {
            l.pow(&r).map_err(|e| SolverError::number(e, *pos))
          }
        }
      }
      Expr::UnaryOp { op, operand, .. } => {
        let v = self.eval(operand)?;
        match op {
          UnaryOperator::Plus => Ok(v),
          UnaryOperator::Minus => Ok(-v),
        }
      }
      Expr::Conditional {
        condition,
        then_branch,
        else_branch,
        pos,
      } => {
        // only the selected branch is evaluated
        if self.eval_condition(condition, *pos)? {
          self.eval(then_branch)
        } else {
          self.eval(else_branch)
        }
      }
    }
  }

  fn eval_condition(
    &mut self,
    condition: &Condition,
    pos: SourcePos,
  ) -> Result<bool, SolverError> {
    let left = self.eval(&condition.left)?;
    let right = self.eval(&condition.right)?;
    let ord = left
      .compare(&right)
      .map_err(|e| SolverError::number(e, pos))?;
    Ok(match condition.op {
      ComparisonOp::Eq => ord == Ordering::Equal,
      ComparisonOp::Ne => ord != Ordering::Equal,
      ComparisonOp::Lt => ord == Ordering::Less,
      ComparisonOp::Le => ord != Ordering::Greater,
      ComparisonOp::Gt => ord == Ordering::Greater,
      ComparisonOp::Ge => ord != Ordering::Less,
    })
  }

  fn eval_identifier(
    &mut self,
    name: &str,
    pos: SourcePos,
  ) -> Result<N, SolverError> {
    // most recent binding wins, so an inner call's parameter shadows
    // an outer call's parameter of the same name
    if let Some((_, value)) =
      self.bindings.iter().rev().find(|(n, _)| n == name)
    {
      return Ok(value.clone());
    }
    if let Some(expr) = self.symbols.variable(name) {
      // stored expressions are lazy: re-evaluated in the current
      // context on every lookup, under the depth guard so that a
      // self-referential variable reports instead of overflowing
      let expr = expr.clone();
      return self.guarded(pos, |solver| solver.eval(&expr));
    }
    match N::builtins().get(name) {
      Some(Builtin::Constant(f)) => {
        f().map_err(|e| SolverError::number(e, pos))
      }
      Some(Builtin::PrecisionConstant(f)) => {
        f(self.precision).map_err(|e| SolverError::number(e, pos))
      }
      _ => Err(SolverError::UnknownIdentifier {
        name: name.to_string(),
        pos,
      }),
    }
  }

  fn eval_call(
    &mut self,
    name: &str,
    args: &[Expr],
    pos: SourcePos,
  ) -> Result<N, SolverError> {
    if let Some(func) = self.symbols.function(name) {
      // a user function never falls through to a builtin of the same
      // name, not even on arity mismatch
      let func = func.clone();
      if func.params.len() != args.len() {
        return Err(SolverError::WrongArgumentsCount {
          name: name.to_string(),
          expected: func.params.len(),
          found: args.len(),
          pos,
        });
      }
      let mut values = Vec::with_capacity(args.len());
      for arg in args {
        values.push(self.eval(arg)?);
      }
      let mark = self.bindings.len();
      for (param, value) in func.params.iter().zip(values) {
        self.bindings.push((param.clone(), value));
      }
      let result = self.guarded(pos, |solver| solver.eval(&func.body));
      // unwind exactly this call's bindings on success and failure
      // alike, keeping the stack sound for sibling evaluations
      self.bindings.truncate(mark);
      return result;
    }

    match N::builtins().get(name) {
      Some(Builtin::Unary(f)) => {
        self.check_arity(name, 1, args.len(), pos)?;
        let a = self.eval(&args[0])?;
        f(&a).map_err(|e| SolverError::number(e, pos))
      }
      Some(Builtin::Binary(f)) => {
        self.check_arity(name, 2, args.len(), pos)?;
        let a = self.eval(&args[0])?;
        let b = self.eval(&args[1])?;
        f(&a, &b).map_err(|e| SolverError::number(e, pos))
      }
      Some(Builtin::Angular(f)) => {
        self.check_arity(name, 1, args.len(), pos)?;
        let a = self.eval(&args[0])?;
        f(&a, AngleUnit::Radian).map_err(|e| SolverError::number(e, pos))
      }
      Some(Builtin::Constant(_) | Builtin::PrecisionConstant(_)) => {
        Err(SolverError::WrongArgumentsCount {
          name: name.to_string(),
          expected: 0,
          found: args.len(),
          pos,
        })
      }
      None => Err(SolverError::UnknownIdentifier {
        name: name.to_string(),
        pos,
      }),
    }
  }

  fn check_arity(
    &self,
    name: &str,
    expected: usize,
    found: usize,
    pos: SourcePos,
  ) -> Result<(), SolverError> {
    if expected == found {
      Ok(())
    } else {
      Err(SolverError::WrongArgumentsCount {
        name: name.to_string(),
        expected,
        found,
        pos,
      })
    }
  }

  /// Run `body` one call level deeper, converting runaway recursion
  /// into a reportable error before the native stack gives out.
  fn guarded<F>(&mut self, pos: SourcePos, body: F) -> Result<N, SolverError>
  where
    F: FnOnce(&mut Self) -> Result<N, SolverError>,
  {
    if self.depth >= self.max_call_depth {
      return Err(SolverError::RecursionTooDeep {
        limit: self.max_call_depth,
        pos,
      });
    }
    self.depth += 1;
    let result = body(self);
    self.depth -= 1;
    result
  }
}
