pub mod number;
pub mod solver;
pub mod syntax;

pub use number::{
  AngleUnit, Integer, Number, NumberError, Rational, Real,
  DEFAULT_PRECISION,
};
pub use solver::builtins::{Builtin, BuiltinRegistry};
pub use solver::{
  FunctionDef, Solver, SolverError, Symbols, DEFAULT_MAX_CALL_DEPTH,
};

/// Solve a single expression with a fresh session at the given
/// precision.
pub fn solve<N: Number>(
  expr: &syntax::Expr,
  precision: usize,
) -> Result<N, SolverError> {
  let mut solver = Solver::new();
  solver.set_precision(precision);
  solver.solve(expr)
}

/// Execute a parsed program in order: declarations update the symbol
/// table, expressions are solved. Returns the value of the last
/// expression statement, if any.
pub fn run_program<N: Number>(
  statements: &[syntax::Statement],
  precision: usize,
) -> Result<Option<N>, SolverError> {
  let mut solver = Solver::<N>::new();
  solver.set_precision(precision);
  let mut last = None;
  for statement in statements {
    if let Some(value) = solver.execute(statement)? {
      last = Some(value);
    }
  }
  Ok(last)
}
