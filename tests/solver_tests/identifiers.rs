use super::*;

use numsolve::syntax::BinaryOperator::{Plus, Times};

#[test]
fn variables_resolve_through_the_symbol_table() {
  let mut solver = Solver::<Integer>::new();
  solver
    .symbols_mut()
    .add_variable("x", bin(Plus, num("40"), num("2")));
  assert_eq!(solver.solve(&ident("x")).unwrap(), 42);
}

#[test]
fn variables_are_lazy() {
  // y stores an expression over x, so redeclaring x changes y
  let mut solver = Solver::<Integer>::new();
  solver.symbols_mut().add_variable("x", num("1"));
  solver
    .symbols_mut()
    .add_variable("y", bin(Plus, ident("x"), num("1")));
  assert_eq!(solver.solve(&ident("y")).unwrap(), 2);
  solver.symbols_mut().add_variable("x", num("10"));
  assert_eq!(solver.solve(&ident("y")).unwrap(), 11);
}

#[test]
fn redeclaring_a_variable_replaces_it_silently() {
  let mut solver = Solver::<Integer>::new();
  solver.symbols_mut().add_variable("x", num("1"));
  solver.symbols_mut().add_variable("x", num("2"));
  assert_eq!(solver.solve(&ident("x")).unwrap(), 2);
}

#[test]
fn unknown_identifier_carries_its_position() {
  let pos = SourcePos::new(3, 7);
  let err = solve_integer(&ident("foo").at(pos)).unwrap_err();
  assert_eq!(
    err,
    SolverError::UnknownIdentifier {
      name: "foo".to_string(),
      pos,
    }
  );
}

#[test]
fn self_referential_variables_report_instead_of_overflowing() {
  let mut solver = Solver::<Integer>::new();
  solver
    .symbols_mut()
    .add_variable("x", bin(Plus, ident("x"), num("1")));
  assert!(matches!(
    solver.solve(&ident("x")),
    Err(SolverError::RecursionTooDeep { .. })
  ));
}

mod builtin_constants {
  use super::*;

  #[test]
  fn pi_honors_the_session_precision() {
    assert_eq!(solve_real(&ident("pi"), 8).unwrap().to_string(), "3.1415927");
    assert_eq!(
      solve_real(&ident("pi"), 16).unwrap().to_string(),
      "3.141592653589793"
    );
  }

  #[test]
  fn e_honors_the_session_precision() {
    assert_eq!(solve_real(&ident("e"), 8).unwrap().to_string(), "2.7182818");
  }

  #[test]
  fn constants_are_usable_in_expressions() {
    let v = solve_real(&bin(Times, ident("pi"), num("2")), 8).unwrap();
    assert_eq!(v.to_string(), "6.2831853");
  }

  #[test]
  fn real_constants_do_not_exist_for_the_exact_kinds() {
    assert!(matches!(
      solve_integer(&ident("pi")),
      Err(SolverError::UnknownIdentifier { .. })
    ));
    assert!(matches!(
      solve_rational(&ident("pi")),
      Err(SolverError::UnknownIdentifier { .. })
    ));
  }

  #[test]
  fn user_variables_shadow_builtin_constants() {
    let mut solver = Solver::<Real>::new();
    solver.set_precision(8);
    solver.symbols_mut().add_variable("pi", num("3"));
    assert_eq!(solver.solve(&ident("pi")).unwrap().to_string(), "3");
  }
}

mod programs {
  use super::*;

  #[test]
  fn statements_execute_in_order() {
    let program = [
      Statement::VariableDecl {
        name: "x".to_string(),
        expr: num("6"),
        pos: SourcePos::default(),
      },
      Statement::FunctionDecl {
        name: "double".to_string(),
        params: vec!["n".to_string()],
        body: bin(Times, ident("n"), num("2")),
        pos: SourcePos::default(),
      },
      Statement::Expression(call("double", vec![bin(Plus, ident("x"), num("1"))])),
    ];
    let result = numsolve::run_program::<Integer>(&program, 16).unwrap();
    assert_eq!(result.unwrap(), 14);
  }

  #[test]
  fn declaration_only_programs_yield_no_value() {
    let program = [Statement::VariableDecl {
      name: "x".to_string(),
      expr: num("6"),
      pos: SourcePos::default(),
    }];
    let result = numsolve::run_program::<Integer>(&program, 16).unwrap();
    assert!(result.is_none());
  }
}
