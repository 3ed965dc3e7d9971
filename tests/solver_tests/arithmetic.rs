use super::*;

use numsolve::syntax::BinaryOperator::{
  Divide, Minus, Modulo, Plus, Power, Times,
};

mod integer {
  use super::*;

  #[test]
  fn addition() {
    assert_eq!(solve_integer(&bin(Plus, num("1"), num("2"))).unwrap(), 3);
    assert_eq!(
      solve_integer(&bin(Plus, bin(Plus, num("1"), num("2")), num("3")))
        .unwrap(),
      6
    );
  }

  #[test]
  fn subtraction() {
    assert_eq!(solve_integer(&bin(Minus, num("3"), num("1"))).unwrap(), 2);
    assert_eq!(
      solve_integer(&bin(Minus, num("1"), num("3"))).unwrap(),
      -2
    );
  }

  #[test]
  fn multiplication() {
    assert_eq!(solve_integer(&bin(Times, num("3"), num("4"))).unwrap(), 12);
  }

  #[test]
  fn division_truncates_toward_zero() {
    assert_eq!(solve_integer(&bin(Divide, num("7"), num("2"))).unwrap(), 3);
    assert_eq!(
      solve_integer(&bin(Divide, num("-7"), num("2"))).unwrap(),
      -3
    );
    assert_eq!(
      solve_integer(&bin(Divide, num("7"), num("-2"))).unwrap(),
      -3
    );
    assert_eq!(
      solve_integer(&bin(Divide, num("-7"), num("-2"))).unwrap(),
      3
    );
  }

  #[test]
  fn modulo_follows_the_dividend_sign() {
    assert_eq!(solve_integer(&bin(Modulo, num("7"), num("2"))).unwrap(), 1);
    assert_eq!(
      solve_integer(&bin(Modulo, num("-7"), num("2"))).unwrap(),
      -1
    );
    assert_eq!(
      solve_integer(&bin(Modulo, num("7"), num("-2"))).unwrap(),
      1
    );
    assert_eq!(
      solve_integer(&bin(Modulo, num("-7"), num("-2"))).unwrap(),
      -1
    );
  }

  #[test]
  fn division_and_modulo_agree() {
    // (a / b) * b + a % b == a
    for (a, b) in [("7", "2"), ("-7", "2"), ("7", "-2"), ("-7", "-2")] {
      let q = solve_integer(&bin(Divide, num(a), num(b))).unwrap();
      let r = solve_integer(&bin(Modulo, num(a), num(b))).unwrap();
      let b = solve_integer(&num(b)).unwrap();
      let a = solve_integer(&num(a)).unwrap();
      assert_eq!(q * b + r, a);
    }
  }

  #[test]
  fn power_operator() {
    assert_eq!(
      solve_integer(&bin(Power, num("2"), num("10"))).unwrap(),
      1024
    );
  }

  #[test]
  fn unary_operators() {
    assert_eq!(solve_integer(&neg(num("5"))).unwrap(), -5);
    assert_eq!(
      solve_integer(&Expr::unary(UnaryOperator::Plus, num("5"))).unwrap(),
      5
    );
  }

  #[test]
  fn division_by_zero_fails() {
    assert!(matches!(
      solve_integer(&bin(Divide, num("5"), num("0"))),
      Err(SolverError::Number {
        source: NumberError::DivisionByZero,
        ..
      })
    ));
    assert!(matches!(
      solve_integer(&bin(Modulo, num("5"), num("0"))),
      Err(SolverError::Number {
        source: NumberError::DivisionByZero,
        ..
      })
    ));
  }
}

mod rational {
  use super::*;

  #[test]
  fn sums_reduce_to_lowest_terms() {
    // 1/2 + 1/3 == 5/6
    let expr = bin(
      Plus,
      bin(Divide, num("1"), num("2")),
      bin(Divide, num("1"), num("3")),
    );
    assert_eq!(solve_rational(&expr).unwrap().to_string(), "5/6");
  }

  #[test]
  fn construction_normalizes() {
    assert_eq!(solve_rational(&num("2/4")).unwrap().to_string(), "1/2");
    assert_eq!(
      solve_rational(&num("2/4")).unwrap(),
      solve_rational(&num("1/2")).unwrap()
    );
  }

  #[test]
  fn division_is_exact() {
    let expr = bin(
      Divide,
      bin(Divide, num("1"), num("2")),
      bin(Divide, num("1"), num("3")),
    );
    assert_eq!(solve_rational(&expr).unwrap().to_string(), "3/2");
  }

  #[test]
  fn integral_results_print_without_a_denominator() {
    let expr = bin(Times, num("1/2"), num("4"));
    assert_eq!(solve_rational(&expr).unwrap().to_string(), "2");
  }

  #[test]
  fn sign_sits_on_the_numerator() {
    let v = solve_rational(&neg(num("1/2"))).unwrap();
    assert_eq!(v.to_string(), "-1/2");
    let quotient =
      solve_rational(&bin(Divide, num("1"), num("-2"))).unwrap();
    assert_eq!(quotient.to_string(), "-1/2");
  }

  #[test]
  fn division_by_zero_fails() {
    assert!(matches!(
      solve_rational(&bin(Divide, num("5"), num("0"))),
      Err(SolverError::Number {
        source: NumberError::DivisionByZero,
        ..
      })
    ));
    // a zero denominator in a literal is the same failure
    assert!(matches!(
      solve_rational(&num("1/0")),
      Err(SolverError::Number {
        source: NumberError::DivisionByZero,
        ..
      })
    ));
  }

  #[test]
  fn modulo_is_not_defined() {
    assert!(matches!(
      solve_rational(&bin(Modulo, num("7"), num("2"))),
      Err(SolverError::Number {
        source: NumberError::InvalidOperation(_),
        ..
      })
    ));
  }
}

mod real {
  use super::*;

  #[test]
  fn power_has_no_rounding_error_at_small_precision() {
    let v = solve_real(&bin(Power, num("2"), num("10")), 4).unwrap();
    assert_eq!(v.to_string(), "1024");
  }

  #[test]
  fn division_produces_decimals() {
    let v = solve_real(&bin(Divide, num("1"), num("8")), 16).unwrap();
    assert_eq!(v.to_string(), "0.125");
  }

  #[test]
  fn results_carry_the_session_precision() {
    let v = solve_real(&bin(Plus, num("1"), num("2")), 10).unwrap();
    assert_eq!(v.precision(), Some(10));
  }

  #[test]
  fn division_by_zero_fails() {
    assert!(matches!(
      solve_real(&bin(Divide, num("5"), num("0")), 16),
      Err(SolverError::Number {
        source: NumberError::DivisionByZero,
        ..
      })
    ));
  }

  #[test]
  fn modulo_is_not_defined() {
    assert!(matches!(
      solve_real(&bin(Modulo, num("7"), num("2")), 16),
      Err(SolverError::Number {
        source: NumberError::InvalidOperation(_),
        ..
      })
    ));
  }
}

mod conditionals {
  use super::*;

  #[test]
  fn selects_the_matching_branch() {
    let expr = cond(ComparisonOp::Lt, num("1"), num("2"), num("10"), num("20"));
    assert_eq!(solve_integer(&expr).unwrap(), 10);
    let expr = cond(ComparisonOp::Gt, num("1"), num("2"), num("10"), num("20"));
    assert_eq!(solve_integer(&expr).unwrap(), 20);
  }

  #[test]
  fn only_the_selected_branch_is_evaluated() {
    // the rejected branch divides by zero and must stay untouched
    let expr = cond(
      ComparisonOp::Le,
      num("1"),
      num("1"),
      num("7"),
      bin(Divide, num("1"), num("0")),
    );
    assert_eq!(solve_integer(&expr).unwrap(), 7);
  }

  #[test]
  fn comparison_operators() {
    let cases = [
      (ComparisonOp::Eq, "2", "2", true),
      (ComparisonOp::Eq, "2", "3", false),
      (ComparisonOp::Ne, "2", "3", true),
      (ComparisonOp::Lt, "2", "3", true),
      (ComparisonOp::Le, "3", "3", true),
      (ComparisonOp::Gt, "3", "2", true),
      (ComparisonOp::Ge, "2", "3", false),
    ];
    for (op, l, r, expected) in cases {
      let expr = cond(op, num(l), num(r), num("1"), num("0"));
      let taken = solve_integer(&expr).unwrap() == 1;
      assert_eq!(taken, expected, "{:?} {} {}", op, l, r);
    }
  }
}
