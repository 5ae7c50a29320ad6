#![allow(clippy::unwrap_used, clippy::expect_used)]

use algebra::{Expr, parse};

fn render(source: &str) -> String {
    parse(source).unwrap().to_string()
}

#[test]
fn test_render_keeps_polynomial_order() {
    assert_eq!(render("x^2 - 4"), "x^2 - 4");
    assert_eq!(render("-4 + x^2"), "x^2 - 4");
    assert_eq!(render("1 + 2x + x^2"), "x^2 + 2*x + 1");
    assert_eq!(render("3y - 7 + 2x"), "2*x + 3*y - 7");
}

#[test]
fn test_render_uses_caret_for_double_star() {
    assert_eq!(render("x**3"), "x^3");
}

#[test]
fn test_like_terms_collapse() {
    assert_eq!(render("x + x"), "2*x");
    assert_eq!(render("x - x"), "0");
    assert_eq!(render("2(x + 1)"), "2*x + 2");
}

#[test]
fn test_products_of_sums_stay_factored() {
    assert_eq!(render("(x - 1)(x + 1)"), "(x - 1)*(x + 1)");
    assert_eq!(render("(x + 1)^2"), "(x + 1)^2");
}

#[test]
fn test_fractions_and_decimals() {
    assert_eq!(render("x/2"), "x/2");
    assert_eq!(render("0.5x"), "x/2");
    assert_eq!(render("1/x + 1"), "1 + 1/x");
    assert_eq!(render("3/4"), "3/4");
}

#[test]
fn test_radicals_render_as_sqrt() {
    assert_eq!(render("sqrt(8)"), "2*sqrt(2)");
    assert_eq!(render("sqrt(x)"), "sqrt(x)");
    assert_eq!(render("2^(1/2)/2"), "sqrt(2)/2");
}

#[test]
fn test_functions_and_constants() {
    assert_eq!(render("sin(pi/6)"), "1/2");
    assert_eq!(render("2 sin x"), "2*sin(x)");
    assert_eq!(render("ln(E)"), "1");
    assert_eq!(render("I*I"), "-1");
}

#[test]
fn test_scientific_notation() {
    assert_eq!(render("1e5"), "100000");
    assert_eq!(render("2.5e-1 x"), "x/4");
}

#[test]
fn test_division_by_zero_renders_as_complex_infinity() {
    assert_eq!(render("1/0"), "zoo");
    assert_eq!(render("x/0 - 1"), "zoo*x - 1");
    assert_eq!(render("0/0"), "nan");
}

#[test]
fn test_constant_leads_a_single_negated_term() {
    assert_eq!(render("1 - x^2"), "1 - x^2");
    assert_eq!(render("-x^2 + 1"), "1 - x^2");
}

#[test]
fn test_normalized_difference() {
    let lhs = parse("x").unwrap();
    let rhs = parse("5").unwrap();
    assert_eq!((lhs - rhs).to_string(), "x - 5");

    let lhs = parse("2x + 3").unwrap();
    let rhs = parse("x").unwrap();
    assert_eq!((lhs - rhs).to_string(), "x + 3");
}

#[test]
fn test_parse_errors_carry_position() {
    let err = parse("x + * 2").unwrap_err();
    assert_eq!(err.position, 4);

    let err = parse("(x + 1").unwrap_err();
    assert_eq!(err.position, 0);
    assert!(err.to_string().contains("unbalanced"));

    assert!(parse("2 # 3").is_err());
}

#[test]
fn test_free_symbols_exclude_constants() {
    let expr: Expr = parse("pi*x + E*y + I").unwrap();
    let names: Vec<String> = expr.free_symbols().into_iter().collect();
    assert_eq!(names, vec!["x", "y"]);
}
