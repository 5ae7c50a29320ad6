#[cfg(test)]
mod tests {
    use crate::config::EquationSolverConfig;
    use crate::domain::error::DomainError;
    use crate::domain::service::{Service, Solution};

    fn solve(equation: &str) -> Solution {
        Service::default().solve(equation).unwrap()
    }

    #[test]
    fn test_constant_expression_has_no_solutions() {
        let solution = solve("1+1");
        assert_eq!(solution.equation, "2 = 0");
        assert!(solution.solutions.is_empty());
    }

    #[test]
    fn test_linear_equation() {
        let solution = solve("x - 5 = 0");
        assert_eq!(solution.equation, "x - 5 = 0");
        assert_eq!(solution.solutions, vec!["x = 5"]);
    }

    #[test]
    fn test_bare_expression_is_equated_to_zero() {
        let solution = solve("x^2 - 4");
        assert_eq!(solution.equation, "x^2 - 4 = 0");
        assert_eq!(solution.solutions, vec!["x = -2", "x = 2"]);
    }

    #[test]
    fn test_right_hand_side_is_subtracted() {
        let solution = solve("x^2 = 4");
        assert_eq!(solution.equation, "x^2 - 4 = 0");
        assert_eq!(solution.solutions, vec!["x = -2", "x = 2"]);

        let solution = solve("2x + 1 = x");
        assert_eq!(solution.equation, "x + 1 = 0");
        assert_eq!(solution.solutions, vec!["x = -1"]);
    }

    #[test]
    fn test_every_free_variable_is_solved_in_sorted_order() {
        let solution = solve("y = 2x");
        assert_eq!(solution.equation, "-2*x + y = 0");
        assert_eq!(solution.solutions, vec!["x = y/2", "y = 2*x"]);
    }

    #[test]
    fn test_complex_roots() {
        let solution = solve("x^2 + 1");
        assert_eq!(solution.solutions, vec!["x = -I", "x = I"]);
    }

    #[test]
    fn test_division_by_zero_has_no_solutions() {
        let solution = solve("x/0 = 1");
        assert_eq!(solution.equation, "zoo*x - 1 = 0");
        assert!(solution.solutions.is_empty());
    }

    #[test]
    fn test_scientific_notation_is_a_single_number() {
        let solution = solve("1e5");
        assert_eq!(solution.equation, "100000 = 0");
        assert!(solution.solutions.is_empty());
    }

    #[test]
    fn test_even_power_of_logarithm() {
        let solution = solve("log(x)^2 = 1");
        assert_eq!(solution.equation, "log(x)^2 - 1 = 0");
        assert_eq!(solution.solutions, vec!["x = exp(-1)", "x = E"]);
    }

    #[test]
    fn test_equal_sides_have_no_solutions() {
        let solution = solve("x = x");
        assert_eq!(solution.equation, "0 = 0");
        assert!(solution.solutions.is_empty());
    }

    #[test]
    fn test_solving_is_idempotent() {
        let first = solve("x^3 - x = 0");
        let second = solve("x^3 - x = 0");
        assert_eq!(first, second);
        assert_eq!(first.solutions, vec!["x = -1", "x = 0", "x = 1"]);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(solve("  x - 5 = 0 \n"), solve("x - 5 = 0"));
    }

    #[test]
    fn test_blank_input_is_missing() {
        let service = Service::default();
        assert!(matches!(service.solve(""), Err(DomainError::MissingInput)));
        assert!(matches!(service.solve("   "), Err(DomainError::MissingInput)));
    }

    #[test]
    fn test_multiple_equals_are_malformed() {
        let service = Service::default();
        for equation in ["x===y", "x = y = z", "==", "1 = 1 = 1"] {
            assert!(
                matches!(
                    service.solve(equation),
                    Err(DomainError::MalformedEquation { .. })
                ),
                "{equation} should be malformed"
            );
        }
    }

    #[test]
    fn test_unparseable_text_is_malformed() {
        let service = Service::default();
        for equation in ["x +", "= x", "x =", "(x", "x)", "2 $ 3", "sin()"] {
            assert!(
                matches!(
                    service.solve(equation),
                    Err(DomainError::MalformedEquation { .. })
                ),
                "{equation} should be malformed"
            );
        }
    }

    #[test]
    fn test_overlong_equation_is_malformed() {
        let service = Service::new(EquationSolverConfig {
            max_equation_len: 8,
        });
        assert!(service.solve("x = 1").is_ok());
        let err = service.solve("x + 1 + 1 + 1 = 0").unwrap_err();
        assert!(matches!(err, DomainError::MalformedEquation { .. }));
    }

    #[test]
    fn test_unsupported_equation_is_a_solve_error() {
        let err = Service::default().solve("x^5 - x + 1").unwrap_err();
        assert!(matches!(err, DomainError::Solve(_)));
    }
}
