//! CLI integration tests for patq commands.
//!
//! These tests verify exit codes and output shapes, not exact tree
//! formatting, which may evolve.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a patq command.
fn patq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("patq").unwrap()
}

mod parse {
    use super::*;

    #[test]
    fn prints_tree_for_valid_query() {
        patq()
            .args(["parse", "ti=bicycle"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Triple(ti = bicycle)"));
    }

    #[test]
    fn prints_connectives_between_conditions() {
        patq()
            .args(["parse", "a=1 und b=2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("AND"));
    }

    #[test]
    fn canonical_output() {
        patq()
            .args(["parse", "--canonical", "a=1 und b=2"])
            .assert()
            .success()
            .stdout("a = 1 AND b = 2\n");
    }

    #[test]
    fn json_output_is_valid_json() {
        let output = patq()
            .args(["parse", "--json", "ti=bicycle and pa=siemens"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(value.get("first").is_some());
        assert!(value["first"].get("Triple").is_some());
    }

    #[test]
    fn syntax_error_prints_caret_explanation() {
        patq()
            .args(["parse", "foo="])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected term"))
            .stderr(predicate::str::contains("^"));
    }

    #[test]
    fn empty_query_is_a_usage_error() {
        patq()
            .args(["parse", "   "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("empty query"))
            .stderr(predicate::str::contains("^").not());
    }
}

mod check {
    use super::*;

    #[test]
    fn accepts_valid_queries() {
        patq()
            .args(["check", "ti=bicycle", "pa=(siemens or bosch)"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 queries ok"));
    }

    #[test]
    fn reports_first_invalid_query() {
        patq()
            .args(["check", "ti=bicycle", "foo="])
            .assert()
            .failure()
            .stderr(predicate::str::contains("foo="));
    }

    #[test]
    fn requires_at_least_one_query() {
        patq().arg("check").assert().failure();
    }
}

mod keywords {
    use super::*;

    #[test]
    fn lists_keywords_one_per_line() {
        patq()
            .args(["keywords", "ti=bicycl? and pa=siemens"])
            .assert()
            .success()
            .stdout("bicycl\nsiemens\n");
    }

    #[test]
    fn json_array_output() {
        patq()
            .args(["keywords", "--json", "ti=bicycl? and pa=siemens"])
            .assert()
            .success()
            .stdout("[\"bicycl\",\"siemens\"]\n");
    }

    #[test]
    fn walks_into_subqueries() {
        patq()
            .args(["keywords", "bi=(wheel and \"disc brake\")"])
            .assert()
            .success()
            .stdout("wheel\ndisc brake\n");
    }
}
