//! Library self-test
//!
//! The first two cases are the classic checks shipped with the C callback
//! library (`21 * 2` and `15 + 27`); the rest exercise one algorithm each.

use crate::bridge::Bridge;
use crate::callback::{BinaryCallbackFn, DoubleCallbackFn, IntCallbackFn};
use crate::exports::{test_add_function, test_double_function};
use serde::Serialize;
use std::fmt;
use std::os::raw::{c_double, c_int};

const TOLERANCE: f64 = 1e-9;

/// One self-test check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfTestCase {
    pub name: String,
    pub expected: f64,
    pub actual: f64,
    pub passed: bool,
}

impl SelfTestCase {
    fn new(name: &str, expected: f64, actual: f64) -> Self {
        Self {
            name: name.to_string(),
            expected,
            actual,
            passed: (actual - expected).abs() <= TOLERANCE,
        }
    }
}

/// Self-test outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelfTestReport {
    pub cases: Vec<SelfTestCase>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        self.cases.iter().all(|case| case.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SelfTestCase> {
        self.cases.iter().filter(|case| !case.passed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SelfTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, case) in self.cases.iter().enumerate() {
            writeln!(
                f,
                "Test {}: {:.2} (expected {:.2}) {} [{}]",
                i + 1,
                case.actual,
                case.expected,
                if case.passed { "ok" } else { "FAILED" },
                case.name
            )?;
        }
        Ok(())
    }
}

extern "C" fn linear(x: c_double) -> c_double {
    2.0 * x
}

extern "C" fn minus_42(x: c_double) -> c_double {
    x - 42.0
}

extern "C" fn one(_x: c_double) -> c_double {
    1.0
}

extern "C" fn int_identity(i: c_int) -> c_int {
    i
}

extern "C" fn not_a_number(_x: c_double) -> c_double {
    f64::NAN
}

/// Run every self-test case through `bridge`
pub fn run_self_test(bridge: &Bridge) -> SelfTestReport {
    let mut cases = Vec::new();

    let doubled = bridge.invoke_unary(&(test_double_function as DoubleCallbackFn), 21.0);
    cases.push(SelfTestCase::new("call_with_double", 42.0, doubled));

    let added = bridge.invoke_binary(&(test_add_function as BinaryCallbackFn), 15.0, 27.0);
    cases.push(SelfTestCase::new("call_with_two_doubles", 42.0, added));

    let mut values = [1.0, 2.0, 3.0];
    let linear: DoubleCallbackFn = linear;
    bridge.map_array(&linear, &mut values);
    cases.push(SelfTestCase::new("map_array", 12.0, values.iter().sum()));

    let area = bridge.integrate(&linear, 0.0, 3.0, 10).unwrap_or(f64::NAN);
    cases.push(SelfTestCase::new("integrate", 9.0, area));

    let root = bridge.find_root(
        &(minus_42 as DoubleCallbackFn),
        &(one as DoubleCallbackFn),
        0.0,
        10,
    );
    cases.push(SelfTestCase::new("find_root", 42.0, root));

    let sum = bridge.sum_callback_results(&(int_identity as IntCallbackFn), 5);
    cases.push(SelfTestCase::new("sum_callback_results", 10.0, sum));

    let validated = bridge.call_with_validation(&(not_a_number as DoubleCallbackFn), 0.0);
    cases.push(SelfTestCase::new("call_with_validation", -1.0, validated));

    SelfTestReport { cases }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_test_passes() {
        let report = run_self_test(&Bridge::silent());
        assert_eq!(report.cases.len(), 7);
        assert!(
            report.passed(),
            "failures: {:?}",
            report.failures().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_report_text_matches_classic_format() {
        let report = run_self_test(&Bridge::silent());
        let text = report.to_string();
        assert!(text.starts_with("Test 1: 42.00 (expected 42.00) ok [call_with_double]"));
        assert!(text.contains("Test 2: 42.00 (expected 42.00) ok [call_with_two_doubles]"));
    }

    #[test]
    fn test_failed_case_reported() {
        let case = SelfTestCase::new("broken", 1.0, 2.0);
        let report = SelfTestReport { cases: vec![case] };
        assert!(!report.passed());
        assert!(report.to_string().contains("FAILED"));
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_report_json() {
        let report = run_self_test(&Bridge::silent());
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cases"][0]["name"], "call_with_double");
        assert_eq!(value["cases"][0]["passed"], true);
    }
}
