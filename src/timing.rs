//! Extraction of `execution time: <n> ms` reports from program output.

use std::sync::LazyLock;

use regex::Regex;

use crate::process::ExecutionOutcome;

static EXECUTION_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this regex literal is guaranteed to compile
    Regex::new(r"(?i)execution time:\s*([0-9]+(?:\.[0-9]+)?)\s*ms").unwrap()
});

/// Duration in milliseconds reported by the last `execution time:` line in `text`.
///
/// Programs may print diagnostic timings before their final one, so every match
/// is scanned and the last wins. `None` means nothing matched; the value itself
/// is not sanity-checked.
pub fn parse_execution_time(text: &str) -> Option<f64> {
    EXECUTION_TIME_RE
        .captures_iter(text)
        .last()
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Parse the timing from an outcome's stdout followed by its stderr.
pub fn extract_timing(outcome: &ExecutionOutcome) -> Option<f64> {
    parse_execution_time(&outcome.combined_output())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_match_wins() {
        let text = "warmup\nexecution time: 5 ms\nfinal\nexecution time: 7.5 ms\n";
        assert_eq!(parse_execution_time(text), Some(7.5));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_execution_time("Execution Time: 12.125 MS"), Some(12.125));
    }

    #[test]
    fn test_optional_whitespace() {
        assert_eq!(parse_execution_time("execution time:3ms"), Some(3.0));
        assert_eq!(parse_execution_time("execution time:   42   ms"), Some(42.0));
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(parse_execution_time("elapsed: 5 ms"), None);
        assert_eq!(parse_execution_time("execution time: fast"), None);
        assert_eq!(parse_execution_time(""), None);
    }

    #[test]
    fn test_requires_digits_before_decimal_point() {
        assert_eq!(parse_execution_time("execution time: .5 ms"), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = "execution time: 1.0 ms\nexecution time: 2.250 ms";
        let first = parse_execution_time(text);
        let second = parse_execution_time(text);
        assert_eq!(first, second);
        assert_eq!(first, Some(2.25));
    }

    #[test]
    fn test_extract_timing_reads_stderr() {
        let outcome = ExecutionOutcome::new(Some(0), "starting\n", "execution time: 9.75 ms\n");
        assert_eq!(extract_timing(&outcome), Some(9.75));
    }

    #[test]
    fn test_extract_timing_prefers_stderr_when_last() {
        let outcome = ExecutionOutcome::new(
            Some(0),
            "execution time: 1 ms\n",
            "execution time: 2 ms\n",
        );
        assert_eq!(extract_timing(&outcome), Some(2.0));
    }
}
