//! Reducing two timings to a categorical verdict.

use exspeed::EmissionVariant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative difference below which a win is reported as marginal.
pub const DEFAULT_MARGINAL_THRESHOLD: f64 = 0.10;

/// Which discipline measured faster at one parameter point, and how clearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ErrorCodeFaster,
    ExceptionFaster,
    ErrorCodeFasterMarginal,
    ExceptionFasterMarginal,
}

impl Verdict {
    /// Every verdict, in code order.
    pub const ALL: [Verdict; 4] = [
        Verdict::ErrorCodeFaster,
        Verdict::ExceptionFaster,
        Verdict::ErrorCodeFasterMarginal,
        Verdict::ExceptionFasterMarginal,
    ];

    /// Single-character code used in the rendered matrix.
    ///
    /// Upper case is decisive, lower case marginal; `C` is the error-code
    /// program, `E` the exception program.
    pub fn code(self) -> char {
        match self {
            Verdict::ErrorCodeFaster => 'C',
            Verdict::ExceptionFaster => 'E',
            Verdict::ErrorCodeFasterMarginal => 'c',
            Verdict::ExceptionFasterMarginal => 'e',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub fn winner(self) -> EmissionVariant {
        match self {
            Verdict::ErrorCodeFaster | Verdict::ErrorCodeFasterMarginal => {
                EmissionVariant::ErrorCodeStyle
            }
            Verdict::ExceptionFaster | Verdict::ExceptionFasterMarginal => {
                EmissionVariant::ExceptionStyle
            }
        }
    }

    pub fn is_marginal(self) -> bool {
        matches!(
            self,
            Verdict::ErrorCodeFasterMarginal | Verdict::ExceptionFasterMarginal
        )
    }

    /// The same strength of verdict for the other discipline.
    pub fn mirrored(self) -> Self {
        match self {
            Verdict::ErrorCodeFaster => Verdict::ExceptionFaster,
            Verdict::ExceptionFaster => Verdict::ErrorCodeFaster,
            Verdict::ErrorCodeFasterMarginal => Verdict::ExceptionFasterMarginal,
            Verdict::ExceptionFasterMarginal => Verdict::ErrorCodeFasterMarginal,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Verdict::ErrorCodeFaster => "error codes faster",
            Verdict::ExceptionFaster => "exceptions faster",
            Verdict::ErrorCodeFasterMarginal => "error codes marginally faster",
            Verdict::ExceptionFasterMarginal => "exceptions marginally faster",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// `|error_code - exception| / min(error_code, exception)`.
    pub ratio: f64,
}

/// Classify the minimum timings of the error-code and exception programs.
///
/// A relative difference below `threshold` is marginal. Equal timings are a
/// marginal error-code win. If exactly one timing is zero the ratio is
/// infinite and the verdict decisive.
pub fn classify(error_code: Duration, exception: Duration, threshold: f64) -> Classification {
    let ratio = relative_difference(error_code, exception);
    let error_code_wins = error_code <= exception;
    let verdict = match (error_code_wins, ratio < threshold) {
        (true, false) => Verdict::ErrorCodeFaster,
        (false, false) => Verdict::ExceptionFaster,
        (true, true) => Verdict::ErrorCodeFasterMarginal,
        (false, true) => Verdict::ExceptionFasterMarginal,
    };
    Classification { verdict, ratio }
}

fn relative_difference(a: Duration, b: Duration) -> f64 {
    let fast = a.min(b).as_nanos();
    let slow = a.max(b).as_nanos();
    if slow == fast {
        0.0
    } else if fast == 0 {
        f64::INFINITY
    } else {
        (slow - fast) as f64 / fast as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_decisive() {
        let result = classify(ms(100), ms(150), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ErrorCodeFaster);
        assert!((result.ratio - 0.5).abs() < 1e-9);

        let result = classify(ms(300), ms(100), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ExceptionFaster);
        assert!((result.ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_marginal() {
        let result = classify(ms(100), ms(105), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ErrorCodeFasterMarginal);
        let result = classify(ms(109), ms(100), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ExceptionFasterMarginal);
    }

    #[test]
    fn test_threshold_boundary_is_decisive() {
        let result = classify(ms(100), ms(110), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ErrorCodeFaster);
    }

    #[test]
    fn test_tie_is_marginal() {
        let result = classify(ms(42), ms(42), DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ErrorCodeFasterMarginal);
        assert_eq!(result.ratio, 0.0);
        let result = classify(Duration::ZERO, Duration::ZERO, DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ErrorCodeFasterMarginal);
    }

    #[test]
    fn test_zero_against_nonzero_is_decisive() {
        let result = classify(ms(5), Duration::ZERO, DEFAULT_MARGINAL_THRESHOLD);
        assert_eq!(result.verdict, Verdict::ExceptionFaster);
        assert!(result.ratio.is_infinite());
    }

    #[test]
    fn test_swapping_timings_mirrors_verdict() {
        let pairs = [(100, 150), (100, 104), (250, 90), (91, 90), (1, 1000)];
        for (a, b) in pairs {
            let forward = classify(ms(a), ms(b), DEFAULT_MARGINAL_THRESHOLD);
            let backward = classify(ms(b), ms(a), DEFAULT_MARGINAL_THRESHOLD);
            assert_eq!(forward.verdict.mirrored(), backward.verdict);
            assert_eq!(forward.verdict.is_marginal(), backward.verdict.is_marginal());
            assert_eq!(forward.ratio, backward.ratio);
        }
    }

    #[test]
    fn test_custom_threshold() {
        let result = classify(ms(100), ms(130), 0.5);
        assert_eq!(result.verdict, Verdict::ErrorCodeFasterMarginal);
        let result = classify(ms(100), ms(101), 0.0);
        assert_eq!(result.verdict, Verdict::ErrorCodeFaster);
    }

    #[test]
    fn test_codes() {
        let codes: String = Verdict::ALL.iter().map(|v| v.code()).collect();
        assert_eq!(codes, "CEce");
        for verdict in Verdict::ALL {
            assert_eq!(Verdict::from_code(verdict.code()), Some(verdict));
        }
        assert_eq!(Verdict::from_code('x'), None);
        assert_eq!(
            Verdict::ExceptionFasterMarginal.winner(),
            EmissionVariant::ExceptionStyle
        );
    }
}
