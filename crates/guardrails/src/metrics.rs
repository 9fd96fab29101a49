//! Observability for guardrail evaluations.
//!
//! Emits through the `metrics` facade; the embedding process installs the
//! recorder (Prometheus or otherwise). With no recorder installed these are
//! no-ops.

use crate::verdict::GuardrailVerdict;

/// Per-check pass/fail counters, keyed by check type.
const CHECKS_TOTAL: &str = "guardrail_checks_total";
/// End-to-end evaluation latency, in milliseconds.
const EVALUATION_LATENCY_MS: &str = "guardrail_evaluation_latency_ms";
/// Opportunities blocked, keyed by the blocking reason code.
const BLOCKED_TOTAL: &str = "blocked_opportunities_total";

pub fn record_verdict(verdict: &GuardrailVerdict) {
    let checks = [
        ("liquidity", verdict.liquidity_check),
        ("position_size", verdict.position_size_check),
        ("exposure", verdict.exposure_check),
        ("event_window", verdict.event_window_check),
        ("regime", verdict.regime_check),
        ("catalyst_freshness", verdict.catalyst_freshness_check),
    ];
    for (check_type, passed) in checks {
        metrics::counter!(
            CHECKS_TOTAL,
            1,
            "check_type" => check_type,
            "result" => if passed { "pass" } else { "fail" },
        );
    }

    metrics::histogram!(EVALUATION_LATENCY_MS, verdict.evaluation_duration_ms);

    if !verdict.passed_all {
        // First critical code wins; a non-critical block (event window) falls
        // back to the first warning of any severity.
        let reason = verdict
            .first_critical_code()
            .or_else(|| verdict.risk_warnings.first().map(|w| w.code.as_str()))
            .unwrap_or("UNKNOWN")
            .to_string();
        metrics::counter!(BLOCKED_TOTAL, 1, "reason" => reason);
    }
}
