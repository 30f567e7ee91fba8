use std::collections::BTreeMap;
use std::fmt::Write;

use crate::metrics::{AggregateSummary, Operation};

/// Render one block per operation, in the order given.
pub fn render_summary(snapshot: &[(Operation, AggregateSummary)]) -> String {
    let mut out = String::new();
    out.push_str("\n=== Load Test Summary ===\n");
    if snapshot.is_empty() {
        out.push_str("No requests recorded.\n");
        return out;
    }
    for (op, summary) in snapshot {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "Endpoint: {}\n\
             \x20 Requests : {}\n\
             \x20 Errors   : {} ({:.2}% error rate)\n\
             \x20 Avg ms   : {:.2}\n\
             \x20 P95 ms   : {:.2}\n\
             \x20 P99 ms   : {:.2}\n\
             \x20 Statuses : {}\n\n",
            op.as_name(),
            summary.count,
            summary.errors,
            summary.error_rate,
            summary.avg_ms,
            summary.p95_ms,
            summary.p99_ms,
            format_status_counts(&summary.status_counts),
        );
    }
    out
}

/// `{0: 1, 200: 17}` with keys ascending.
pub fn format_status_counts(counts: &BTreeMap<u16, u64>) -> String {
    let body: Vec<String> = counts.iter().map(|(status, n)| format!("{status}: {n}")).collect();
    format!("{{{}}}", body.join(", "))
}
