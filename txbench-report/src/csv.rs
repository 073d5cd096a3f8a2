//! CSV Output
//!
//! One row per benchmark. Times are in nanoseconds; missing metrics leave
//! the numeric cells empty so spreadsheets treat them as blanks.

use crate::report::Report;

const HEADER: &str = "id,strategy,status,worker_threads,samples,mean_ns,median_ns,std_dev_ns,\
min_ns,max_ns,p90_ns,p99_ns,transactions,processed,throughput_tps,speedup";

/// Generate a CSV report
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::with_capacity(128 * (report.results.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for result in &report.results {
        let speedup = report.comparison.as_ref().and_then(|cmp| {
            cmp.entries
                .iter()
                .find(|e| e.benchmark_id == result.id)
                .map(|e| e.speedup)
        });

        out.push_str(&format!(
            "{},{},{},{}",
            escape(&result.id),
            result.strategy,
            result.status.as_str(),
            result.worker_threads
        ));
        match &result.metrics {
            Some(m) => {
                out.push_str(&format!(
                    ",{},{:.0},{:.0},{:.0},{:.0},{:.0},{:.0},{:.0},{},{},{}",
                    m.samples,
                    m.mean_ns,
                    m.median_ns,
                    m.std_dev_ns,
                    m.min_ns,
                    m.max_ns,
                    m.p90_ns,
                    m.p99_ns,
                    m.transactions,
                    m.processed,
                    m.throughput_tps.map(|t| format!("{t:.2}")).unwrap_or_default()
                ));
            }
            None => out.push_str(",,,,,,,,,,,"),
        }
        out.push(',');
        if let Some(s) = speedup {
            out.push_str(&format!("{s:.3}"));
        }
        out.push('\n');
    }

    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
