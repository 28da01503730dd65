//! Metric vectors with dynamic labels backed by `DashMap`.
//!
//! Labels are flattened into sorted key vectors so the same label set always
//! maps to the same series. `DashMap::entry` makes first registration an
//! atomic insert-if-absent, so two requests racing on a new label set share
//! one series. Durations are accumulated as integer nanoseconds and rendered
//! in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Endpoint label used when a request matched no route.
pub const UNKNOWN_ENDPOINT: &str = "unknown";

/// Default buckets (seconds) for database statement durations.
pub const DB_DURATION_BUCKETS: [f64; 6] = [0.01, 0.05, 0.1, 0.5, 1.0, 2.0];

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `name{labels}` or bare `name` when there are no labels.
fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{labels}}}")
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

fn seconds(nanos: u64) -> f64 {
    nanos as f64 / 1e9
}

/// Snapshot entries sorted by label set so output is stable between scrapes.
fn sorted<V, T>(map: &DashMap<LabelKey, V>, f: impl Fn(&V) -> T) -> Vec<(LabelKey, T)> {
    let mut rows: Vec<(LabelKey, T)> = map.iter().map(|r| (r.key().clone(), f(r.value()))).collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if it was never observed).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        for (key, val) in sorted(&self.map, |c| c.load(Ordering::Relaxed)) {
            let _ = writeln!(out, "{} {}", series(name, &label_str(&key)), val);
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum_nanos: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

struct HistogramSnapshot {
    count: u64,
    sum_nanos: u64,
    buckets: Vec<u64>,
}

/// Histogram with fixed upper bounds (seconds).
pub struct HistogramVec {
    bounds: Vec<f64>,
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// `bounds` must be strictly increasing; config validation enforces this.
    pub fn new(bounds: Vec<f64>) -> Self {
        Self { bounds, map: DashMap::new() }
    }

    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let n = self.bounds.len();
        let hist = self.map.entry(label_key(labels)).or_insert_with(|| AtomicHistogram::new(n));
        let secs = duration.as_secs_f64();

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_nanos.fetch_add(nanos(duration), Ordering::Relaxed);

        // cumulative: every bucket whose bound covers the value
        for (i, &le) in self.bounds.iter().enumerate() {
            if secs <= le {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for one series.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        let rows = sorted(&self.map, |h| HistogramSnapshot {
            count: h.count.load(Ordering::Relaxed),
            sum_nanos: h.sum_nanos.load(Ordering::Relaxed),
            buckets: h.buckets.iter().map(|b| b.load(Ordering::Relaxed)).collect(),
        });

        for (key, snap) in rows {
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (le, count) in self.bounds.iter().zip(&snap.buckets) {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, snap.count);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), &labels), seconds(snap.sum_nanos));
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), &labels), snap.count);
        }
    }
}

#[derive(Default)]
struct AtomicSummary {
    count: AtomicU64,
    sum_nanos: AtomicU64,
}

/// Quantile-free summary: observation count and sum only.
#[derive(Default)]
pub struct SummaryVec {
    map: DashMap<LabelKey, AtomicSummary>,
}

impl SummaryVec {
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let s = self.map.entry(label_key(labels)).or_default();
        s.count.fetch_add(1, Ordering::Relaxed);
        s.sum_nanos.fetch_add(nanos(duration), Ordering::Relaxed);
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|s| s.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "summary");
        let rows = sorted(&self.map, |s| {
            (s.count.load(Ordering::Relaxed), s.sum_nanos.load(Ordering::Relaxed))
        });
        for (key, (count, sum)) in rows {
            let labels = label_str(&key);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), &labels), count);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), &labels), seconds(sum));
        }
    }
}

/// Every metric the service exports, with process lifetime.
pub struct ServiceMetrics {
    pub http_requests: CounterVec,
    pub http_duration: HistogramVec,
    pub http_summary: SummaryVec,
    pub db_connections: CounterVec,
    pub db_duration: HistogramVec,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0])
    }
}

impl ServiceMetrics {
    pub fn new(http_buckets: Vec<f64>) -> Self {
        Self {
            http_requests: CounterVec::default(),
            http_duration: HistogramVec::new(http_buckets),
            http_summary: SummaryVec::default(),
            db_connections: CounterVec::default(),
            db_duration: HistogramVec::new(DB_DURATION_BUCKETS.to_vec()),
        }
    }

    /// Record one finished HTTP request into the counter, histogram, and summary.
    pub fn observe_request(&self, endpoint: &str, method: &str, status: u16, elapsed: Duration) {
        let endpoint = if endpoint.is_empty() { UNKNOWN_ENDPOINT } else { endpoint };
        let status = status.to_string();

        self.http_requests
            .inc(&[("endpoint", endpoint), ("method", method), ("status", &status)]);

        let labels = [("endpoint", endpoint), ("method", method)];
        self.http_duration.observe(&labels, elapsed);
        self.http_summary.observe(&labels, elapsed);
    }

    /// Record one database statement.
    pub fn observe_query(&self, query_type: &str, elapsed: Duration) {
        self.db_duration.observe(&[("query_type", query_type)], elapsed);
    }

    /// A new physical database connection was opened.
    pub fn connection_opened(&self) {
        self.db_connections.inc(&[]);
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.http_requests.render("http_requests_total", "Total number of HTTP requests", &mut out);
        self.http_duration.render(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            &mut out,
        );
        self.http_summary.render(
            "http_request_summary_seconds",
            "HTTP request latency summary",
            &mut out,
        );
        self.db_connections.render(
            "db_connections_total",
            "Total number of database connections created",
            &mut out,
        );
        self.db_duration.render(
            "db_request_duration_seconds",
            "Database request duration in seconds",
            &mut out,
        );
        out
    }
}
