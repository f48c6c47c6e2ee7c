//! Metrics helpers for cache lookups and document fetches.

// crates.io
use metrics::Label;
#[cfg(feature = "prometheus")] use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use smallvec::SmallVec;
// self
use crate::_prelude::*;

type LabelSet = SmallVec<[Label; 2]>;

const METRIC_CACHE_LOOKUPS_TOTAL: &str = "idp_metadata_cache_lookups_total";
const METRIC_FETCH_TOTAL: &str = "idp_metadata_fetch_total";
const METRIC_FETCH_DURATION: &str = "idp_metadata_fetch_duration_seconds";

/// Shared Prometheus handle installed by [`install_default_exporter`].
#[cfg(feature = "prometheus")]
static PROMETHEUS_HANDLE: std::sync::OnceLock<PrometheusHandle> = std::sync::OnceLock::new();

/// Install the default Prometheus recorder backed by `metrics`.
///
/// Multiple invocations are safe; subsequent calls become no-ops once the recorder is installed.
#[cfg(feature = "prometheus")]
pub fn install_default_exporter() -> Result<()> {
	if PROMETHEUS_HANDLE.get().is_some() {
		return Ok(());
	}

	let handle = PrometheusBuilder::new()
		.install_recorder()
		.map_err(|err| Error::Metrics(err.to_string()))?;
	let _ = PROMETHEUS_HANDLE.set(handle);

	Ok(())
}

/// Access the global Prometheus exporter handle when installed.
#[cfg(feature = "prometheus")]
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
	PROMETHEUS_HANDLE.get()
}

/// Record a cache lookup for `document`.
pub fn record_cache_lookup(document: &'static str, hit: bool) {
	let mut labels = document_labels(document);

	labels.push(Label::new("outcome", if hit { "hit" } else { "miss" }));

	metrics::counter!(METRIC_CACHE_LOOKUPS_TOTAL, labels.iter()).increment(1);
}

/// Record the outcome and latency of an origin fetch for `document`.
pub fn record_fetch(document: &'static str, success: bool, duration: Duration) {
	let mut labels = document_labels(document);

	labels.push(Label::new("status", if success { "success" } else { "error" }));

	metrics::counter!(METRIC_FETCH_TOTAL, labels.iter()).increment(1);
	metrics::histogram!(METRIC_FETCH_DURATION, document_labels(document).iter())
		.record(duration.as_secs_f64());
}

fn document_labels(document: &'static str) -> LabelSet {
	let mut labels = LabelSet::new();

	labels.push(Label::new("document", document));

	labels
}
