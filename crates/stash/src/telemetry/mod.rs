// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry for typed cache operations.
//!
//! Every facade operation is reported as one event carrying the facade name, the key,
//! the operation, its outcome and its duration. Events go to `tracing` when logging is
//! enabled and to OpenTelemetry counters and histograms when the `metrics` feature is
//! enabled and a meter provider has been supplied.

use std::sync::Arc;
use std::time::Duration;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};
use tracing::Level;

pub(crate) mod attributes;
pub(crate) mod ext;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StashOperation {
    Get,
    Set,
    Remove,
    Refresh,
}

impl StashOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "stash.get",
            Self::Set => "stash.set",
            Self::Remove => "stash.remove",
            Self::Refresh => "stash.refresh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StashActivity {
    Hit,
    Miss,
    Stored,
    Removed,
    Refreshed,
    Error,
}

impl StashActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "stash.hit",
            Self::Miss => "stash.miss",
            Self::Stored => "stash.stored",
            Self::Removed => "stash.removed",
            Self::Refreshed => "stash.refreshed",
            Self::Error => "stash.error",
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Hit | Self::Miss | Self::Refreshed => Level::DEBUG,
            Self::Stored | Self::Removed => Level::INFO,
            Self::Error => Level::ERROR,
        }
    }
}

#[derive(Debug)]
struct TelemetryInner {
    name: &'static str,
    logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    event_counter: Option<Counter<u64>>,
    #[cfg(any(feature = "metrics", test))]
    operation_duration: Option<Histogram<f64>>,
}

/// Records facade operations as logs and metrics.
#[derive(Debug, Clone)]
pub(crate) struct StashTelemetry {
    inner: Arc<TelemetryInner>,
}

impl StashTelemetry {
    pub fn new(name: &'static str, logging_enabled: bool) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                name,
                logging_enabled,
                #[cfg(any(feature = "metrics", test))]
                event_counter: None,
                #[cfg(any(feature = "metrics", test))]
                operation_duration: None,
            }),
        }
    }

    #[cfg(any(feature = "metrics", test))]
    pub fn with_meter(self, meter: &Meter) -> Self {
        Self {
            inner: Arc::new(TelemetryInner {
                name: self.inner.name,
                logging_enabled: self.inner.logging_enabled,
                event_counter: Some(metrics::create_event_counter(meter)),
                operation_duration: Some(metrics::create_operation_duration_histogram(meter)),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn record(&self, key: &str, operation: StashOperation, activity: StashActivity, duration: Duration) {
        #[cfg(any(feature = "metrics", test))]
        self.record_metrics(operation, activity, duration);

        if self.inner.logging_enabled {
            Self::emit(self.inner.name, key, operation, activity, duration);
        }
    }

    #[cfg(any(feature = "metrics", test))]
    fn record_metrics(&self, operation: StashOperation, activity: StashActivity, duration: Duration) {
        let attrs = [
            KeyValue::new(attributes::STASH_NAME, self.inner.name),
            KeyValue::new(attributes::STASH_OPERATION_NAME, operation.as_str()),
            KeyValue::new(attributes::STASH_ACTIVITY_NAME, activity.as_str()),
        ];

        if let Some(counter) = &self.inner.event_counter {
            counter.add(1, &attrs);
        }

        if let Some(histogram) = &self.inner.operation_duration {
            histogram.record(duration.as_secs_f64(), &attrs);
        }
    }

    fn emit(name: &'static str, key: &str, operation: StashOperation, activity: StashActivity, duration: Duration) {
        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        // Tracing levels must be constant, hence one macro arm per level.
        // Field names must match the constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    stash.name = name,
                    stash.key = key,
                    stash.operation = op,
                    stash.activity = act,
                    stash.duration_ns = duration_ns,
                    "stash.event"
                )
            };
        }

        let level = activity.level();
        if level == Level::ERROR {
            emit_event!(error);
        } else if level == Level::INFO {
            emit_event!(info);
        } else {
            emit_event!(debug);
        }
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::metrics::MeterProvider;

    use super::*;
    use crate::telemetry::testing::{LogCapture, MetricTester};

    #[test]
    fn operation_as_str() {
        assert_eq!(StashOperation::Get.as_str(), "stash.get");
        assert_eq!(StashOperation::Set.as_str(), "stash.set");
        assert_eq!(StashOperation::Remove.as_str(), "stash.remove");
        assert_eq!(StashOperation::Refresh.as_str(), "stash.refresh");
    }

    #[test]
    fn activity_as_str() {
        assert_eq!(StashActivity::Hit.as_str(), "stash.hit");
        assert_eq!(StashActivity::Miss.as_str(), "stash.miss");
        assert_eq!(StashActivity::Stored.as_str(), "stash.stored");
        assert_eq!(StashActivity::Removed.as_str(), "stash.removed");
        assert_eq!(StashActivity::Refreshed.as_str(), "stash.refreshed");
        assert_eq!(StashActivity::Error.as_str(), "stash.error");
    }

    #[test]
    fn activity_levels() {
        assert_eq!(StashActivity::Hit.level(), Level::DEBUG);
        assert_eq!(StashActivity::Miss.level(), Level::DEBUG);
        assert_eq!(StashActivity::Refreshed.level(), Level::DEBUG);
        assert_eq!(StashActivity::Stored.level(), Level::INFO);
        assert_eq!(StashActivity::Removed.level(), Level::INFO);
        assert_eq!(StashActivity::Error.level(), Level::ERROR);
    }

    #[test]
    fn emit_contains_all_fields_and_values() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        StashTelemetry::emit(
            "catalog",
            "characters_earth",
            StashOperation::Set,
            StashActivity::Stored,
            Duration::from_nanos(12_345),
        );

        capture.assert_contains(attributes::STASH_NAME);
        capture.assert_contains(attributes::STASH_KEY);
        capture.assert_contains(attributes::STASH_OPERATION_NAME);
        capture.assert_contains(attributes::STASH_ACTIVITY_NAME);
        capture.assert_contains(attributes::STASH_DURATION_NAME);
        capture.assert_contains(attributes::STASH_EVENT_NAME);

        capture.assert_contains("catalog");
        capture.assert_contains("characters_earth");
        capture.assert_contains("stash.set");
        capture.assert_contains("stash.stored");
        capture.assert_contains("12345");
    }

    #[test]
    fn emit_uses_activity_level() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        StashTelemetry::emit("stash", "k", StashOperation::Get, StashActivity::Error, Duration::ZERO);
        capture.assert_contains("ERROR");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        StashTelemetry::emit("stash", "k", StashOperation::Remove, StashActivity::Removed, Duration::ZERO);
        capture.assert_contains("INFO");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        StashTelemetry::emit("stash", "k", StashOperation::Get, StashActivity::Hit, Duration::ZERO);
        capture.assert_contains("DEBUG");
    }

    #[test]
    fn logging_disabled_emits_nothing() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        StashTelemetry::new("stash", false).record("k", StashOperation::Get, StashActivity::Hit, Duration::from_secs(1));

        assert!(capture.output().is_empty());
    }

    #[test]
    fn metrics_carry_name_operation_and_activity() {
        let tester = MetricTester::new();
        let meter = tester.meter_provider().meter("stash");
        let telemetry = StashTelemetry::new("catalog", false).with_meter(&meter);

        telemetry.record("k", StashOperation::Get, StashActivity::Miss, Duration::from_millis(3));

        tester.assert_attributes_contain(&[
            KeyValue::new(attributes::STASH_NAME, "catalog"),
            KeyValue::new(attributes::STASH_OPERATION_NAME, StashOperation::Get.as_str()),
            KeyValue::new(attributes::STASH_ACTIVITY_NAME, StashActivity::Miss.as_str()),
        ]);
    }

    #[test]
    fn metrics_use_stash_instrument_names() {
        let tester = MetricTester::new();
        let meter = metrics::create_meter(tester.meter_provider());
        let telemetry = StashTelemetry::new("stash", false).with_meter(&meter);

        telemetry.record("k", StashOperation::Set, StashActivity::Stored, Duration::from_millis(1));

        let names = tester.metric_names();
        assert!(names.iter().any(|n| n == "stash.event.count"), "got: {names:?}");
        assert!(names.iter().any(|n| n == "stash.operation.duration"), "got: {names:?}");
    }
}
