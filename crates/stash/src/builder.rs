// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring a [`Stash`].

#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Meter, MeterProvider};
use stash_tier::ByteStore;
use tick::Clock;

use crate::telemetry::StashTelemetry;
use crate::{EnvelopeCodec, Stash, StashOptions, StoreAdapter};

const DEFAULT_NAME: &str = "stash";

/// Builder for configuring a [`Stash`].
///
/// # Examples
///
/// ```
/// use stash::{Stash, StashOptions};
/// use stash_tier::testing::MockStore;
/// use tick::Clock;
///
/// let stash = Stash::builder(MockStore::new(), Clock::new_frozen())
///     .name("characters")
///     .options(StashOptions::new().with_compression_threshold(4096))
///     .logs(false)
///     .build();
///
/// assert_eq!(stash.name(), "characters");
/// assert_eq!(stash.codec().compression_threshold(), 4096);
/// ```
#[derive(Debug)]
pub struct StashBuilder<S> {
    store: S,
    clock: Clock,
    name: &'static str,
    options: StashOptions,
    logs: bool,
    #[cfg(feature = "metrics")]
    meter: Option<Meter>,
}

impl<S: ByteStore> StashBuilder<S> {
    pub(crate) fn new(store: S, clock: Clock) -> Self {
        Self {
            store,
            clock,
            name: DEFAULT_NAME,
            options: StashOptions::default(),
            logs: true,
            #[cfg(feature = "metrics")]
            meter: None,
        }
    }

    /// Sets the name reported in logs and metrics.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Replaces the compression and default expiration settings.
    #[must_use]
    pub fn options(mut self, options: StashOptions) -> Self {
        self.options = options;
        self
    }

    /// Turns per-operation log events on or off. On by default.
    #[must_use]
    pub fn logs(mut self, enabled: bool) -> Self {
        self.logs = enabled;
        self
    }

    /// Emits operation counters and durations through the given meter provider.
    #[cfg(feature = "metrics")]
    #[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
    #[must_use]
    pub fn metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.meter = Some(crate::telemetry::metrics::create_meter(provider));
        self
    }

    /// Builds the configured [`Stash`].
    #[must_use]
    pub fn build(self) -> Stash<S> {
        let telemetry = StashTelemetry::new(self.name, self.logs);
        #[cfg(feature = "metrics")]
        let telemetry = match &self.meter {
            Some(meter) => telemetry.with_meter(meter),
            None => telemetry,
        };

        Stash::from_parts(
            StoreAdapter::new(self.store, self.options.clone()),
            EnvelopeCodec::new(self.options.compression_threshold_bytes()),
            telemetry,
            self.clock,
        )
    }
}
