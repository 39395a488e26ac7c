//! Tracing support for logging and performance monitoring.
//!
//! With the `tracing` feature enabled, [`init_tracing`] installs a global
//! subscriber that prints events filtered by `RUST_LOG` and records the time
//! spent in each named span on the current thread.  Without it, these
//! functions are no-ops; the instrumentation itself is always compiled in.

use std::time::Duration;

/// Accumulated time and close count for one span name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanTiming {
    pub name: &'static str,
    pub total: Duration,
    pub count: usize,
}

#[cfg(feature = "tracing")]
mod enabled {
    use std::{
        cell::RefCell,
        collections::BTreeMap,
        sync::Once,
        time::{Duration, Instant},
    };

    use tracing_subscriber::{
        EnvFilter, Layer, Registry, fmt, layer::Context, layer::SubscriberExt,
        registry::LookupSpan, util::SubscriberInitExt,
    };

    use super::SpanTiming;

    const DEFAULT_FILTER: &str = "warn";

    thread_local! {
        static SPAN_TIMINGS: RefCell<BTreeMap<&'static str, (Duration, usize)>> =
            const { RefCell::new(BTreeMap::new()) };
    }

    struct TimingLayer;

    impl<S> Layer<S> for TimingLayer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(
            &self,
            _attrs: &tracing::span::Attributes<'_>,
            id: &tracing::Id,
            ctx: Context<'_, S>,
        ) {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(Instant::now());
            }
        }

        fn on_close(&self, id: tracing::Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(&id) {
                let name = span.metadata().name();
                if let Some(start) = span.extensions().get::<Instant>() {
                    let elapsed = start.elapsed();
                    SPAN_TIMINGS.with(|totals| {
                        let mut totals = totals.borrow_mut();
                        let entry = totals.entry(name).or_insert((Duration::ZERO, 0));
                        entry.0 += elapsed;
                        entry.1 += 1;
                    });
                }
            }
        }
    }

    /// Installs the global subscriber.  Only the first call has an effect,
    /// and it does nothing if another subscriber is already installed.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
            let _ = Registry::default()
                .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
                .with(TimingLayer)
                .try_init();
        });
    }

    /// Gets the recorded span timings for this thread, longest first.
    pub fn span_timings() -> Vec<SpanTiming> {
        SPAN_TIMINGS.with(|totals| {
            let mut timings: Vec<_> = totals
                .borrow()
                .iter()
                .map(|(&name, &(total, count))| SpanTiming { name, total, count })
                .collect();
            timings.sort_by(|a, b| b.total.cmp(&a.total));
            timings
        })
    }

    #[doc(hidden)]
    pub fn dump_span_timings() {
        eprintln!("span timings (desc):");
        for SpanTiming { name, total, count } in span_timings() {
            eprintln!("  {name}: {total:?} ({count}x)");
        }
    }

    #[doc(hidden)]
    pub fn reset_span_timings() {
        init_tracing();
        SPAN_TIMINGS.with(|totals| totals.borrow_mut().clear());
    }
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    use super::SpanTiming;

    pub fn init_tracing() {}

    pub fn span_timings() -> Vec<SpanTiming> {
        Vec::new()
    }

    #[doc(hidden)]
    pub fn dump_span_timings() {}

    #[doc(hidden)]
    pub fn reset_span_timings() {}
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;
