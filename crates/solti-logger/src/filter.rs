use tracing::{Level, Metadata, Subscriber, subscriber::Interest};
use tracing_subscriber::{
    filter::LevelFilter,
    layer::{Context, Layer},
};

use crate::object::LoggerLevel;

/// Event name given to entries emitted by `fatal!`.
pub(crate) const FATAL_EVENT: &str = "fatal";
/// Event name given to entries emitted by `log_panic!`.
pub(crate) const PANIC_EVENT: &str = "panic";

/// Global filter for a [`LoggerLevel`] threshold.
///
/// Up to `error` it behaves like a [`LevelFilter`].
/// `fatal` and `panic` sit above `ERROR`, they keep only the `ERROR` events
/// named by the `fatal!` and `log_panic!` macros.
/// `None` disables everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeverityFilter(Option<LoggerLevel>);

impl SeverityFilter {
    pub(crate) const OFF: SeverityFilter = SeverityFilter(None);

    pub(crate) fn new(level: LoggerLevel) -> Self {
        Self(Some(level))
    }

    pub(crate) fn is_enabled(&self, meta: &Metadata<'_>) -> bool {
        let Some(level) = self.0 else {
            return false;
        };
        match level {
            LoggerLevel::Fatal => {
                *meta.level() == Level::ERROR
                    && meta.is_event()
                    && matches!(meta.name(), FATAL_EVENT | PANIC_EVENT)
            }
            LoggerLevel::Panic => {
                *meta.level() == Level::ERROR && meta.is_event() && meta.name() == PANIC_EVENT
            }
            _ => level.filter() >= *meta.level(),
        }
    }
}

impl<S: Subscriber> Layer<S> for SeverityFilter {
    fn register_callsite(&self, meta: &'static Metadata<'static>) -> Interest {
        if self.is_enabled(meta) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, meta: &Metadata<'_>, _: Context<'_, S>) -> bool {
        self.is_enabled(meta)
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.0.map_or(LevelFilter::OFF, |level| level.filter()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    struct Count(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for Count {
        fn on_event(&self, _: &tracing::Event<'_>, _: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn emitted(filter: SeverityFilter) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(Count(count.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("warn");
            tracing::error!("plain error");
            tracing::error!(name: FATAL_EVENT, "fatal entry");
            tracing::error!(name: PANIC_EVENT, "panic entry");
        });
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn thresholds_above_error_keep_named_events_only() {
        assert_eq!(emitted(SeverityFilter::new(LoggerLevel::Warn)), 4);
        assert_eq!(emitted(SeverityFilter::new(LoggerLevel::Error)), 3);
        assert_eq!(emitted(SeverityFilter::new(LoggerLevel::Fatal)), 2);
        assert_eq!(emitted(SeverityFilter::new(LoggerLevel::Panic)), 1);
        assert_eq!(emitted(SeverityFilter::OFF), 0);
    }

    #[test]
    fn hint_follows_threshold() {
        assert_eq!(
            Layer::<tracing_subscriber::Registry>::max_level_hint(&SeverityFilter::OFF),
            Some(LevelFilter::OFF)
        );
        assert_eq!(
            Layer::<tracing_subscriber::Registry>::max_level_hint(&SeverityFilter::new(
                LoggerLevel::Panic
            )),
            Some(LevelFilter::ERROR)
        );
    }
}
