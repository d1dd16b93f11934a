use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub type AnalyticsAttributes = HashMap<String, String>;

/// Trackable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsEvent {
    CartAdd,
    CartRemove,
    DetailView,
}

impl AnalyticsEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsEvent::CartAdd => "cart_add",
            AnalyticsEvent::CartRemove => "cart_remove",
            AnalyticsEvent::DetailView => "detail_view",
        }
    }
}

/// A single analytics backend. Implementations must not block and must
/// swallow their own failures; callers never wait on the result.
pub trait AnalyticsProvider: Send + Sync {
    fn log_event(&self, event: AnalyticsEvent, attributes: &AnalyticsAttributes);
}

/// Fans each event out to every registered provider.
pub struct AnalyticsHub {
    providers: Vec<Arc<dyn AnalyticsProvider>>,
}

impl AnalyticsHub {
    pub fn new(providers: Vec<Arc<dyn AnalyticsProvider>>) -> Self {
        Self { providers }
    }

    pub fn log_event(&self, event: AnalyticsEvent, attributes: AnalyticsAttributes) {
        for provider in &self.providers {
            provider.log_event(event, &attributes);
        }
    }
}

/// Provider that writes events to the log stream.
pub struct LogAnalytics;

impl AnalyticsProvider for LogAnalytics {
    fn log_event(&self, event: AnalyticsEvent, attributes: &AnalyticsAttributes) {
        info!(kind = event.kind(), ?attributes, "📊 Analytics event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recording {
        seen: Mutex<Vec<(AnalyticsEvent, AnalyticsAttributes)>>,
    }

    impl AnalyticsProvider for Recording {
        fn log_event(&self, event: AnalyticsEvent, attributes: &AnalyticsAttributes) {
            self.seen.lock().push((event, attributes.clone()));
        }
    }

    #[test]
    fn hub_feeds_every_provider() {
        let first = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
        });
        let second = Arc::new(Recording {
            seen: Mutex::new(Vec::new()),
        });
        let hub = AnalyticsHub::new(vec![first.clone(), second.clone()]);

        let mut attributes = AnalyticsAttributes::new();
        attributes.insert("id".to_string(), "evt-1".to_string());
        hub.log_event(AnalyticsEvent::CartAdd, attributes);

        assert_eq!(first.seen.lock().len(), 1);
        assert_eq!(second.seen.lock().len(), 1);
        assert_eq!(first.seen.lock()[0].0.kind(), "cart_add");
    }
}
