//! Retranslation fan-out on locale change.
//!
//! Observers are UI components that re-render their labels from the new
//! lookup snapshot. They run synchronously and in subscription order, so
//! the whole interface is retranslated before the switch returns.

use std::error::Error;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::i18n::translations::Translator;

/// Outcome of one observer refresh.
pub type RefreshResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Something that re-renders its text when the locale changes.
pub trait Retranslate {
    /// What: Refresh displayed text from the new snapshot.
    ///
    /// Inputs:
    /// - `translator`: Lookup snapshot for the new locale
    ///
    /// Output:
    /// - `Ok(())` on success; an error is logged and does not stop other
    ///   observers
    ///
    /// # Errors
    /// - Implementation defined
    fn retranslate(&mut self, translator: &Translator) -> RefreshResult;
}

/// Adapter letting a closure act as an observer.
struct FnObserver<F>(F);

impl<F> Retranslate for FnObserver<F>
where
    F: FnMut(&Translator) -> RefreshResult,
{
    fn retranslate(&mut self, translator: &Translator) -> RefreshResult {
        (self.0)(translator)
    }
}

/// Handle returned by [`RetranslationBroadcaster::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An observer that failed during a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Observer that failed.
    pub subscription: SubscriptionId,
    /// Error or panic message.
    pub message: String,
}

/// Result of one refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Observers that refreshed successfully.
    pub refreshed: usize,
    /// Observers that returned an error or panicked.
    pub failures: Vec<ObserverFailure>,
}

impl BroadcastReport {
    /// Whether every observer refreshed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ordered registry of live observers.
#[derive(Default)]
pub struct RetranslationBroadcaster {
    /// Observers in subscription order.
    observers: Vec<(SubscriptionId, Box<dyn Retranslate>)>,
    /// Next handle value.
    next_id: u64,
}

impl fmt::Debug for RetranslationBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetranslationBroadcaster")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl RetranslationBroadcaster {
    /// Empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it is refreshed after every earlier one.
    pub fn subscribe(&mut self, observer: Box<dyn Retranslate>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        tracing::debug!("Subscribed retranslation observer {}", id);
        id
    }

    /// Register a closure as an observer.
    pub fn subscribe_fn<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Translator) -> RefreshResult + 'static,
    {
        self.subscribe(Box::new(FnObserver(observer)))
    }

    /// What: Remove an observer.
    ///
    /// Inputs:
    /// - `id`: Handle from `subscribe`
    ///
    /// Output:
    /// - `true` if the observer was registered, `false` for unknown handles
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// What: Refresh every observer for a new locale.
    ///
    /// Inputs:
    /// - `translator`: Snapshot for the new locale, shared by the whole pass
    ///
    /// Output:
    /// - Report with the refreshed count and the failures
    ///
    /// Details:
    /// - Errors and panics are logged and recorded; later observers still run
    pub fn on_locale_changed(&mut self, translator: &Translator) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for (id, observer) in &mut self.observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| observer.retranslate(translator)));
            let message = match outcome {
                Ok(Ok(())) => {
                    report.refreshed += 1;
                    continue;
                }
                Ok(Err(err)) => err.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };
            tracing::warn!(
                "Retranslation observer {} failed for locale '{}': {}",
                id,
                translator.locale(),
                message
            );
            report.failures.push(ObserverFailure {
                subscription: *id,
                message,
            });
        }
        tracing::debug!(
            "Retranslated {} observers for locale '{}' ({} failed)",
            report.refreshed,
            translator.locale(),
            report.failures.len()
        );
        report
    }
}

/// Text of a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::locale::LocaleTag;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn translator() -> Translator {
        Translator::source_only(LocaleTag::parse("zh_CN").expect("valid tag"))
    }

    #[test]
    fn test_observers_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut broadcaster = RetranslationBroadcaster::new();
        for name in ["toolbar", "feed", "controls"] {
            let log = Rc::clone(&log);
            broadcaster.subscribe_fn(move |tr: &Translator| {
                log.borrow_mut().push(format!("{name}:{}", tr.locale()));
                Ok(())
            });
        }
        let report = broadcaster.on_locale_changed(&translator());
        assert_eq!(report.refreshed, 3);
        assert!(report.is_clean());
        assert_eq!(
            *log.borrow(),
            ["toolbar:zh_CN", "feed:zh_CN", "controls:zh_CN"]
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let hits = Rc::new(RefCell::new(0));
        let mut broadcaster = RetranslationBroadcaster::new();
        let failing = broadcaster.subscribe_fn(|_: &Translator| Err("label missing".into()));
        let panicking = broadcaster.subscribe_fn(|_: &Translator| panic!("widget gone"));
        let counter = Rc::clone(&hits);
        broadcaster.subscribe_fn(move |_: &Translator| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        let report = broadcaster.on_locale_changed(&translator());
        assert_eq!(report.refreshed, 1);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].subscription, failing);
        assert_eq!(report.failures[0].message, "label missing");
        assert_eq!(report.failures[1].subscription, panicking);
        assert!(report.failures[1].message.contains("widget gone"));
    }

    #[test]
    fn test_unsubscribe() {
        let mut broadcaster = RetranslationBroadcaster::new();
        let a = broadcaster.subscribe_fn(|_: &Translator| Ok(()));
        let b = broadcaster.subscribe_fn(|_: &Translator| Ok(()));
        assert_ne!(a, b);
        assert!(broadcaster.unsubscribe(a));
        assert!(!broadcaster.unsubscribe(a));
        assert_eq!(broadcaster.len(), 1);
        assert_eq!(broadcaster.on_locale_changed(&translator()).refreshed, 1);
        assert!(broadcaster.unsubscribe(b));
        assert!(broadcaster.is_empty());
    }

    struct Label {
        text: Rc<RefCell<String>>,
    }

    impl Retranslate for Label {
        fn retranslate(&mut self, translator: &Translator) -> RefreshResult {
            *self.text.borrow_mut() = translator.tr("PlaybackControls", "Play");
            Ok(())
        }
    }

    #[test]
    fn test_trait_object_observer() {
        let text = Rc::new(RefCell::new(String::new()));
        let mut broadcaster = RetranslationBroadcaster::new();
        broadcaster.subscribe(Box::new(Label {
            text: Rc::clone(&text),
        }));
        assert!(broadcaster.on_locale_changed(&translator()).is_clean());
        assert_eq!(*text.borrow(), "Play");
    }
}
