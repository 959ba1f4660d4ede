//! Switching locale at runtime retranslates subscribed widgets.

use std::cell::RefCell;
use std::rc::Rc;

use super::{crate_root, shipped_manager, tag};

use crate_root::i18n::{Language, RefreshResult, Retranslate, SwitchError, Translator};

/// Minimal stand-in for a toolbar with a play button.
struct PlayButton {
    label: Rc<RefCell<String>>,
}

impl Retranslate for PlayButton {
    fn retranslate(&mut self, translator: &Translator) -> RefreshResult {
        *self.label.borrow_mut() = translator.tr("PlaybackControls", "Play");
        Ok(())
    }
}

#[test]
fn switching_es_to_zh_retranslates_widgets() {
    let mut manager = shipped_manager();
    let label = Rc::new(RefCell::new(String::new()));
    manager.subscribe(Box::new(PlayButton {
        label: Rc::clone(&label),
    }));

    let report = manager.set_language(Language::Spanish).expect("es_ES available");
    assert!(report.is_clean());
    assert_eq!(*label.borrow(), "Reproducir");

    let loaded = manager.store().len();
    manager.set_language(Language::Chinese).expect("zh_CN available");
    assert_eq!(*label.borrow(), "播放");
    assert_eq!(manager.translate("PlaybackControls", "Play", &[]), "播放");

    manager.set_language(Language::Spanish).expect("switch back");
    assert_eq!(*label.borrow(), "Reproducir");
    assert!(manager.store().len() >= loaded);
}

#[test]
fn observers_refresh_in_order_and_failures_are_isolated() {
    let mut manager = shipped_manager();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&seen);
    manager.subscribe_fn(move |_: &Translator| {
        first.borrow_mut().push("first");
        Ok(())
    });
    manager.subscribe_fn(|_: &Translator| Err("widget gone".into()));
    let third = Rc::clone(&seen);
    let third_id = manager.subscribe_fn(move |tr: &Translator| {
        third.borrow_mut().push("third");
        assert_eq!(tr.tr("PlaybackControls", "Pause"), "暂停");
        Ok(())
    });

    let report = manager.set_locale(&tag("zh_CN")).expect("switch");
    assert_eq!(report.refreshed, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].message, "widget gone");
    assert_eq!(*seen.borrow(), ["first", "third"]);

    assert!(manager.unsubscribe(third_id));
    manager.set_locale(&tag("es_ES")).expect("switch");
    assert_eq!(*seen.borrow(), ["first", "third", "first"]);
}

#[test]
fn failed_switch_keeps_previous_locale() {
    let mut manager = shipped_manager();
    manager.set_locale(&tag("zh_CN")).expect("switch");
    let before = manager.translator();

    let err = manager.set_locale(&tag("fr_FR")).expect_err("no French catalog");
    assert!(matches!(err, SwitchError::LocaleUnavailable { .. }));
    assert_eq!(manager.locale(), &tag("zh_CN"));
    assert_eq!(manager.language(), Some(Language::Chinese));
    assert_eq!(
        manager.tr("PlaybackControls", "Play"),
        before.tr("PlaybackControls", "Play")
    );
}

#[test]
fn configured_fallbacks_reach_shipped_catalogs() {
    let mut manager = shipped_manager();
    manager.set_locale(&tag("es_MX")).expect("es_MX falls back to es_ES");
    assert_eq!(manager.locale(), &tag("es_MX"));
    assert_eq!(manager.tr("PlaybackControls", "Stop"), "Detener");

    manager.set_locale(&tag("zh_SG")).expect("zh_SG falls back to zh_CN");
    assert_eq!(manager.tr("PlaybackControls", "Stop"), "停止");
    assert_eq!(manager.language(), Some(Language::Chinese));
}
