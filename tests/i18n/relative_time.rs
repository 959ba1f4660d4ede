//! Relative time labels rendered through the shipped catalogs.

use chrono::{Duration, TimeZone, Utc};

use super::{crate_root, shipped_manager, tag};

use crate_root::i18n::{format_elapsed, format_since};

#[test]
fn labels_follow_active_locale() {
    let mut manager = shipped_manager();
    assert_eq!(format_elapsed(&manager.translator(), 300), "5m ago");

    manager.set_locale(&tag("es_ES")).expect("switch");
    assert_eq!(format_elapsed(&manager.translator(), 300), "hace 5m");
    assert_eq!(format_elapsed(&manager.translator(), 7200), "hace 2h");

    manager.set_locale(&tag("zh_CN")).expect("switch");
    assert_eq!(format_elapsed(&manager.translator(), 300), "5分钟前");
    assert_eq!(format_elapsed(&manager.translator(), 59), "59秒前");
    assert_eq!(format_elapsed(&manager.translator(), 86_400 * 3), "3天前");
}

#[test]
fn future_events_render_as_zero_seconds() {
    let mut manager = shipped_manager();
    manager.set_locale(&tag("zh_CN")).expect("switch");
    let now = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid time");
    let translator = manager.translator();
    assert_eq!(format_since(&translator, now + Duration::seconds(30), now), "0秒前");
    assert_eq!(format_since(&translator, now - Duration::hours(5), now), "5小时前");
}
