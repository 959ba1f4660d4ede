//! Background catalog loading feeding a manager.

use tokio::sync::mpsc;

use super::{crate_root, shipped_manager, tag};

use crate_root::i18n::spawn_catalog_worker;

#[tokio::test]
async fn background_loads_install_into_manager() {
    let mut manager = shipped_manager();
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (res_tx, mut res_rx) = mpsc::unbounded_channel();
    let worker = spawn_catalog_worker(manager.loader().clone(), req_rx, res_tx);

    for locale in ["zh_CN", "es_ES", "de_DE"] {
        req_tx.send(tag(locale)).expect("worker running");
    }
    drop(req_tx);

    let mut installed = 0;
    while let Some(loaded) = res_rx.recv().await {
        if manager.apply_load_result(loaded) {
            installed += 1;
        }
    }
    worker.await.expect("worker finished");
    assert_eq!(installed, 2);
    assert_eq!(manager.store().len(), 2);

    // The store already has the catalog; no disk access needed for the switch.
    manager.set_locale(&tag("zh_CN")).expect("switch");
    assert_eq!(manager.tr("PlaybackControls", "Play"), "播放");
    assert!(manager.loader().cached(&tag("zh_CN")).is_none());
}
