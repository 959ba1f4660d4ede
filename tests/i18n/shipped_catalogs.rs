//! Shipped catalogs load cleanly and answer the host's lookups.

use super::{crate_root, shipped_dir, tag};

use std::sync::Arc;

use crate_root::i18n::{CatalogLoader, PlaceholderDiagnostics, Translator, load_catalog_file};

#[test]
fn shipped_catalogs_load_with_expected_locales() {
    let loader = CatalogLoader::new(vec![shipped_dir()], "tomeo");
    assert_eq!(loader.available_locales(), [tag("es_ES"), tag("zh_CN")]);
    for locale in loader.available_locales() {
        let path = loader.locate(&locale).expect("file exists");
        let catalog = load_catalog_file(&path).expect("shipped catalog parses");
        assert_eq!(catalog.locale(), &locale);
        let stats = catalog.stats();
        assert_eq!(stats.contexts, 6);
        assert_eq!(stats.empty, 0);
        assert_eq!(stats.translated, stats.messages);
    }
}

#[test]
fn same_source_text_is_scoped_per_context() {
    let mut loader = CatalogLoader::new(vec![shipped_dir()], "tomeo");
    let zh = loader.load(&tag("zh_CN")).expect("zh_CN loads");
    assert_eq!(zh.template("SettingsDialog", "Settings", None, None), Some("设置"));
    assert!(zh.template("TopToolbar", "Settings", None, None).is_some());
    assert_eq!(zh.template("PlaybackControls", "Settings", None, None), None);
}

#[test]
fn multiline_text_survives_loading() {
    let mut loader = CatalogLoader::new(vec![shipped_dir()], "tomeo");
    let es = loader.load(&tag("es_ES")).expect("es_ES loads");
    let translator = Translator::new(tag("es_ES"), vec![es], Arc::new(PlaceholderDiagnostics::new()));
    assert_eq!(
        translator.tr(
            "SocialFeedWidget",
            "Your friends haven't posted any videos yet.\nAdd more friends!"
        ),
        "Tus amigos aún no han publicado videos.\n¡Agrega más amigos!"
    );
}
