//! Background worker for loading catalog files.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::i18n::catalog::Catalog;
use crate::i18n::error::LoadError;
use crate::i18n::loader::CatalogLoader;
use crate::i18n::locale::LocaleTag;

/// Outcome of one background load.
#[derive(Debug)]
pub struct CatalogLoadResult {
    /// Locale that was requested.
    pub locale: LocaleTag,
    /// Parsed catalog or the load failure.
    pub result: Result<Catalog, LoadError>,
}

/// What: Spawn background worker for catalog loading.
///
/// Inputs:
/// - `loader`: Loader whose search directories and prefix are used
/// - `requests`: Channel receiver for locales to load
/// - `results`: Channel sender for load outcomes
///
/// Output:
/// - Handle of the spawned task; it ends when `requests` is closed
///
/// Details:
/// - File reads and parsing run on Tokio's blocking pool
/// - The worker does not cache; the receiving side installs catalogs into
///   its own store (see `LanguageManager::apply_load_result`)
/// - Results are sent in request order; a closed result channel stops the
///   worker
pub fn spawn_catalog_worker(
    loader: CatalogLoader,
    mut requests: mpsc::UnboundedReceiver<LocaleTag>,
    results: mpsc::UnboundedSender<CatalogLoadResult>,
) -> JoinHandle<()> {
    let loader = Arc::new(loader);
    tokio::spawn(async move {
        while let Some(locale) = requests.recv().await {
            let job_loader = Arc::clone(&loader);
            let job_locale = locale.clone();
            let outcome =
                tokio::task::spawn_blocking(move || job_loader.load_uncached(&job_locale)).await;
            let result = match outcome {
                Ok(result) => result,
                Err(join_err) => {
                    tracing::warn!("Catalog load task for '{}' failed: {}", locale, join_err);
                    continue;
                }
            };
            if let Err(err) = &result {
                tracing::debug!("Background load of '{}' failed: {}", locale, err);
            }
            if results.send(CatalogLoadResult { locale, result }).is_err() {
                tracing::debug!("Catalog result channel closed; stopping worker");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tag(raw: &str) -> LocaleTag {
        LocaleTag::parse(raw).expect("test tag should parse")
    }

    #[tokio::test]
    async fn test_worker_loads_shipped_catalogs() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("translations");
        let loader = CatalogLoader::new(vec![dir], "tomeo");
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (res_tx, mut res_rx) = mpsc::unbounded_channel();
        let handle = spawn_catalog_worker(loader, req_rx, res_tx);

        req_tx.send(tag("zh_CN")).expect("worker running");
        req_tx.send(tag("fr_FR")).expect("worker running");
        drop(req_tx);

        let first = res_rx.recv().await.expect("first result");
        assert_eq!(first.locale, tag("zh_CN"));
        let catalog = first.result.expect("zh_CN loads");
        assert_eq!(
            catalog.template("PlaybackControls", "Play", None, None),
            Some("播放")
        );

        let second = res_rx.recv().await.expect("second result");
        assert_eq!(second.locale, tag("fr_FR"));
        assert!(second.result.is_err_and(|e| e.is_not_found()));

        handle.await.expect("worker exits after requests close");
        assert!(res_rx.recv().await.is_none());
    }
}
