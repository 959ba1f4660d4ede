//! Qt Linguist (`.ts`) catalog parsing and file loading.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::i18n::catalog::{Catalog, MessageEntry};
use crate::i18n::config::I18nConfig;
use crate::i18n::error::LoadError;
use crate::i18n::locale::LocaleTag;

/// Elements the parser tracks; anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    /// `<TS>` root.
    Ts,
    /// `<context>`.
    Context,
    /// `<name>` inside a context.
    Name,
    /// `<message>`.
    Message,
    /// `<source>`.
    Source,
    /// `<comment>` (disambiguation).
    Comment,
    /// `<translation>`.
    Translation,
    /// `<numerusform>` inside a translation.
    NumerusForm,
    /// `<lengthvariant>` inside a translation or numerus form.
    LengthVariant,
    /// Ignored element (`location`, `extracomment`, `oldsource`, ...).
    Other,
}

impl Node {
    /// Whether character data inside this node is kept.
    const fn captures_text(self) -> bool {
        matches!(
            self,
            Self::Name
                | Self::Source
                | Self::Comment
                | Self::Translation
                | Self::NumerusForm
                | Self::LengthVariant
        )
    }
}

/// Context being read.
#[derive(Debug, Default)]
struct PendingContext {
    /// Context name once `<name>` closed.
    name: Option<String>,
    /// Messages read so far.
    messages: Vec<MessageEntry>,
}

/// Message being read.
#[derive(Debug, Default)]
struct PendingMessage {
    /// `numerus="yes"`.
    numerus: bool,
    /// Source text once `<source>` closed.
    source: Option<String>,
    /// Disambiguation comment.
    comment: Option<String>,
    /// Plain translation text.
    translation: String,
    /// `<numerusform>` texts in order.
    forms: Vec<String>,
    /// First `<lengthvariant>` of the enclosing translation or form.
    variant: Option<String>,
    /// Whether `<translation>` holds child elements; its own text is then
    /// only indentation.
    structured: bool,
    /// `type` attribute of `<translation>`.
    kind: Option<String>,
}

/// Streaming state for one document.
#[derive(Debug, Default)]
struct TsParser {
    /// Open elements.
    stack: Vec<Node>,
    /// Catalog created from the root element.
    catalog: Option<Catalog>,
    /// Whether `</TS>` was seen.
    closed: bool,
    /// Context being read.
    context: Option<PendingContext>,
    /// Message being read.
    message: Option<PendingMessage>,
    /// Character data of the innermost capturing element.
    text: String,
}

impl TsParser {
    /// Handle an opening tag (also the first half of an empty element).
    fn start(&mut self, e: &BytesStart<'_>, pos: u64) -> Result<(), LoadError> {
        let name = e.name();
        let tag = name.as_ref();
        let node = match self.stack.last().copied() {
            None => {
                if self.catalog.is_some() {
                    return Err(LoadError::malformed(pos, "content after the <TS> root element"));
                }
                if tag != b"TS" {
                    return Err(LoadError::malformed(
                        pos,
                        format!(
                            "root element must be <TS>, found <{}>",
                            String::from_utf8_lossy(tag)
                        ),
                    ));
                }
                self.catalog = Some(root_catalog(e, pos)?);
                Node::Ts
            }
            Some(Node::Ts) if tag == b"context" => {
                self.context = Some(PendingContext::default());
                Node::Context
            }
            Some(Node::Context) if tag == b"name" => Node::Name,
            Some(Node::Context) if tag == b"message" => {
                self.message = Some(PendingMessage {
                    numerus: attribute(e, b"numerus", pos)?.as_deref() == Some("yes"),
                    ..PendingMessage::default()
                });
                Node::Message
            }
            Some(Node::Message) if tag == b"source" => Node::Source,
            Some(Node::Message) if tag == b"comment" => Node::Comment,
            Some(Node::Message) if tag == b"translation" => {
                if let Some(msg) = self.message.as_mut() {
                    msg.kind = attribute(e, b"type", pos)?;
                }
                Node::Translation
            }
            Some(Node::Translation) if tag == b"numerusform" => {
                if let Some(msg) = self.message.as_mut() {
                    msg.structured = true;
                    msg.variant = None;
                }
                Node::NumerusForm
            }
            Some(parent @ (Node::Translation | Node::NumerusForm))
                if tag == b"lengthvariant" =>
            {
                if let Some(msg) = self.message.as_mut() {
                    msg.structured |= parent == Node::Translation;
                }
                Node::LengthVariant
            }
            Some(_) => Node::Other,
        };
        if node.captures_text() {
            self.text.clear();
        }
        self.stack.push(node);
        Ok(())
    }

    /// Handle a closing tag.
    fn end(&mut self, pos: u64) -> Result<(), LoadError> {
        let node = self
            .stack
            .pop()
            .ok_or_else(|| LoadError::malformed(pos, "closing tag without an open element"))?;
        match node {
            Node::Name => {
                if let Some(ctx) = self.context.as_mut() {
                    ctx.name = Some(std::mem::take(&mut self.text));
                }
            }
            Node::Source => {
                if let Some(msg) = self.message.as_mut() {
                    msg.source = Some(std::mem::take(&mut self.text));
                }
            }
            Node::Comment => {
                if let Some(msg) = self.message.as_mut() {
                    let comment = std::mem::take(&mut self.text);
                    msg.comment = (!comment.is_empty()).then_some(comment);
                }
            }
            Node::LengthVariant => {
                let text = std::mem::take(&mut self.text);
                if let Some(msg) = self.message.as_mut()
                    && msg.variant.is_none()
                {
                    msg.variant = Some(text);
                }
            }
            Node::NumerusForm => {
                let text = std::mem::take(&mut self.text);
                if let Some(msg) = self.message.as_mut() {
                    let form = msg.variant.take().unwrap_or(text);
                    msg.forms.push(form);
                }
            }
            Node::Translation => {
                let text = std::mem::take(&mut self.text);
                if let Some(msg) = self.message.as_mut() {
                    msg.translation = if msg.structured {
                        msg.variant.take().unwrap_or_default()
                    } else {
                        text
                    };
                }
            }
            Node::Message => self.finish_message(pos)?,
            Node::Context => self.finish_context(pos)?,
            Node::Ts => self.closed = true,
            Node::Other => {}
        }
        Ok(())
    }

    /// Append character data if the innermost element keeps it.
    fn push_text(&mut self, text: &str) {
        if self.stack.last().is_some_and(|node| node.captures_text()) {
            self.text.push_str(text);
        }
    }

    /// Turn the pending message into an entry of the pending context.
    fn finish_message(&mut self, pos: u64) -> Result<(), LoadError> {
        let Some(msg) = self.message.take() else {
            return Ok(());
        };
        let source = msg.source.unwrap_or_default();
        if source.is_empty() {
            return Err(LoadError::malformed(pos, "message without source text"));
        }
        if matches!(msg.kind.as_deref(), Some("vanished" | "obsolete")) {
            tracing::debug!("Skipping {} message '{}'", msg.kind.unwrap_or_default(), source);
            return Ok(());
        }
        let mut entry = if msg.numerus {
            let mut forms = msg.forms;
            if forms.is_empty() && !msg.translation.is_empty() {
                forms.push(msg.translation);
            }
            MessageEntry::plural(source, forms)
        } else {
            MessageEntry::new(source, msg.translation)
        };
        if let Some(comment) = msg.comment {
            entry = entry.with_disambiguation(comment);
        }
        entry = entry.unfinished(msg.kind.as_deref() == Some("unfinished"));
        if let Some(ctx) = self.context.as_mut() {
            ctx.messages.push(entry);
        }
        Ok(())
    }

    /// Move the pending context into the catalog.
    fn finish_context(&mut self, pos: u64) -> Result<(), LoadError> {
        let Some(ctx) = self.context.take() else {
            return Ok(());
        };
        let name = match ctx.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(LoadError::malformed(pos, "context without a name")),
        };
        let Some(catalog) = self.catalog.as_mut() else {
            return Ok(());
        };
        catalog.ensure_context(&name);
        for entry in ctx.messages {
            catalog.insert(&name, entry)?;
        }
        Ok(())
    }

    /// Validate end of input and hand out the catalog.
    fn finish(self, pos: u64) -> Result<Catalog, LoadError> {
        if let Some(open) = self.stack.last() {
            return Err(LoadError::malformed(
                pos,
                format!("unexpected end of document inside {open:?} element"),
            ));
        }
        match self.catalog {
            Some(catalog) if self.closed => Ok(catalog),
            _ => Err(LoadError::malformed(pos, "document has no <TS> root element")),
        }
    }
}

/// What: Read an attribute value from a start tag.
///
/// Inputs:
/// - `e`: Start tag
/// - `key`: Attribute name
/// - `pos`: Byte offset for error reporting
///
/// Output:
/// - `Ok(Some(value))` with entities decoded, `Ok(None)` when absent
fn attribute(e: &BytesStart<'_>, key: &[u8], pos: u64) -> Result<Option<String>, LoadError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LoadError::malformed(pos, format!("bad attribute: {err}")))?;
        if attr.key.as_ref() == key {
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw)
                .map_err(|err| LoadError::malformed(pos, format!("bad attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Build the empty catalog described by the `<TS>` root attributes.
fn root_catalog(e: &BytesStart<'_>, pos: u64) -> Result<Catalog, LoadError> {
    let language = attribute(e, b"language", pos)?.unwrap_or_default();
    let locale = LocaleTag::parse(&language).map_err(|err| {
        tracing::debug!("Catalog language attribute '{}' rejected: {}", language, err);
        LoadError::MissingLocaleTag
    })?;
    let source_locale = attribute(e, b"sourcelanguage", pos)?
        .and_then(|raw| LocaleTag::parse(&raw).ok());
    let version = attribute(e, b"version", pos)?;
    Ok(Catalog::new(locale)
        .with_source_locale(source_locale)
        .with_version(version))
}

/// Decode `&name;` and `&#NN;` references.
fn resolve_reference(reference: &BytesRef<'_>, pos: u64) -> Result<String, LoadError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| LoadError::malformed(pos, format!("bad character reference: {err}")))?
    {
        return Ok(ch.to_string());
    }
    let name = reference
        .decode()
        .map_err(|err| LoadError::malformed(pos, err.to_string()))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| LoadError::malformed(pos, format!("unknown entity '&{name};'")))
}

/// Reader offsets as `u64`.
fn offset<T: TryInto<u64>>(raw: T) -> u64 {
    raw.try_into().unwrap_or(u64::MAX)
}

/// What: Parse a `.ts` document into a catalog.
///
/// Inputs:
/// - `document`: Full XML text of one catalog
///
/// Output:
/// - Parsed `Catalog`, or the first `LoadError` encountered
///
/// # Errors
/// - `LoadError::Malformed` for XML errors, a root other than `<TS>`,
///   contexts without a name, messages without source text, unknown
///   entities or unclosed elements
/// - `LoadError::MissingLocaleTag` when `language` is absent, empty or not
///   a locale tag
/// - `LoadError::DuplicateMessage` when a key repeats within a context
///
/// Details:
/// - `type="vanished"` and `type="obsolete"` messages are dropped;
///   `type="unfinished"` messages are kept and flagged
/// - Text is taken verbatim; line breaks inside translations survive
/// - Of several `<lengthvariant>`s the first one is used
pub fn parse_catalog(document: &str) -> Result<Catalog, LoadError> {
    let mut reader = Reader::from_str(document);
    let mut parser = TsParser::default();

    loop {
        let pos = offset(reader.buffer_position());
        match reader.read_event() {
            Ok(Event::Start(e)) => parser.start(&e, pos)?,
            Ok(Event::Empty(e)) => {
                parser.start(&e, pos)?;
                parser.end(pos)?;
            }
            Ok(Event::End(_)) => parser.end(pos)?,
            Ok(Event::Text(e)) => {
                let text = e
                    .xml_content()
                    .map_err(|err| LoadError::malformed(pos, format!("text decode error: {err}")))?;
                parser.push_text(&text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.into_inner().as_ref()).into_owned();
                parser.push_text(&text);
            }
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_reference(&e, pos)?;
                parser.push_text(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(LoadError::malformed(
                    offset(reader.error_position()),
                    err.to_string(),
                ));
            }
        }
    }

    parser.finish(offset(reader.buffer_position()))
}

/// What: Read and parse one catalog file.
///
/// Inputs:
/// - `path`: Path to a `.ts` file
///
/// Output:
/// - Parsed `Catalog`
///
/// # Errors
/// - `LoadError::Io` when the file cannot be read
/// - Any error from [`parse_catalog`]
pub fn load_catalog_file(path: &Path) -> Result<Catalog, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&contents)
}

/// File name of the catalog for a locale (`tomeo_es_ES.ts`).
#[must_use]
pub fn catalog_file_name(prefix: &str, locale: &LocaleTag) -> String {
    format!("{prefix}_{locale}.ts")
}

/// Locates catalog files on disk and caches what it loaded.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    /// Directories tried in order.
    search_dirs: Vec<PathBuf>,
    /// File name prefix.
    prefix: String,
    /// Catalogs loaded so far.
    cache: HashMap<LocaleTag, Arc<Catalog>>,
}

impl CatalogLoader {
    /// What: Create a loader.
    ///
    /// Inputs:
    /// - `search_dirs`: Directories tried in order; the first hit wins
    /// - `prefix`: Catalog file prefix (`tomeo`)
    ///
    /// Output:
    /// - Loader with an empty cache
    #[must_use]
    pub fn new(search_dirs: Vec<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            search_dirs,
            prefix: prefix.into(),
            cache: HashMap::new(),
        }
    }

    /// Loader using the configured prefix and the directories from
    /// [`find_catalog_dirs`](crate::i18n::find_catalog_dirs).
    #[must_use]
    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(crate::i18n::find_catalog_dirs(config), config.catalog_prefix.clone())
    }

    /// Search directories in order.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Catalog file prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// What: Find the catalog file for a locale.
    ///
    /// Inputs:
    /// - `locale`: Requested locale
    ///
    /// Output:
    /// - Path in the first search directory that has the file, or `None`
    #[must_use]
    pub fn locate(&self, locale: &LocaleTag) -> Option<PathBuf> {
        let file_name = catalog_file_name(&self.prefix, locale);
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }

    /// What: Load a catalog, using the cache when possible.
    ///
    /// Inputs:
    /// - `locale`: Requested locale
    ///
    /// Output:
    /// - Shared catalog
    ///
    /// # Errors
    /// - See [`CatalogLoader::load_uncached`]
    ///
    /// Details:
    /// - Successful loads are cached until [`CatalogLoader::invalidate`]
    /// - Failures are not cached; a missing file is logged at debug level,
    ///   anything else at warn
    pub fn load(&mut self, locale: &LocaleTag) -> Result<Arc<Catalog>, LoadError> {
        if let Some(cached) = self.cache.get(locale) {
            return Ok(Arc::clone(cached));
        }
        match self.load_uncached(locale) {
            Ok(catalog) => {
                let stats = catalog.stats();
                tracing::debug!(
                    "Loaded catalog '{}': {} contexts, {} messages ({} unfinished)",
                    locale,
                    stats.contexts,
                    stats.messages,
                    stats.unfinished
                );
                let shared = Arc::new(catalog);
                self.cache.insert(locale.clone(), Arc::clone(&shared));
                Ok(shared)
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::debug!("No catalog for locale '{}': {}", locale, err);
                } else {
                    tracing::warn!("Failed to load catalog for locale '{}': {}", locale, err);
                }
                Err(err)
            }
        }
    }

    /// What: Load a catalog from disk without touching the cache.
    ///
    /// Inputs:
    /// - `locale`: Requested locale
    ///
    /// Output:
    /// - Freshly parsed catalog
    ///
    /// # Errors
    /// - `LoadError::NotFound` when no search directory has the file
    /// - `LoadError::LocaleMismatch` when the file declares another locale
    /// - Any error from [`load_catalog_file`]
    pub fn load_uncached(&self, locale: &LocaleTag) -> Result<Catalog, LoadError> {
        let path = self.locate(locale).ok_or_else(|| LoadError::NotFound {
            locale: locale.clone(),
            searched: self.search_dirs.clone(),
        })?;
        let catalog = load_catalog_file(&path)?;
        if catalog.locale() != locale {
            return Err(LoadError::LocaleMismatch {
                path,
                expected: locale.clone(),
                found: catalog.locale().clone(),
            });
        }
        Ok(catalog)
    }

    /// Cached catalog for a locale, if loaded.
    #[must_use]
    pub fn cached(&self, locale: &LocaleTag) -> Option<Arc<Catalog>> {
        self.cache.get(locale).cloned()
    }

    /// Drop a cached catalog so the next load rereads the file.
    pub fn invalidate(&mut self, locale: &LocaleTag) -> bool {
        self.cache.remove(locale).is_some()
    }

    /// What: List locales that have a catalog file in any search directory.
    ///
    /// Output:
    /// - Sorted, de-duplicated locale tags
    ///
    /// Details:
    /// - Matches `{prefix}_{locale}.ts`; unreadable directories and file
    ///   names that are not locale tags are skipped
    #[must_use]
    pub fn available_locales(&self) -> Vec<LocaleTag> {
        let head = format!("{}_", self.prefix);
        let mut found = BTreeSet::new();
        for dir in &self.search_dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                if let Some(name) = name.to_str()
                    && let Some(rest) = name.strip_prefix(&head)
                    && let Some(raw) = rest.strip_suffix(".ts")
                    && let Ok(tag) = LocaleTag::parse(raw)
                {
                    found.insert(tag);
                }
            }
        }
        found.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tag(raw: &str) -> LocaleTag {
        LocaleTag::parse(raw).expect("test tag should parse")
    }

    fn ts(language: &str, body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"{language}\">\n{body}\n</TS>\n"
        )
    }

    fn malformed(result: Result<Catalog, LoadError>) -> String {
        match result {
            Err(LoadError::Malformed { reason, .. }) => reason,
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_basic_catalog() {
        let doc = ts(
            "es_ES",
            r#"<context>
    <name>PlaybackControls</name>
    <message>
        <location filename="controls.cpp" line="12"/>
        <source>Play</source>
        <translation>Reproducir</translation>
    </message>
    <message>
        <source>Pause</source>
        <extracomment>button</extracomment>
        <translation>Pausa</translation>
    </message>
</context>"#,
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        assert_eq!(catalog.locale(), &tag("es_ES"));
        assert_eq!(catalog.version(), Some("2.1"));
        assert_eq!(
            catalog.template("PlaybackControls", "Play", None, None),
            Some("Reproducir")
        );
        assert_eq!(
            catalog.template("PlaybackControls", "Pause", None, None),
            Some("Pausa")
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_entities_cdata_and_line_breaks() {
        let doc = ts(
            "es_ES",
            "<context>\n<name>SocialFeedWidget</name>\n<message>\n<source>Your friends haven&apos;t posted any videos yet.\nAdd more friends!</source>\n<translation>Tus amigos a&#250;n no han publicado videos.\n&#xA1;Agrega m&#225;s amigos!</translation>\n</message>\n<message>\n<source>Q &amp; A</source>\n<translation><![CDATA[P & R <beta>]]></translation>\n</message>\n</context>",
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        assert_eq!(
            catalog.template(
                "SocialFeedWidget",
                "Your friends haven't posted any videos yet.\nAdd more friends!",
                None,
                None
            ),
            Some("Tus amigos aún no han publicado videos.\n¡Agrega más amigos!")
        );
        assert_eq!(
            catalog.template("SocialFeedWidget", "Q & A", None, None),
            Some("P & R <beta>")
        );
    }

    #[test]
    fn test_translation_types() {
        let doc = ts(
            "zh_CN",
            r#"<context>
<name>TopToolbar</name>
<message><source>Home</source><translation type="unfinished">首页</translation></message>
<message><source>Old</source><translation type="vanished">旧</translation></message>
<message><source>Older</source><translation type="obsolete">更旧</translation></message>
<message><source>Later</source><translation type="unfinished"/></message>
</context>"#,
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        let home = catalog
            .message("TopToolbar", "Home", None)
            .expect("unfinished kept");
        assert!(home.is_unfinished());
        assert_eq!(catalog.template("TopToolbar", "Home", None, None), Some("首页"));
        assert!(catalog.message("TopToolbar", "Old", None).is_none());
        assert!(catalog.message("TopToolbar", "Older", None).is_none());
        assert!(catalog.message("TopToolbar", "Later", None).is_some());
        assert_eq!(catalog.template("TopToolbar", "Later", None, None), None);
        assert_eq!(catalog.stats().unfinished, 2);
    }

    #[test]
    fn test_numerus_and_disambiguation() {
        let doc = ts(
            "es_ES",
            r#"<context>
<name>SocialFeedWidget</name>
<message numerus="yes">
    <source>%n new video(s)</source>
    <translation>
        <numerusform>%n vídeo nuevo</numerusform>
        <numerusform>%n vídeos nuevos</numerusform>
    </translation>
</message>
<message>
    <source>Open</source>
    <comment>verb</comment>
    <translation>Abrir</translation>
</message>
<message>
    <source>Open</source>
    <comment>adjective</comment>
    <translation>Abierto</translation>
</message>
</context>"#,
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        assert_eq!(
            catalog.template("SocialFeedWidget", "%n new video(s)", None, Some(1)),
            Some("%n vídeo nuevo")
        );
        assert_eq!(
            catalog.template("SocialFeedWidget", "%n new video(s)", None, Some(9)),
            Some("%n vídeos nuevos")
        );
        assert_eq!(
            catalog.template("SocialFeedWidget", "Open", Some("verb"), None),
            Some("Abrir")
        );
        assert_eq!(
            catalog.template("SocialFeedWidget", "Open", Some("adjective"), None),
            Some("Abierto")
        );
        assert_eq!(catalog.template("SocialFeedWidget", "Open", None, None), None);
    }

    #[test]
    fn test_length_variants_and_indentation() {
        let doc = ts(
            "es_ES",
            r#"<context>
<name>PlaybackControls</name>
<message>
    <source>Play</source>
    <translation variants="yes">
        <lengthvariant>Reproducir</lengthvariant>
        <lengthvariant>Rep.</lengthvariant>
    </translation>
</message>
<message numerus="yes">
    <source>%n view(s)</source>
    <translation>
        <numerusform variants="yes">
            <lengthvariant>%n visualización</lengthvariant>
            <lengthvariant>%n vis.</lengthvariant>
        </numerusform>
        <numerusform>%n visualizaciones</numerusform>
    </translation>
</message>
<message numerus="yes">
    <source>%n like(s)</source>
    <translation>%n me gusta</translation>
</message>
</context>"#,
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        assert_eq!(
            catalog.template("PlaybackControls", "Play", None, None),
            Some("Reproducir")
        );
        assert_eq!(
            catalog.template("PlaybackControls", "%n view(s)", None, Some(1)),
            Some("%n visualización")
        );
        assert_eq!(
            catalog.template("PlaybackControls", "%n view(s)", None, Some(4)),
            Some("%n visualizaciones")
        );
        let forms = match catalog
            .message("PlaybackControls", "%n view(s)", None)
            .map(MessageEntry::translation)
        {
            Some(crate::i18n::catalog::Translation::Plural(forms)) => forms.len(),
            other => panic!("expected plural entry, got {other:?}"),
        };
        assert_eq!(forms, 2);
        // Plain text in a numerus message is its only form.
        assert_eq!(
            catalog.template("PlaybackControls", "%n like(s)", None, Some(3)),
            Some("%n me gusta")
        );
    }

    #[test]
    fn test_source_language_attribute() {
        let doc = "<TS version=\"2.1\" language=\"zh_CN\" sourcelanguage=\"en\"></TS>";
        let catalog = parse_catalog(doc).expect("catalog parses");
        assert_eq!(catalog.source_locale(), Some(&tag("en")));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_locale_tag() {
        for doc in [
            "<TS version=\"2.1\"></TS>",
            "<TS version=\"2.1\" language=\"\"></TS>",
            "<TS version=\"2.1\" language=\"not a tag\"></TS>",
        ] {
            assert!(
                matches!(parse_catalog(doc), Err(LoadError::MissingLocaleTag)),
                "{doc}"
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        assert!(malformed(parse_catalog("<catalog language=\"es_ES\"/>")).contains("root element"));
        assert!(malformed(parse_catalog("")).contains("no <TS> root"));
        assert!(
            malformed(parse_catalog(&ts(
                "es_ES",
                "<context><message><source>Play</source></message></context>"
            )))
            .contains("context without a name")
        );
        assert!(
            malformed(parse_catalog(&ts(
                "es_ES",
                "<context><name>A</name><message><source></source><translation>x</translation></message></context>"
            )))
            .contains("without source text")
        );
        assert!(
            malformed(parse_catalog(&ts(
                "es_ES",
                "<context><name>A</name><message><source>a &bogus; b</source></message></context>"
            )))
            .contains("unknown entity")
        );
        // Unclosed root.
        let _ = malformed(parse_catalog(
            "<TS version=\"2.1\" language=\"es_ES\"><context><name>A</name></context>",
        ));
        // Mismatched closing tag.
        let _ = malformed(parse_catalog(
            "<TS language=\"es_ES\"><context><name>A</name></message></TS>",
        ));
    }

    #[test]
    fn test_duplicate_message_rejected() {
        let doc = ts(
            "es_ES",
            "<context><name>PlaybackControls</name>\
             <message><source>Play</source><translation>Reproducir</translation></message>\
             <message><source>Play</source><translation>Jugar</translation></message>\
             </context>",
        );
        match parse_catalog(&doc) {
            Err(LoadError::DuplicateMessage {
                context,
                source_text,
                ..
            }) => {
                assert_eq!(context, "PlaybackControls");
                assert_eq!(source_text, "Play");
            }
            other => panic!("expected DuplicateMessage, got {other:?}"),
        }
    }

    #[test]
    fn test_same_source_in_two_contexts_is_fine() {
        let doc = ts(
            "es_ES",
            "<context><name>TopToolbar</name>\
             <message><source>Settings</source><translation>Ajustes</translation></message></context>\
             <context><name>SettingsDialog</name>\
             <message><source>Settings</source><translation>Configuración</translation></message></context>",
        );
        let catalog = parse_catalog(&doc).expect("catalog parses");
        assert_eq!(
            catalog.template("TopToolbar", "Settings", None, None),
            Some("Ajustes")
        );
        assert_eq!(
            catalog.template("SettingsDialog", "Settings", None, None),
            Some("Configuración")
        );
    }

    fn write_catalog(dir: &Path, file: &str, language: &str, play: &str) {
        let doc = ts(
            language,
            &format!(
                "<context><name>PlaybackControls</name><message><source>Play</source><translation>{play}</translation></message></context>"
            ),
        );
        fs::write(dir.join(file), doc).expect("Failed to write test catalog");
    }

    #[test]
    fn test_loader_first_directory_wins() {
        let first = TempDir::new().expect("Failed to create temp directory for test");
        let second = TempDir::new().expect("Failed to create temp directory for test");
        write_catalog(second.path(), "tomeo_es_ES.ts", "es_ES", "Reproducir (2)");
        write_catalog(first.path(), "tomeo_es_ES.ts", "es_ES", "Reproducir (1)");
        write_catalog(second.path(), "tomeo_zh_CN.ts", "zh_CN", "播放");

        let mut loader = CatalogLoader::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            "tomeo",
        );
        let es = loader.load(&tag("es_ES")).expect("es_ES loads");
        assert_eq!(
            es.template("PlaybackControls", "Play", None, None),
            Some("Reproducir (1)")
        );
        assert_eq!(
            loader.locate(&tag("zh_CN")),
            Some(second.path().join("tomeo_zh_CN.ts"))
        );
        assert_eq!(loader.available_locales(), vec![tag("es_ES"), tag("zh_CN")]);
    }

    #[test]
    fn test_loader_cache_and_invalidate() {
        let dir = TempDir::new().expect("Failed to create temp directory for test");
        write_catalog(dir.path(), "tomeo_es_ES.ts", "es_ES", "Reproducir");
        let mut loader = CatalogLoader::new(vec![dir.path().to_path_buf()], "tomeo");

        let first = loader.load(&tag("es_ES")).expect("es_ES loads");
        fs::remove_file(dir.path().join("tomeo_es_ES.ts")).expect("remove catalog");
        let second = loader.load(&tag("es_ES")).expect("served from cache");
        assert!(Arc::ptr_eq(&first, &second));

        assert!(loader.invalidate(&tag("es_ES")));
        assert!(!loader.invalidate(&tag("es_ES")));
        assert!(loader.load(&tag("es_ES")).is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn test_loader_not_found_and_mismatch() {
        let dir = TempDir::new().expect("Failed to create temp directory for test");
        write_catalog(dir.path(), "tomeo_es_MX.ts", "es_ES", "Reproducir");
        fs::write(dir.path().join("tomeo_broken.ts"), "<TS").expect("write");
        fs::write(dir.path().join("notes.txt"), "x").expect("write");
        let mut loader = CatalogLoader::new(vec![dir.path().to_path_buf()], "tomeo");

        match loader.load(&tag("fr_FR")) {
            Err(LoadError::NotFound { locale, searched }) => {
                assert_eq!(locale, tag("fr_FR"));
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        match loader.load(&tag("es_MX")) {
            Err(LoadError::LocaleMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, tag("es_MX"));
                assert_eq!(found, tag("es_ES"));
            }
            other => panic!("expected LocaleMismatch, got {other:?}"),
        }
        assert!(loader.cached(&tag("es_MX")).is_none());
        assert_eq!(loader.available_locales(), vec![tag("es_MX")]);
    }

    #[test]
    fn test_load_catalog_file_io_error() {
        let dir = TempDir::new().expect("Failed to create temp directory for test");
        let missing = dir.path().join("nope.ts");
        match load_catalog_file(&missing) {
            Err(LoadError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
