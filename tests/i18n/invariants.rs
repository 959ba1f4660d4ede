//! Property tests for lookup, substitution and elapsed-time bucketing.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use super::{crate_root, tag};

use crate_root::i18n::relative_time::{ElapsedBucket, bucket_elapsed};
use crate_root::i18n::{
    Catalog, LocaleTag, MessageEntry, PlaceholderDiagnostics, Translator, substitute,
};

/// Text without placeholder markers.
fn plain_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ,.!?]{0,24}"
}

proptest! {
    #[test]
    fn source_only_returns_source(context in "[A-Za-z]{1,12}", source in plain_text()) {
        let translator = Translator::source_only(tag("en"));
        prop_assert_eq!(translator.translate(&context, &source, &[]), source);
    }

    #[test]
    fn substitution_fills_every_marker(a in any::<i32>(), b in "[a-z]{0,8}") {
        let out = substitute("%2 then %1 and %L1", &[&a, &b], None);
        prop_assert!(out.unresolved.is_empty());
        prop_assert_eq!(out.text, format!("{b} then {a} and {a}"));
    }

    #[test]
    fn round_trip_and_idempotence(
        entries in prop::collection::btree_map(
            ("[A-Z][a-z]{0,6}", plain_text()),
            plain_text(),
            1..20,
        )
    ) {
        let entries: BTreeMap<(String, String), String> = entries;
        let mut catalog = Catalog::new(tag("es_ES"));
        for ((context, source), translation) in &entries {
            catalog
                .insert(context, MessageEntry::new(source.clone(), translation.clone()))
                .expect("keys are unique");
        }
        prop_assert_eq!(catalog.len(), entries.len());

        let translator = Translator::new(
            tag("es_ES"),
            vec![Arc::new(catalog)],
            Arc::new(PlaceholderDiagnostics::new()),
        );
        for ((context, source), translation) in &entries {
            let first = translator.translate(context, source, &[]);
            prop_assert_eq!(&first, translation);
            prop_assert_eq!(translator.translate(context, source, &[]), first);
        }
    }

    #[test]
    fn duplicate_keys_are_rejected(context in "[A-Z][a-z]{0,6}", source in plain_text()) {
        let mut catalog = Catalog::new(tag("zh_CN"));
        catalog
            .insert(&context, MessageEntry::new(source.clone(), "一"))
            .expect("first insert");
        prop_assert!(catalog.insert(&context, MessageEntry::new(source, "二")).is_err());
        prop_assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn elapsed_value_fits_its_bucket(seconds in 0i64..10_000_000) {
        let elapsed = bucket_elapsed(seconds);
        let secs = u64::try_from(seconds).expect("non-negative");
        let unit = elapsed.bucket.unit_seconds();
        prop_assert!(elapsed.value * unit <= secs);
        prop_assert!(secs < (elapsed.value + 1) * unit);
        match elapsed.bucket {
            ElapsedBucket::Seconds => prop_assert!(secs < 60),
            ElapsedBucket::Minutes => prop_assert!((60..3600).contains(&secs)),
            ElapsedBucket::Hours => prop_assert!((3600..86_400).contains(&secs)),
            ElapsedBucket::Days => prop_assert!(secs >= 86_400),
        }
    }

    #[test]
    fn negative_elapsed_is_zero_seconds(seconds in i64::MIN..0) {
        let elapsed = bucket_elapsed(seconds);
        prop_assert_eq!(elapsed.bucket, ElapsedBucket::Seconds);
        prop_assert_eq!(elapsed.value, 0);
    }

    #[test]
    fn locale_tags_normalize_idempotently(
        lang in "[a-zA-Z]{2,3}",
        region in prop::option::of("[a-zA-Z]{2}"),
        dash in any::<bool>(),
    ) {
        let sep = if dash { "-" } else { "_" };
        let raw = region.map_or_else(|| lang.clone(), |r| format!("{lang}{sep}{r}"));
        let parsed = LocaleTag::parse(&raw).expect("well-formed tag");
        prop_assert_eq!(LocaleTag::parse(parsed.as_str()).expect("canonical form parses"), parsed.clone());
        prop_assert_eq!(parsed.language(), lang.to_ascii_lowercase());
    }
}
