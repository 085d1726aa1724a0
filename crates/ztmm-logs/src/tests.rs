//! Property-based tests for the store and the export checksum.

use crate::*;
use proptest::prelude::*;

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn debug_store(capacity: usize) -> LogStore {
    let store = LogStore::new(capacity);
    store.configure(&LoggerConfigPatch::new().min_level(LogLevel::Debug));
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // -------------------------------------------------------------------------
    // Capacity and ordering
    // -------------------------------------------------------------------------

    #[test]
    fn prop_store_keeps_most_recent_in_order(
        capacity in 1usize..50,
        count in 0usize..200
    ) {
        let store = debug_store(capacity);
        for i in 0..count {
            store.info(format!("Log {i}"), None);
        }

        let entries = store.query(None);
        prop_assert_eq!(entries.len(), count.min(capacity));

        let first = count.saturating_sub(capacity);
        for (offset, entry) in entries.iter().enumerate() {
            prop_assert_eq!(&entry.message, &format!("Log {}", first + offset));
        }
    }

    #[test]
    fn prop_levels_below_threshold_are_skipped(
        threshold in level_strategy(),
        level in level_strategy()
    ) {
        let store = LogStore::new(10);
        store.configure(&LoggerConfigPatch::new().min_level(threshold));

        let admitted = store.record(level, "threshold check", None, None, None);
        let expected = level.rank() <= threshold.rank();
        prop_assert_eq!(admitted, expected);
        prop_assert_eq!(store.len(), usize::from(expected));
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------

    #[test]
    fn prop_summary_sums_to_len(
        levels in prop::collection::vec(level_strategy(), 0..100),
        capacity in 1usize..60
    ) {
        let store = debug_store(capacity);
        for level in &levels {
            store.record(*level, "x", None, None, None);
        }

        let summary = store.summarize();
        prop_assert_eq!(summary.total(), store.query(None).len());
        for level in LogLevel::ALL {
            prop_assert_eq!(summary.get(level), store.query(Some(level)).len());
        }
    }

    // -------------------------------------------------------------------------
    // Checksum
    // -------------------------------------------------------------------------

    #[test]
    fn prop_checksum_is_eight_lower_hex(text in ".*") {
        let digest = checksum(&text);
        prop_assert_eq!(digest.len(), 8);
        prop_assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn prop_checksum_is_deterministic(messages in prop::collection::vec("[ -~]{0,40}", 0..20)) {
        let entries: Vec<LogEntry> = messages
            .iter()
            .map(|m| LogEntry::new(LogLevel::Info, m.clone()))
            .collect();
        let json = canonical_json(&entries);
        prop_assert!(json.is_ok());
        if let Ok(json) = json {
            prop_assert_eq!(checksum(&json), checksum(&json));
        }
    }

    #[test]
    fn prop_single_message_edit_changes_checksum(
        message in "[a-z]{1,30}",
        replacement in "[A-Z]{1,30}"
    ) {
        let entry = LogEntry::new(LogLevel::Info, message);
        let mut edited = entry.clone();
        edited.message = replacement;

        let original = canonical_json(std::slice::from_ref(&entry)).map(|j| checksum(&j));
        let changed = canonical_json(std::slice::from_ref(&edited)).map(|j| checksum(&j));
        prop_assert!(original.is_ok() && changed.is_ok());
        prop_assert_ne!(original.ok(), changed.ok());
    }

    // -------------------------------------------------------------------------
    // Export / import
    // -------------------------------------------------------------------------

    #[test]
    fn prop_untouched_exports_verify(
        levels in prop::collection::vec(level_strategy(), 0..40),
        context in prop::option::of("[A-Za-z]{1,12}")
    ) {
        let store = shared_store(25);
        store.configure(&LoggerConfigPatch::new().min_level(LogLevel::Debug).mirror_output(false));
        for (i, level) in levels.iter().enumerate() {
            store.record(*level, format!("event {i}"), context.as_deref(), None, None);
        }

        let transfer = LogTransfer::new(store.clone());
        let report = transfer.export(None).and_then(|json| transfer.import(&json));
        prop_assert!(report.is_ok());
        if let Ok(report) = report {
            prop_assert_eq!(report.entries, store.query(None));
            prop_assert_eq!(report.summary, store.summarize());
        }
    }

    #[test]
    fn prop_logs_edit_without_new_checksum_is_rejected(
        messages in prop::collection::vec("[ -~]{0,24}", 1..12),
        target in any::<prop::sample::Index>(),
        edit in 0u8..4,
        extra in "[a-z]{1,8}"
    ) {
        let entries: Vec<LogEntry> = messages
            .iter()
            .map(|m| LogEntry::new(LogLevel::Info, m.clone()).with_context("Assessment"))
            .collect();
        let value = ExportBundle::new(entries, None).and_then(|b| Ok(serde_json::to_value(b)?));
        prop_assert!(value.is_ok());
        let mut value = value.unwrap_or_default();

        let index = target.index(messages.len());
        let entry = &mut value["logs"][index];
        match edit {
            0 => entry["message"] = serde_json::json!(format!("{}{extra}", messages[index])),
            1 => entry[format!("x_{extra}")] = serde_json::json!(extra),
            2 => entry["level"] = serde_json::json!("ERROR"),
            _ => {
                let map = entry.as_object().cloned().unwrap_or_default();
                *entry = serde_json::Value::Object(map.into_iter().rev().collect());
            }
        }

        let result = verify_import(&value.to_string());
        prop_assert!(
            matches!(result, Err(LogError::ChecksumMismatch { .. })),
            "edit {} on entry {} was accepted",
            edit,
            index
        );
    }
}
