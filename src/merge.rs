// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::countries::CountryTable;
use crate::extract::TranslationMap;

/// Final `(code, name)` pairs in country table order.
pub type OutputMap = Vec<(String, String)>;

/// What happened while merging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// `(code, English name)` of countries which had no translation.
    pub fallbacks: Vec<(String, String)>,
    /// Translations whose source text is not in the country table,
    /// sorted by source text.
    pub orphans: Vec<(String, String)>,
}

/// Pair every country in `table` with its translation.
///
/// Countries without a translation keep their English name and a
/// warning is logged. Every code in the table ends up in the output
/// exactly once, in table order.
pub fn merge(mut translations: TranslationMap, table: &CountryTable) -> (OutputMap, MergeReport) {
    let mut output = OutputMap::with_capacity(table.len());
    let mut report = MergeReport::default();

    for (code, english) in table.iter() {
        match translations.remove(english) {
            Some(translation) => output.push((code.to_string(), translation)),
            None => {
                log::warn!("Unknown country \"{english}\"! Using English as default.");
                report.fallbacks.push((code.to_string(), english.to_string()));
                output.push((code.to_string(), english.to_string()));
            }
        }
    }

    report.orphans = translations.into_sorted_vec();
    (output, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    /// Keeps every warning logged by any test in this binary.
    struct WarningCollector;

    impl log::Log for WarningCollector {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn collect_warnings() {
        static COLLECTOR: WarningCollector = WarningCollector;
        // Another test may have installed it already.
        let _ = log::set_logger(&COLLECTOR);
        log::set_max_level(log::LevelFilter::Warn);
    }

    fn create_translations(translations: &[(&str, &str)]) -> TranslationMap {
        TranslationMap::from_records(
            translations
                .iter()
                .map(|&(source, translation)| ["#", source, translation]),
        )
    }

    fn create_table(entries: &[(&str, &str)]) -> CountryTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_merge_with_fallback() {
        let translations = create_translations(&[("Canada", "Canada-T")]);
        let table = create_table(&[("CA", "Canada"), ("US", "United States")]);

        let (output, report) = merge(translations, &table);
        assert_eq!(
            output,
            vec![
                ("CA".to_string(), "Canada-T".to_string()),
                ("US".to_string(), "United States".to_string()),
            ]
        );
        assert_eq!(
            report.fallbacks,
            vec![("US".to_string(), "United States".to_string())]
        );
        assert!(report.orphans.is_empty());
    }

    #[test]
    fn test_merge_follows_table_order() {
        let translations = create_translations(&[
            ("Zambia", "Sambia"),
            ("Albania", "Albanien"),
            ("Mexico", "Mexiko"),
        ]);
        let table = create_table(&[("ZM", "Zambia"), ("AL", "Albania"), ("MX", "Mexico")]);

        let (output, report) = merge(translations, &table);
        assert_eq!(
            output
                .iter()
                .map(|(code, name)| (code.as_str(), name.as_str()))
                .collect::<Vec<_>>(),
            &[("ZM", "Sambia"), ("AL", "Albanien"), ("MX", "Mexiko")]
        );
        assert_eq!(report, MergeReport::default());
    }

    #[test]
    fn test_merge_shared_english_name() {
        // The translation is consumed by the first code, so the second
        // one falls back to English.
        let translations = create_translations(&[("Congo", "Kongo")]);
        let table = create_table(&[("CG", "Congo"), ("CD", "Congo")]);

        let (output, report) = merge(translations, &table);
        assert_eq!(
            output,
            vec![
                ("CG".to_string(), "Kongo".to_string()),
                ("CD".to_string(), "Congo".to_string()),
            ]
        );
        assert_eq!(
            report.fallbacks,
            vec![("CD".to_string(), "Congo".to_string())]
        );
    }

    #[test]
    fn test_merge_reports_orphans() {
        let translations = create_translations(&[
            ("Narnia", "Narnie"),
            ("France", "France"),
            ("Atlantis", "Atlantide"),
        ]);
        let table = create_table(&[("FR", "France")]);

        let (output, report) = merge(translations, &table);
        assert_eq!(output, vec![("FR".to_string(), "France".to_string())]);
        assert!(report.fallbacks.is_empty());
        assert_eq!(
            report.orphans,
            vec![
                ("Atlantis".to_string(), "Atlantide".to_string()),
                ("Narnia".to_string(), "Narnie".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_empty_translation_is_used() {
        let translations = create_translations(&[("Chad", "")]);
        let table = create_table(&[("TD", "Chad")]);

        let (output, report) = merge(translations, &table);
        assert_eq!(output, vec![("TD".to_string(), String::new())]);
        assert!(report.fallbacks.is_empty());
    }

    #[test]
    fn test_merge_warns_about_untranslated_country() {
        collect_warnings();
        let translations = create_translations(&[("Sylvania", "Sylvanie")]);
        let table = create_table(&[("SY", "Sylvania"), ("FD", "Freedonia")]);

        let (output, _) = merge(translations, &table);
        assert_eq!(output[1], ("FD".to_string(), "Freedonia".to_string()));

        let warnings = WARNINGS.lock().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w == "Unknown country \"Freedonia\"! Using English as default."));
        assert!(!warnings.iter().any(|w| w.contains("Sylvania")));
    }
}
