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

//! Helpers for turning a translated ISO 3166 catalog into a localized
//! `countries.xml` file.
//!
//! The translations usually come from the PO files shipped with
//! Debian's `iso-codes` package. Each English country name from the
//! canonical country table is looked up in the catalog, and the
//! result is written out as one `<country>` element per ISO code.
//!
//! The conversion is a straight pipeline: [`extract`] reads the
//! catalog, [`countries`] supplies the English table, [`merge`] pairs
//! them up and [`xml`] writes the result. [`convert`] runs all of it.

pub mod countries;
pub mod extract;
pub mod locale;
pub mod merge;
pub mod xml;

use anyhow::Context;
use countries::CountryRegistry;
use extract::Extractor;
use merge::MergeReport;
use std::path::{Path, PathBuf};

/// Settings for a single conversion run.
#[derive(Debug, Clone)]
pub struct Conversion<'a> {
    /// Locale to generate, e.g. `fr_CA`.
    pub locale: &'a str,
    /// The translated PO file.
    pub po_file: &'a Path,
    /// Directory holding the `locale/` tree.
    pub base_dir: &'a Path,
    /// Escape XML special characters in country names.
    pub escape: bool,
}

/// Summary of a finished conversion.
#[derive(Debug)]
pub struct Outcome {
    /// Path of the written `countries.xml`.
    pub output_path: PathBuf,
    /// Number of `<country>` elements written.
    pub written: usize,
    /// Untranslated countries and unused translations.
    pub report: MergeReport,
}

/// Convert `conversion.po_file` into `locale/<locale>/countries.xml`.
///
/// The locale and input file are assumed to be validated already.
pub fn convert(
    conversion: &Conversion,
    extractor: &dyn Extractor,
    registry: &dyn CountryRegistry,
) -> anyhow::Result<Outcome> {
    let translations = extractor.extract(conversion.po_file)?;
    log::debug!(
        "Read {} translations from {}",
        translations.len(),
        conversion.po_file.display()
    );

    let table = registry
        .countries()
        .context("Could not load the English country table")?;
    let (output, report) = merge::merge(translations, &table);

    let output_path = conversion.base_dir.join(xml::relative_path(conversion.locale));
    let options = xml::Options {
        escape: conversion.escape,
    };
    xml::write_countries(&output_path, conversion.locale, &output, &options)?;

    Ok(Outcome {
        output_path,
        written: output.len(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use countries::CountryTable;
    use extract::TranslationMap;
    use pretty_assertions::assert_eq;
    use std::fs;

    struct FixedExtractor(Vec<(&'static str, &'static str)>);

    impl Extractor for FixedExtractor {
        fn extract(&self, _po_file: &Path) -> anyhow::Result<TranslationMap> {
            Ok(TranslationMap::from_records(self.0.iter().map(
                |&(source, translation)| ["#", source, translation],
            )))
        }
    }

    fn create_table(entries: &[(&str, &str)]) -> CountryTable {
        entries
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn test_convert_writes_locale_file() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        fs::create_dir_all(tmp_dir.path().join("locale/fr_CA"))?;

        let conversion = Conversion {
            locale: "fr_CA",
            po_file: Path::new("fr.po"),
            base_dir: tmp_dir.path(),
            escape: false,
        };
        let extractor = FixedExtractor(vec![("Canada", "Canada-T"), ("Atlantis", "Atlantide")]);
        let table = create_table(&[("CA", "Canada"), ("US", "United States")]);

        let outcome = convert(&conversion, &extractor, &table)?;

        assert_eq!(
            outcome.output_path,
            tmp_dir.path().join("locale/fr_CA/countries.xml")
        );
        assert_eq!(outcome.written, 2);
        assert_eq!(
            outcome.report.fallbacks,
            vec![("US".to_string(), "United States".to_string())]
        );
        assert_eq!(
            outcome.report.orphans,
            vec![("Atlantis".to_string(), "Atlantide".to_string())]
        );

        let written = fs::read_to_string(&outcome.output_path)?;
        assert!(written.ends_with(
            "<countries>\n\
             \t<country name=\"Canada-T\" code=\"CA\"/>\n\
             \t<country name=\"United States\" code=\"US\"/>\n\
             </countries>"
        ));

        tmp_dir.close()?;
        Ok(())
    }

    #[test]
    fn test_convert_is_repeatable() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        fs::create_dir_all(tmp_dir.path().join("locale/de_DE"))?;

        let conversion = Conversion {
            locale: "de_DE",
            po_file: Path::new("de.po"),
            base_dir: tmp_dir.path(),
            escape: false,
        };
        let extractor = FixedExtractor(vec![("Germany", "Deutschland")]);
        let table = create_table(&[("DE", "Germany"), ("FR", "France")]);

        let first = convert(&conversion, &extractor, &table)?;
        let first = fs::read(&first.output_path)?;
        let second = convert(&conversion, &extractor, &table)?;
        let second = fs::read(&second.output_path)?;
        assert_eq!(first, second);

        tmp_dir.close()?;
        Ok(())
    }

    #[test]
    fn test_convert_missing_locale_directory() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;

        let conversion = Conversion {
            locale: "fr_CA",
            po_file: Path::new("fr.po"),
            base_dir: tmp_dir.path(),
            escape: false,
        };
        let extractor = FixedExtractor(vec![]);
        let table = create_table(&[("CA", "Canada")]);

        let err = convert(&conversion, &extractor, &table).unwrap_err();
        assert!(format!("{err}").contains("countries.xml"));

        tmp_dir.close()?;
        Ok(())
    }
}
