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

//! Reading translations out of a PO file.
//!
//! Every extractor produces records with three fields: a comment
//! (usually the source location), the English text and the
//! translation. Records of any other shape are ignored.

use anyhow::{anyhow, bail, Context};
use polib::po_file;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default location of the `po2csv` tool from the Translate Toolkit.
pub const DEFAULT_PO2CSV: &str = "/usr/bin/po2csv";

/// Mapping from English text to translated text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationMap {
    entries: HashMap<String, String>,
}

impl TranslationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(comment, source, translation)` records.
    ///
    /// Later records win over earlier records with the same source.
    pub fn from_records<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut map = Self::new();
        for record in records {
            map.insert_record(record);
        }
        map
    }

    /// Add a single record. Returns `false` if the record does not have
    /// exactly three fields and was skipped.
    pub fn insert_record<R>(&mut self, record: R) -> bool
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let fields = record.into_iter().map(Into::into).collect::<Vec<String>>();
        let Ok([_comment, source, translation]) = <[String; 3]>::try_from(fields) else {
            return false;
        };
        self.entries.insert(source, translation);
        true
    }

    #[cfg(test)]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn remove(&mut self, source: &str) -> Option<String> {
        self.entries.remove(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The remaining entries, sorted by source text.
    pub fn into_sorted_vec(self) -> Vec<(String, String)> {
        let mut entries = self.entries.into_iter().collect::<Vec<_>>();
        entries.sort();
        entries
    }
}

/// Something which can turn a PO file into a [`TranslationMap`].
pub trait Extractor {
    fn extract(&self, po_file: &Path) -> anyhow::Result<TranslationMap>;
}

/// Parse CSV in the `location,source,target` shape written by `po2csv`.
///
/// Rows which cannot be decoded or which do not have three fields are
/// skipped. Only I/O errors abort the parse.
pub fn parse_csv<R: Read>(input: R) -> anyhow::Result<TranslationMap> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut map = TranslationMap::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                return Err(err).context("Could not read CSV records");
            }
            Err(err) => {
                log::debug!("Skipping undecodable CSV row: {err}");
                continue;
            }
        };
        if !map.insert_record(&record) {
            log::debug!("Skipping CSV row with {} fields", record.len());
        }
    }
    Ok(map)
}

/// Runs an external PO to CSV converter and reads its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Po2Csv {
    pub program: PathBuf,
}

impl Po2Csv {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Po2Csv {
    fn default() -> Self {
        Self::new(DEFAULT_PO2CSV)
    }
}

impl Extractor for Po2Csv {
    fn extract(&self, po_file: &Path) -> anyhow::Result<TranslationMap> {
        let unable = || {
            format!(
                "Unable to read {} using {}",
                po_file.display(),
                self.program.display()
            )
        };

        let mut child = Command::new(&self.program)
            .arg(po_file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(unable)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("No output pipe"))
            .with_context(unable)?;

        let map = parse_csv(stdout).with_context(unable)?;

        let status = child.wait().with_context(unable)?;
        if !status.success() {
            log::warn!(
                "{} exited with {status} while converting {}",
                self.program.display(),
                po_file.display()
            );
        }
        Ok(map)
    }
}

/// Header fields `polib` cannot do without. It panics instead of
/// returning an error when one of them is missing.
const REQUIRED_HEADER_FIELDS: [&str; 9] = [
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
    "Plural-Forms",
];

fn unquote(line: &str) -> Option<&str> {
    line.strip_prefix('"')?.strip_suffix('"')
}

/// Returns the `msgstr` of the leading `msgid ""` entry, with `\n`
/// escapes turned into newlines.
fn header_entry(content: &str) -> Option<String> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty() || line.starts_with('#'));
    if lines.next()? != r#"msgid """# {
        return None;
    }
    let mut header = unquote(lines.next()?.strip_prefix("msgstr ")?)?.to_string();
    for line in lines {
        let Some(text) = unquote(line) else {
            break;
        };
        header.push_str(text);
    }
    Some(header.replace("\\n", "\n"))
}

/// Lists the required header fields missing from `header`.
fn missing_header_fields(header: &str) -> Vec<&'static str> {
    let present = header
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, _)| key)
        .collect::<Vec<_>>();
    REQUIRED_HEADER_FIELDS
        .into_iter()
        .filter(|field| !present.contains(field))
        .collect()
}

/// Reads the PO file in-process with `polib`.
///
/// Each singular message becomes a `(source location, msgid, msgstr)`
/// record. Plural messages do not fit that shape and are skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatalogReader;

impl Extractor for CatalogReader {
    fn extract(&self, po_file: &Path) -> anyhow::Result<TranslationMap> {
        let content = fs::read_to_string(po_file)
            .with_context(|| format!("Could not read {}", po_file.display()))?;
        // Without a header entry polib reports a proper error by itself.
        if let Some(header) = header_entry(&content) {
            let missing = missing_header_fields(&header);
            if !missing.is_empty() {
                bail!(
                    "Could not parse {po_file:?} as PO file: header lacks {}",
                    missing.join(", ")
                );
            }
        }

        let catalog = po_file::parse(po_file)
            .map_err(|err| anyhow!("{err}"))
            .with_context(|| format!("Could not parse {po_file:?} as PO file"))?;

        let mut map = TranslationMap::new();
        for message in catalog.messages() {
            if message.is_plural() {
                log::debug!("Skipping plural message {:?}", message.msgid());
                continue;
            }
            let Ok(msgstr) = message.msgstr() else {
                continue;
            };
            map.insert_record([message.source(), message.msgid(), msgstr]);
        }
        Ok(map)
    }
}
