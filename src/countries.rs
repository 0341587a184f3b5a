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

//! The canonical table of ISO 3166 codes and English country names.

use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered mapping from ISO country code to English name.
///
/// Iteration follows insertion order. Inserting a code a second time
/// replaces its name but keeps its original position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountryTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CountryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        let code = code.into();
        let name = name.into();
        match self.index.get(&code) {
            Some(&idx) => self.entries[idx].1 = name,
            None => {
                self.index.insert(code.clone(), self.entries.len());
                self.entries.push((code, name));
            }
        }
    }

    /// Iterate over `(code, name)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for CountryTable {
    fn from_iter<T: IntoIterator<Item = (C, N)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (code, name) in iter {
            table.insert(code, name);
        }
        table
    }
}

/// A source for the English country table.
pub trait CountryRegistry {
    fn countries(&self) -> anyhow::Result<CountryTable>;
}

impl CountryRegistry for CountryTable {
    fn countries(&self) -> anyhow::Result<CountryTable> {
        Ok(self.clone())
    }
}

/// Country table stored as an English `countries.xml` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountriesXml {
    pub path: PathBuf,
}

impl CountriesXml {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The English table below `base_dir`, i.e.
    /// `locale/en_US/countries.xml`.
    pub fn in_base_dir(base_dir: &Path) -> Self {
        Self::new(base_dir.join("locale").join("en_US").join("countries.xml"))
    }
}

impl CountryRegistry for CountriesXml {
    fn countries(&self) -> anyhow::Result<CountryTable> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Could not read {}", self.path.display()))?;
        let table = parse_countries(&content)
            .with_context(|| format!("Could not parse {} as XML", self.path.display()))?;
        log::debug!(
            "Loaded {} countries from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Collect `<country name="..." code="..."/>` elements in document order.
///
/// Elements missing either attribute are ignored.
pub fn parse_countries(xml: &str) -> anyhow::Result<CountryTable> {
    let document = roxmltree::Document::parse(xml)?;
    let mut table = CountryTable::new();
    for node in document
        .descendants()
        .filter(|node| node.has_tag_name("country"))
    {
        match (node.attribute("code"), node.attribute("name")) {
            (Some(code), Some(name)) => table.insert(code, name),
            _ => log::debug!(
                "Skipping incomplete country element at byte {}",
                node.range().start
            ),
        }
    }
    Ok(table)
}
