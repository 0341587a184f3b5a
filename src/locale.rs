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

//! Checking locale identifiers such as `fr_CA` or `sr_RS@latin`.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Decides which locale identifiers are acceptable.
pub trait LocaleRegistry {
    fn is_valid(&self, locale: &str) -> bool;
}

/// Returns true if `locale` has the `ll_CC` shape with an optional
/// `@variant` suffix.
pub fn is_well_formed(locale: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        let pattern = r"(?x)
              ^[a-z][a-z]                           # language
              _[A-Z][A-Z]                           # country
              (@([A-Za-z0-9]{5,8}|\d[A-Za-z0-9]{3}))?  # optional variant
              $
        ";
        Regex::new(pattern).expect("well-formed regex")
    });
    re.is_match(locale)
}

/// Locales which have a `locale/<locale>` directory below a base
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleDirectory {
    pub base_dir: PathBuf,
}

impl LocaleDirectory {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl LocaleRegistry for LocaleDirectory {
    fn is_valid(&self, locale: &str) -> bool {
        is_well_formed(locale) && self.base_dir.join("locale").join(locale).is_dir()
    }
}

/// A fixed set of locales.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KnownLocales(BTreeSet<String>);

impl<S: Into<String>> FromIterator<S> for KnownLocales {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl LocaleRegistry for KnownLocales {
    fn is_valid(&self, locale: &str) -> bool {
        is_well_formed(locale) && self.0.contains(locale)
    }
}
