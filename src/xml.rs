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

//! Rendering of the localized `countries.xml` file.

use anyhow::Context;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How to render country names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Escape `&`, `<`, `>` and `"` in attribute values. When unset the
    /// names are written as they are, matching files generated so far.
    pub escape: bool,
}

/// Path of the country list relative to the base directory,
/// e.g. `locale/fr_CA/countries.xml`.
pub fn relative_path(locale: &str) -> PathBuf {
    Path::new("locale").join(locale).join("countries.xml")
}

fn header(locale: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE countries SYSTEM \"../../dtd/countries.dtd\">

<!--
  * locale/{locale}/countries.xml
  *
  * Copyright (c) 2014-2018 Simon Fraser University
  * Copyright (c) 2000-2018 John Willinsky
  * Distributed under the GNU GPL v2. For full terms see the file docs/COPYING.
  *
  * Localized list of countries.
  * Please don't edit or translate. This file is automatically generated using
  * the ISO 3166 files of Debian's iso-codes package
  * (https://packages.debian.org/sid/all/iso-codes) using the
  * tools/poToCountries.php tool.
  -->

<countries>
"
    )
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Write the document for `locale` with one `<country>` element per
/// `(code, name)` pair.
pub fn render<W: Write>(
    out: &mut W,
    locale: &str,
    countries: &[(String, String)],
    options: &Options,
) -> std::io::Result<()> {
    out.write_all(header(locale).as_bytes())?;
    for (code, name) in countries {
        let name = if options.escape {
            escape_attribute(name)
        } else {
            Cow::Borrowed(name.as_str())
        };
        writeln!(out, "\t<country name=\"{name}\" code=\"{code}\"/>")?;
    }
    out.write_all(b"</countries>")
}

/// Create (or truncate) `path` and render the document into it.
///
/// The parent directory must already exist.
pub fn write_countries(
    path: &Path,
    locale: &str,
    countries: &[(String, String)],
    options: &Options,
) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Unable to open {} for writing", path.display()))?;
    let mut out = BufWriter::new(file);
    render(&mut out, locale, countries, options)
        .and_then(|()| out.flush())
        .with_context(|| format!("Could not write countries to {}", path.display()))?;
    Ok(())
}
