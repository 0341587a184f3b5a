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

//! Convert a PO file for ISO 3166 into a localized `countries.xml`.
//!
//! Suitable PO files ship with Debian's `iso-codes` package, see
//! <https://packages.debian.org/source/sid/iso-codes>. By default the
//! catalog is read through `po2csv` from the Translate Toolkit; pass
//! `--in-process` to parse it directly instead.
//!
//! The result is written to `<base-dir>/locale/<locale>/countries.xml`.

use clap::Parser;
use log::{debug, info};
use po_to_countries::countries::CountriesXml;
use po_to_countries::extract::{CatalogReader, Extractor, Po2Csv, DEFAULT_PO2CSV};
use po_to_countries::locale::{LocaleDirectory, LocaleRegistry};
use po_to_countries::{convert, Conversion};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Clone, Debug, Parser)]
#[command(about = "Convert a PO file of country names to a localized countries.xml")]
struct Args {
    /// Locale to generate, e.g. fr_CA.
    locale: Option<String>,
    /// The translated PO file.
    #[arg(id = "translation.po")]
    translation_file: Option<PathBuf>,
    /// Directory containing the locale/ tree.
    #[arg(long, env = "PO_TO_COUNTRIES_BASE_DIR", default_value = "lib/pkp")]
    base_dir: PathBuf,
    /// PO to CSV converter to run on the translation file.
    #[arg(long, env = "PO2CSV", default_value = DEFAULT_PO2CSV)]
    po2csv: PathBuf,
    /// Parse the PO file directly instead of running the converter.
    #[arg(long)]
    in_process: bool,
    /// English country list [default: <base-dir>/locale/en_US/countries.xml].
    #[arg(long)]
    countries: Option<PathBuf>,
    /// Escape XML special characters in country names.
    #[arg(long)]
    escape: bool,
    /// List translations which match no country.
    #[arg(long)]
    report_orphans: bool,
}

/// Returns the locale and translation file if both are usable.
fn validate<'a>(args: &'a Args, locales: &dyn LocaleRegistry) -> Option<(&'a str, &'a Path)> {
    let locale = args.locale.as_deref()?;
    let translation_file = args.translation_file.as_deref()?;
    if !locales.is_valid(locale) || !translation_file.is_file() {
        return None;
    }
    Some((locale, translation_file))
}

fn usage(program: &str) -> String {
    format!(
        "Script to convert PO file to PKP's ISO3166 XML format\n\
         Usage: {program} locale /path/to/translation.po"
    )
}

fn run(args: &Args, locale: &str, po_file: &Path) -> anyhow::Result<()> {
    let extractor: Box<dyn Extractor> = if args.in_process {
        Box::new(CatalogReader)
    } else {
        Box::new(Po2Csv::new(&args.po2csv))
    };
    let registry = match &args.countries {
        Some(path) => CountriesXml::new(path),
        None => CountriesXml::in_base_dir(&args.base_dir),
    };
    let conversion = Conversion {
        locale,
        po_file,
        base_dir: &args.base_dir,
        escape: args.escape,
    };

    let outcome = convert(&conversion, extractor.as_ref(), &registry)?;

    for (source, translation) in &outcome.report.orphans {
        if args.report_orphans {
            info!("No country named \"{source}\" (translated as \"{translation}\")");
        } else {
            debug!("No country named \"{source}\"");
        }
    }
    info!(
        "Wrote {} countries to {} ({} untranslated)",
        outcome.written,
        outcome.output_path.display(),
        outcome.report.fallbacks.len()
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let args = Args::parse();

    let locales = LocaleDirectory::new(&args.base_dir);
    let Some((locale, po_file)) = validate(&args, &locales) else {
        let program = std::env::args()
            .next()
            .unwrap_or_else(|| String::from("po-to-countries"));
        println!("{}", usage(&program));
        return ExitCode::from(1);
    };

    match run(&args, locale, po_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
