//! Implementation of the `sprout list` command.

use std::io;

use sprout_core::domain::Language as CoreLanguage;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::convert_language,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout list` command.
pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let languages: Vec<CoreLanguage> = match args.language {
        Some(language) => vec![convert_language(language)],
        None => CoreLanguage::ALL.to_vec(),
    };

    match args.format {
        ListFormat::Table => print_table(&languages, &output),
        ListFormat::List => print_list(&languages, &output),
        ListFormat::Json => print_json(&languages, &output),
    }
}

fn print_table(languages: &[CoreLanguage], out: &OutputManager) -> CliResult<()> {
    out.header("Supported languages and variants")?;
    out.print(&format!("{:<12} {:<10} DEFAULT", "LANGUAGE", "VARIANT"))?;
    for language in languages {
        for variant in language.supported_variants() {
            let marker = if *variant == language.default_variant() {
                "*"
            } else {
                ""
            };
            out.print(&format!("{:<12} {:<10} {}", language.as_str(), variant.as_str(), marker))?;
        }
    }
    Ok(())
}

fn print_list(languages: &[CoreLanguage], out: &OutputManager) -> CliResult<()> {
    for language in languages {
        for variant in language.supported_variants() {
            out.print(&format!("{}/{}", language.as_str(), variant.as_str()))?;
        }
    }
    Ok(())
}

fn print_json(languages: &[CoreLanguage], out: &OutputManager) -> CliResult<()> {
    let mut map = serde_json::Map::new();
    for language in languages {
        let variants: Vec<serde_json::Value> = language
            .supported_variants()
            .iter()
            .map(|v| serde_json::Value::String(v.as_str().to_string()))
            .collect();
        map.insert(
            language.as_str().to_string(),
            serde_json::Value::Array(variants),
        );
    }
    let payload = serde_json::to_string_pretty(&serde_json::Value::Object(map)).map_err(|e| {
        CliError::IoError {
            message: "failed to serialize list".into(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        }
    })?;
    out.machine(&payload)?;
    Ok(())
}
