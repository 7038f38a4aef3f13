//! Built-in post-processors

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::{CodeOutputs, PostProcessor};
use crate::error::{GenerationError, Result};

/// Strips trailing spaces and ends every file with a single newline
pub struct NormalizeWhitespace;

impl PostProcessor for NormalizeWhitespace {
    fn name(&self) -> &str {
        "normalize-whitespace"
    }

    fn process(&self, outputs: CodeOutputs) -> Result<CodeOutputs> {
        Ok(outputs
            .into_iter()
            .map(|(ext, text)| (ext, normalize(&text)))
            .collect())
    }
}

fn normalize(text: &str) -> String {
    let mut out: String = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

/// Re-prints CSS output through lightningcss
pub struct CssFormatter;

impl CssFormatter {
    fn format(&self, code: &str) -> Result<String> {
        let sheet = StyleSheet::parse(code, ParserOptions::default())
            .map_err(|e| self.fault(e.to_string()))?;
        let printed = sheet
            .to_css(PrinterOptions::default())
            .map_err(|e| self.fault(e.to_string()))?;
        Ok(printed.code)
    }

    fn fault(&self, message: String) -> GenerationError {
        GenerationError::PostProcessor {
            processor: self.name().to_string(),
            message,
        }
    }
}

impl PostProcessor for CssFormatter {
    fn name(&self) -> &str {
        "css-format"
    }

    fn process(&self, mut outputs: CodeOutputs) -> Result<CodeOutputs> {
        if let Some(css) = outputs.get("css") {
            let formatted = self.format(css)?;
            outputs.insert("css".to_string(), formatted);
        }
        Ok(outputs)
    }
}
