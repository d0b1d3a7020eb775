//! Orthography converters rewriting a spelling into its possible spellings
//! in another orthography.
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::errors::{GlossaError, Result};

/// Capability converting a word into alternative spellings.
pub trait OrthographyConverter: Send + Sync {
    /// Gets the name used to select the converter.
    fn name(&self) -> &'static str;

    /// Gets a short description.
    fn description(&self) -> &'static str;

    /// Converts a word.
    ///
    /// At least one spelling is returned; a word with nothing to rewrite is
    /// returned unchanged.
    fn convert(&self, word: &str) -> Vec<String>;
}

/// Names of the built-in converters.
pub const CONVERTER_NAMES: &[&str] = &["emklatinold"];

/// Creates a built-in converter by name.
///
/// # Errors
///
/// [`GlossaError`] is returned when no converter has the name.
pub fn converter(name: &str) -> Result<Box<dyn OrthographyConverter>> {
    match name {
        "emklatinold" => Ok(Box::new(ManinkaOldToNew::new()?)),
        _ => Err(GlossaError::invalid_argument(
            "name",
            format!(
                "Unknown converter {name:?}, expected one of {}",
                CONVERTER_NAMES.join(", ")
            ),
        )),
    }
}

/// Converter from the old Latin orthography of Maninka to the new one.
///
/// The old orthography is ambiguous, so a word may have several spellings.
pub struct ManinkaOldToNew {
    graphemes: Regex,
}

impl ManinkaOldToNew {
    /// Creates a new converter.
    ///
    /// # Errors
    ///
    /// [`GlossaError`] is returned when the grapheme pattern cannot be compiled.
    pub fn new() -> Result<Self> {
        let graphemes = Regex::new("(?i)ty|dy|ny|è[eè]|öö|(?s:.)")
            .map_err(|e| GlossaError::invalid_argument("graphemes", e.to_string()))?;
        Ok(Self { graphemes })
    }

    fn replacements(grapheme: &str) -> Vec<String> {
        let lower = grapheme.to_lowercase();
        let new: &[&str] = match lower.as_str() {
            "è" => &["ɛ"],
            "ö" => &["ɔ"],
            "èe" => &["ɛɛ"],
            "öö" => &["ɔɔ"],
            "ny" => &["ny", "ɲ"],
            "dy" => &["j"],
            "ty" => &["c"],
            _ => return vec![grapheme.to_string()],
        };
        new.iter().map(ToString::to_string).collect()
    }
}

impl OrthographyConverter for ManinkaOldToNew {
    fn name(&self) -> &'static str {
        "emklatinold"
    }

    fn description(&self) -> &'static str {
        "Converter from the old Latin orthography of Maninka (ambiguous)"
    }

    fn convert(&self, word: &str) -> Vec<String> {
        let composed: String = word.nfkc().collect();
        let spellings = self
            .graphemes
            .find_iter(&composed)
            .map(|m| Self::replacements(m.as_str()))
            .fold(vec![String::new()], |acc, alts| {
                acc.iter()
                    .flat_map(|prefix| alts.iter().map(move |a| format!("{prefix}{a}")))
                    .collect()
            });
        // Decomposed like dictionary keys.
        spellings.into_iter().map(|s| s.nfd().collect()).collect()
    }
}
