use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Read};

use crate::common::MORPHEME_PS;
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;
use crate::utils;

/// Article being read: lemma variants with their keys, and the shared fields.
#[derive(Default)]
struct Article {
    lemmas: Vec<(String, Gloss)>,
    ps: Option<BTreeSet<String>>,
    gloss: String,
}

impl Article {
    fn push_into(self, builder: &mut DictionaryBuilder) {
        let ps = self.ps.unwrap_or_default();
        if self.lemmas.is_empty() || (ps.len() == 1 && ps.contains(MORPHEME_PS)) {
            return;
        }
        for (key, mut lemma) in self.lemmas {
            lemma.ps = ps.clone();
            lemma.gloss = self.gloss.clone();
            builder.insert_detoned(key, lemma);
        }
    }
}

impl Dictionary {
    /// Creates a new instance from a reader of a Toolbox (SFM) lexicon.
    ///
    /// Articles are separated by blank lines. `\lx`, `\le`, `\va` and `\vc`
    /// add lemma variants, `\mm form:ps:gloss` adds a morpheme to the last
    /// variant, and the first `\ps` and `\ge` (or `\gf`) apply to every
    /// variant of the article. Articles tagged only `mrph` are skipped.
    ///
    /// # Arguments
    ///
    ///  - `rdr`: A reader of the file.
    ///
    /// # Errors
    ///
    /// [`GlossaError`] is returned when
    ///  - a morpheme line is malformed or precedes every lemma, or
    ///  - `\lang`, `\name` or `\ver` is missing.
    pub fn from_toolbox_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut builder = DictionaryBuilder::new();
        let mut article = Article::default();

        let reader = BufReader::new(rdr);
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();

            if line.trim().is_empty() {
                std::mem::take(&mut article).push_into(&mut builder);
                continue;
            }

            let Some(rest) = line.strip_prefix('\\') else {
                continue;
            };
            let (tag, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let value = value.trim();

            match tag {
                "lang" => builder.set_lang(value),
                "name" => builder.set_name(value),
                "ver" => builder.set_ver(value),
                "lx" | "le" | "va" | "vc" => {
                    article
                        .lemmas
                        .push((utils::normalize_form(value), Gloss::unresolved(value)));
                }
                "mm" => {
                    let morpheme = Self::parse_morpheme(value, i + 1)?;
                    let (_, lemma) = article.lemmas.last_mut().ok_or_else(|| {
                        GlossaError::invalid_format(
                            "toolbox",
                            format!("A morpheme precedes every lemma (at line {})", i + 1),
                        )
                    })?;
                    lemma.morphemes.push(morpheme);
                }
                "ps" if article.ps.is_none() => {
                    article.ps = Some(Self::parse_ps(value));
                }
                "ge" | "gf" if article.gloss.is_empty() => {
                    article.gloss = value.to_string();
                }
                _ => {}
            }
        }
        article.push_into(&mut builder);

        let dict = builder.build()?;
        if !dict.attributed() {
            return Err(GlossaError::invalid_format(
                "toolbox",
                format!(
                    "The dictionary does not contain obligatory \\lang, \\name or \\ver fields: {dict:?}"
                ),
            ));
        }
        Ok(dict)
    }

    fn parse_ps(value: &str) -> BTreeSet<String> {
        value
            .split('/')
            .filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    fn parse_morpheme(value: &str, line: usize) -> Result<Gloss> {
        let cols: Vec<_> = value.split(':').collect();
        if cols.len() != 3 {
            let msg = format!(
                "A morpheme must have three fields form:ps:gloss, {value:?} (at line {line})"
            );
            return Err(GlossaError::invalid_format("toolbox", msg));
        }
        Ok(Gloss {
            form: cols[0].to_string(),
            ps: Self::parse_ps(cols[1]),
            gloss: cols[2].to_string(),
            morphemes: vec![],
        })
    }
}
