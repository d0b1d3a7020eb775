//! Linguistic analysis records.
use std::collections::BTreeSet;
use std::fmt;

use bincode::{Decode, Encode};

/// Analysis of a word form or of a morpheme.
///
/// The same type serves as a template when matching or unifying records: an
/// empty field of a template places no constraint on the other side.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Decode, Encode)]
pub struct Gloss {
    /// Normalized text of the word or morpheme.
    pub form: String,

    /// Part-of-speech tags.
    pub ps: BTreeSet<String>,

    /// Gloss string. Empty means unresolved.
    pub gloss: String,

    /// Sub-analyses of a composite form, empty for atomic ones.
    pub morphemes: Vec<Gloss>,
}

impl Gloss {
    /// Creates a new record.
    pub fn new<F, I, S, G, M>(form: F, ps: I, gloss: G, morphemes: M) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: Into<String>,
        M: IntoIterator<Item = Gloss>,
    {
        Self {
            form: form.into(),
            ps: ps.into_iter().map(Into::into).collect(),
            gloss: gloss.into(),
            morphemes: morphemes.into_iter().collect(),
        }
    }

    /// Creates an unresolved record for a raw word.
    pub fn unresolved<F>(form: F) -> Self
    where
        F: Into<String>,
    {
        Self {
            form: form.into(),
            ..Self::default()
        }
    }

    /// Checks if the analysis is complete.
    ///
    /// An atomic record is resolved when it has a gloss, a composite one when
    /// every morpheme is resolved.
    pub fn is_parsed(&self) -> bool {
        if self.morphemes.is_empty() {
            !self.gloss.is_empty()
        } else {
            self.morphemes.iter().all(Self::is_parsed)
        }
    }

    /// Checks if the record has no gloss.
    #[inline(always)]
    pub fn is_unknown(&self) -> bool {
        self.gloss.is_empty()
    }

    /// Returns a copy with the given morphemes.
    pub fn with_morphemes(&self, morphemes: Vec<Gloss>) -> Self {
        Self {
            form: self.form.clone(),
            ps: self.ps.clone(),
            gloss: self.gloss.clone(),
            morphemes,
        }
    }

    /// Checks if the record satisfies every non-empty field of `template`.
    pub fn matches(&self, template: &Gloss) -> bool {
        if !template.form.is_empty() && self.form != template.form {
            return false;
        }
        if !ps_compatible(&self.ps, &template.ps) {
            return false;
        }
        if !template.gloss.is_empty() && !self.gloss.is_empty() && self.gloss != template.gloss {
            return false;
        }
        if template.morphemes.is_empty() {
            return true;
        }
        self.morphemes.len() == template.morphemes.len()
            && self
                .morphemes
                .iter()
                .zip(&template.morphemes)
                .all(|(m, t)| m.matches(t))
    }

    /// Merges two compatible records.
    ///
    /// Non-empty fields win over empty ones and two part-of-speech sets are
    /// intersected. Returns [`None`] when a field conflicts.
    pub fn unify(&self, other: &Gloss) -> Option<Gloss> {
        let form = unify_text(&self.form, &other.form)?;
        let gloss = unify_text(&self.gloss, &other.gloss)?;
        let ps = match (self.ps.is_empty(), other.ps.is_empty()) {
            (true, _) => other.ps.clone(),
            (_, true) => self.ps.clone(),
            _ => {
                let common: BTreeSet<_> = self.ps.intersection(&other.ps).cloned().collect();
                if common.is_empty() {
                    return None;
                }
                common
            }
        };
        let morphemes = match (self.morphemes.is_empty(), other.morphemes.is_empty()) {
            (true, _) => other.morphemes.clone(),
            (_, true) => self.morphemes.clone(),
            _ => {
                if self.morphemes.len() != other.morphemes.len() {
                    return None;
                }
                self.morphemes
                    .iter()
                    .zip(&other.morphemes)
                    .map(|(a, b)| a.unify(b))
                    .collect::<Option<Vec<_>>>()?
            }
        };
        Some(Gloss {
            form,
            ps,
            gloss,
            morphemes,
        })
    }

    /// Overlays the non-empty fields of `mark` onto the record.
    ///
    /// Morpheme marks are applied pairwise when the counts agree.
    pub fn overlay(&mut self, mark: &Gloss) {
        if !mark.ps.is_empty() {
            self.ps = mark.ps.clone();
        }
        if !mark.gloss.is_empty() {
            self.gloss = mark.gloss.clone();
        }
        if mark.morphemes.len() == self.morphemes.len() {
            for (m, t) in self.morphemes.iter_mut().zip(&mark.morphemes) {
                m.overlay(t);
            }
        }
    }
}

fn ps_compatible(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    a.is_empty() || b.is_empty() || !a.is_disjoint(b)
}

fn unify_text(a: &str, b: &str) -> Option<String> {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => Some(b.to_string()),
        (_, true) => Some(a.to_string()),
        _ if a == b => Some(a.to_string()),
        _ => None,
    }
}

impl fmt::Display for Gloss {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ps: Vec<_> = self.ps.iter().map(String::as_str).collect();
        write!(f, "{}:{}:{}", self.form, ps.join("/"), self.gloss)?;
        if !self.morphemes.is_empty() {
            write!(f, " [")?;
            for (i, m) in self.morphemes.iter().enumerate() {
                if i != 0 {
                    write!(f, " ")?;
                }
                write!(f, "{m}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
