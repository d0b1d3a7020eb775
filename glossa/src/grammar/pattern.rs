use bincode::{Decode, Encode};
use regex::Regex;

use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;

/// Rule pairing a matching template with a transformation.
///
/// The `form` of `select` and of its morpheme templates are regular
/// expressions matched against whole forms; an empty one accepts any
/// non-empty text. The `ps` and `gloss` fields of `select` constrain the
/// candidate. When `select` has morphemes, a candidate's form is split into
/// that many pieces. The non-empty fields of `mark` are written onto the
/// result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Decode, Encode)]
pub struct Pattern {
    /// Template a candidate must match.
    pub select: Gloss,
    /// Fields written onto a matching candidate.
    pub mark: Gloss,
}

impl Pattern {
    /// Creates a new pattern.
    pub const fn new(select: Gloss, mark: Gloss) -> Self {
        Self { select, mark }
    }
}

/// Regular expressions derived from a pattern.
struct Matcher {
    form: Option<Regex>,
    split: Option<Regex>,
    morphemes: Vec<Option<Regex>>,
}

fn whole(pattern: &str) -> Result<Option<Regex>, regex::Error> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        Regex::new(&format!("^(?:{pattern})$")).map(Some)
    }
}

impl Matcher {
    fn new(select: &Gloss) -> Result<Self, regex::Error> {
        let split = if select.morphemes.is_empty() {
            None
        } else {
            let mut re = String::from("^");
            for (i, m) in select.morphemes.iter().enumerate() {
                let piece = if m.form.is_empty() { ".+" } else { &m.form };
                re.push_str(&format!("(?P<m{i}>{piece})"));
            }
            re.push('$');
            Some(Regex::new(&re)?)
        };
        Ok(Self {
            form: whole(&select.form)?,
            split,
            morphemes: select
                .morphemes
                .iter()
                .map(|m| whole(&m.form))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Pattern ready to be applied.
///
/// A pattern whose regular expressions are invalid is reported once when it
/// is compiled and never matches afterwards.
pub struct CompiledPattern {
    pattern: Pattern,
    constraint: Gloss,
    matcher: Option<Matcher>,
}

impl CompiledPattern {
    pub fn new(section: &str, pattern: &Pattern) -> Self {
        let matcher = match Matcher::new(&pattern.select) {
            Ok(m) => Some(m),
            Err(e) => {
                let e = GlossaError::MalformedPatternTemplate {
                    section: section.to_string(),
                    msg: format!("{}: {e}", pattern.select),
                };
                log::warn!("{e}");
                None
            }
        };
        let constraint = Gloss {
            ps: pattern.select.ps.clone(),
            gloss: pattern.select.gloss.clone(),
            ..Gloss::default()
        };
        Self {
            pattern: pattern.clone(),
            constraint,
            matcher,
        }
    }

    /// Gets the number of morphemes the pattern expects.
    #[inline(always)]
    pub fn num_morphemes(&self) -> usize {
        self.pattern.select.morphemes.len()
    }

    /// Narrows `gloss` to the constraints of `select`: its form regex, its
    /// part-of-speech and its gloss.
    pub fn restrict(&self, gloss: &Gloss) -> Option<Gloss> {
        let matcher = self.matcher.as_ref()?;
        if let Some(re) = matcher.form.as_ref() {
            if !re.is_match(&gloss.form) {
                return None;
            }
        }
        gloss.unify(&self.constraint)
    }

    /// Builds the `i`-th morpheme for a piece of a composite form.
    pub fn morpheme(&self, i: usize, piece: &str) -> Option<Gloss> {
        let matcher = self.matcher.as_ref()?;
        let template = self.pattern.select.morphemes.get(i)?;
        if let Some(re) = matcher.morphemes[i].as_ref() {
            if !re.is_match(piece) {
                return None;
            }
        }
        Some(Gloss::new(
            piece,
            template.ps.iter().cloned(),
            template.gloss.clone(),
            [],
        ))
    }

    /// Writes the fields of `mark` onto `gloss`.
    pub fn mark(&self, gloss: &mut Gloss) {
        gloss.overlay(&self.pattern.mark);
    }

    /// Applies the pattern to the form of a candidate, without consulting
    /// any dictionary.
    ///
    /// # Errors
    ///
    /// [`GlossaError::PatternMismatch`] is returned when the candidate is rejected.
    pub fn apply(&self, gloss: &Gloss) -> Result<Gloss> {
        self.try_apply(gloss)
            .ok_or_else(|| GlossaError::PatternMismatch(gloss.form.clone()))
    }

    fn try_apply(&self, gloss: &Gloss) -> Option<Gloss> {
        let matcher = self.matcher.as_ref()?;
        let mut result = self.restrict(gloss)?;
        if let Some(split) = matcher.split.as_ref() {
            let templates = &self.pattern.select.morphemes;
            if gloss.morphemes.is_empty() {
                let caps = split.captures(&gloss.form)?;
                result.morphemes = (0..templates.len())
                    .map(|i| {
                        let piece = caps.name(&format!("m{i}"))?.as_str();
                        self.morpheme(i, piece)
                    })
                    .collect::<Option<_>>()?;
            } else if gloss.morphemes.len() == templates.len() {
                result.morphemes = gloss
                    .morphemes
                    .iter()
                    .enumerate()
                    .map(|(i, m)| {
                        let template = self.morpheme(i, &m.form)?;
                        m.unify(&template)
                    })
                    .collect::<Option<_>>()?;
            } else {
                return None;
            }
        }
        self.mark(&mut result);
        Some(result)
    }
}
