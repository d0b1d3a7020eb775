//! Grammar-driven lemmatizer.
mod decompose;
mod stage;

use std::borrow::Cow;

use crate::chain::ChainDict;
use crate::errors::Result;
use crate::gloss::Gloss;
use crate::grammar::pattern::CompiledPattern;
use crate::grammar::Grammar;
use crate::utils;

pub use decompose::split_composite;
use stage::{Action, Predicate, Stage, StageCompiler, Transform};

/// Staged lemmatizer over a union of dictionaries.
///
/// The token plan of the grammar is compiled once, when the parser is
/// created. Without a grammar, words are only looked up in the dictionaries.
pub struct Parser {
    dict: ChainDict,
    stages: Vec<Stage>,
    detone: bool,
}

impl Parser {
    /// Creates a new parser.
    ///
    /// # Arguments
    ///
    ///  - `dict`: Dictionaries to look words up in.
    ///  - `grammar`: Grammar whose token plan drives the analysis.
    ///
    /// # Errors
    ///
    /// [`GlossaError::GrammarCompilation`](crate::errors::GlossaError::GrammarCompilation)
    /// is returned when a step of the plan has an unsupported shape or names
    /// an unknown pattern section.
    pub fn new(dict: ChainDict, grammar: Option<&Grammar>) -> Result<Self> {
        let stages = match grammar {
            Some(grammar) => {
                if !grammar.sentence_plan().is_empty() {
                    log::debug!(
                        "The sentence plan ({} steps) is not executed",
                        grammar.sentence_plan().len()
                    );
                }
                StageCompiler::new(grammar).compile(grammar.token_plan())?
            }
            None => vec![
                Stage::Apply(0, Transform::Lookup),
                Stage::Return(Predicate::Parsed),
            ],
        };
        Ok(Self {
            dict,
            stages,
            detone: false,
        })
    }

    /// Looks words up by their forms without tone marks.
    ///
    /// # Arguments
    ///
    ///  - `yes`: `true` if tone marks are ignored.
    pub fn detone(mut self, yes: bool) -> Self {
        self.detone = yes;
        self
    }

    /// Gets the dictionaries.
    pub fn dictionary(&self) -> &ChainDict {
        &self.dict
    }

    /// Publishes a new union of dictionaries and returns the previous one.
    pub fn replace_dictionary(&mut self, dict: ChainDict) -> ChainDict {
        std::mem::replace(&mut self.dict, dict)
    }

    /// Gets the number of compiled steps.
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Analyzes a word.
    ///
    /// Returns the identifier of the last stage that changed the candidates
    /// with the candidates accepted by the first successful return step, or
    /// `-1` with the final candidates when no return step succeeded.
    pub fn lemmatize(&self, word: &str) -> (i32, Vec<Gloss>) {
        let mut stage = -1;
        let mut current = vec![Gloss::unresolved(word)];
        for step in &self.stages {
            let (id, next) = match step {
                Stage::Return(predicate) => {
                    let accepted: Vec<_> = current
                        .iter()
                        .filter(|g| predicate.test(g))
                        .cloned()
                        .collect();
                    if !accepted.is_empty() {
                        return (stage, accepted);
                    }
                    continue;
                }
                Stage::Apply(id, transform) => {
                    let mut next = Vec::with_capacity(current.len());
                    for gloss in &current {
                        let results = self.transform(transform, gloss);
                        if results.is_empty() {
                            next.push(gloss.clone());
                        } else {
                            next.extend(results);
                        }
                    }
                    (*id, next)
                }
                Stage::Add(id, transform) => {
                    let mut next = current.clone();
                    for gloss in &current {
                        next.extend(self.transform(transform, gloss));
                    }
                    (*id, next)
                }
            };
            if next != current {
                log::debug!("{word}: stage {id} gives {} candidates", next.len());
                stage = id;
                current = next;
            }
        }
        (-1, current)
    }

    /// Resolves a candidate against the dictionaries.
    ///
    /// A resolved candidate is returned as is. An atomic one is replaced by
    /// the compatible dictionary entries of its form. In a composite one,
    /// every unresolved morpheme is replaced by its compatible entries, giving
    /// one candidate per combination. An empty vector means nothing was found.
    pub fn lookup(&self, gloss: &Gloss) -> Vec<Gloss> {
        if gloss.is_parsed() {
            return vec![gloss.clone()];
        }
        if gloss.morphemes.is_empty() {
            return self.lookup_gloss(gloss);
        }
        let alternatives: Vec<Vec<Gloss>> = gloss
            .morphemes
            .iter()
            .map(|m| {
                if m.is_parsed() {
                    return vec![m.clone()];
                }
                let found = self.lookup_gloss(m);
                if found.is_empty() {
                    vec![m.clone()]
                } else {
                    found
                }
            })
            .collect();
        product(&alternatives)
            .into_iter()
            .map(|morphemes| gloss.with_morphemes(morphemes))
            .collect()
    }

    fn key<'a>(&self, form: &'a str) -> Cow<'a, str> {
        if self.detone {
            Cow::Owned(utils::detone(form))
        } else {
            Cow::Borrowed(form)
        }
    }

    /// Gets the entries of the form of `gloss` that are compatible with its
    /// part-of-speech and gloss.
    fn lookup_gloss(&self, gloss: &Gloss) -> Vec<Gloss> {
        let Ok(entries) = self.dict.lookup(&self.key(&gloss.form)) else {
            return vec![];
        };
        let template = Gloss::new("", gloss.ps.iter().cloned(), gloss.gloss.clone(), []);
        entries
            .into_iter()
            .filter(|e| e.matches(&template))
            .collect()
    }

    fn transform(&self, transform: &Transform, gloss: &Gloss) -> Vec<Gloss> {
        match transform {
            Transform::Lookup => self.lookup(gloss),
            Transform::Parallel(action, patterns) => patterns
                .iter()
                .flat_map(|p| self.act(*action, p, gloss))
                .collect(),
            Transform::Sequential(action, patterns) => {
                // Newest results first; each pattern works on the newest one.
                let mut results: Vec<Gloss> = vec![];
                for pattern in patterns.iter() {
                    let input = results.first().unwrap_or(gloss);
                    let mut applied = self.act(*action, pattern, input);
                    if !applied.is_empty() {
                        applied.append(&mut results);
                        results = applied;
                    }
                }
                results
            }
        }
    }

    fn act(&self, action: Action, pattern: &CompiledPattern, gloss: &Gloss) -> Vec<Gloss> {
        match action {
            Action::Parse => Self::parse(pattern, gloss),
            Action::Decompose => self.decompose(pattern, gloss),
        }
    }

    fn parse(pattern: &CompiledPattern, gloss: &Gloss) -> Vec<Gloss> {
        pattern.apply(gloss).ok().into_iter().collect()
    }

    /// Splits the form of `gloss` into as many dictionary keys as the pattern
    /// has morphemes and keeps the fully resolved results.
    fn decompose(&self, pattern: &CompiledPattern, gloss: &Gloss) -> Vec<Gloss> {
        let parts = pattern.num_morphemes();
        if parts < 2 {
            return Self::parse(pattern, gloss);
        }
        let Some(base) = pattern.restrict(gloss) else {
            return vec![];
        };
        let form = self.key(&gloss.form);
        let mut results = vec![];
        for pieces in split_composite(&form, &self.dict, parts) {
            let Some(morphemes) = pieces
                .iter()
                .enumerate()
                .map(|(i, piece)| pattern.morpheme(i, piece))
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            for mut candidate in self.lookup(&base.with_morphemes(morphemes)) {
                if candidate.is_parsed() {
                    pattern.mark(&mut candidate);
                    results.push(candidate);
                }
            }
        }
        results
    }
}

/// Builds every combination taking one element of each alternative.
fn product(alternatives: &[Vec<Gloss>]) -> Vec<Vec<Gloss>> {
    alternatives.iter().fold(vec![vec![]], |acc, alts| {
        acc.iter()
            .flat_map(|prefix| {
                alts.iter().map(move |a| {
                    let mut combination = prefix.clone();
                    combination.push(a.clone());
                    combination
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product() {
        let a = Gloss::unresolved("a");
        let b = Gloss::unresolved("b");
        let c = Gloss::unresolved("c");
        let combinations = product(&[vec![a.clone(), b.clone()], vec![c.clone()]]);
        assert_eq!(combinations, vec![vec![a, c.clone()], vec![b, c]]);
        assert_eq!(product(&[]), vec![Vec::<Gloss>::new()]);
    }

    #[test]
    fn test_no_grammar() {
        let parser = Parser::new(ChainDict::new(), None).unwrap();
        assert_eq!(parser.num_stages(), 2);
        assert_eq!(parser.lemmatize("kan"), (-1, vec![Gloss::unresolved("kan")]));
    }
}
