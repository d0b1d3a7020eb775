use std::sync::Arc;

use hashbrown::HashMap;

use crate::errors::{GlossaError, Result};
use crate::gloss::Gloss;
use crate::grammar::pattern::CompiledPattern;
use crate::grammar::{Grammar, Step, StepId};

/// Filter of a return step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    Parsed,
    Unknown,
}

impl Predicate {
    #[inline(always)]
    pub fn test(self, gloss: &Gloss) -> bool {
        match self {
            Self::Parsed => gloss.is_parsed(),
            Self::Unknown => gloss.is_unknown(),
        }
    }
}

/// How a pattern is applied to a single candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Parse,
    Decompose,
}

/// Candidate-wise function of a stage.
#[derive(Clone)]
pub enum Transform {
    Lookup,
    Parallel(Action, Arc<[CompiledPattern]>),
    Sequential(Action, Arc<[CompiledPattern]>),
}

#[derive(Clone)]
pub enum Stage {
    Return(Predicate),
    Apply(i32, Transform),
    Add(i32, Transform),
}

/// Compiles plans, sharing the patterns of a section between the steps
/// naming it.
pub struct StageCompiler<'a> {
    grammar: &'a Grammar,
    sections: HashMap<&'a str, Arc<[CompiledPattern]>>,
}

impl<'a> StageCompiler<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            sections: HashMap::new(),
        }
    }

    pub fn compile(&mut self, plan: &'a [Step]) -> Result<Vec<Stage>> {
        plan.iter().map(|step| self.compile_step(step)).collect()
    }

    fn compile_step(&mut self, step: &'a Step) -> Result<Stage> {
        let ops: Vec<&str> = step.operands.iter().map(String::as_str).collect();
        match step.id {
            StepId::Return => match ops.as_slice() {
                ["parsed"] => Ok(Stage::Return(Predicate::Parsed)),
                ["unknown"] => Ok(Stage::Return(Predicate::Unknown)),
                _ => Err(Self::unsupported(step)),
            },
            StepId::Stage(id) => match ops.split_first() {
                Some((&"apply", rest)) => Ok(Stage::Apply(id, self.transform(step, rest)?)),
                Some((&"add", rest)) => Ok(Stage::Add(id, self.transform(step, rest)?)),
                _ => Err(Self::unsupported(step)),
            },
        }
    }

    fn transform(&mut self, step: &'a Step, ops: &[&str]) -> Result<Transform> {
        match *ops {
            ["lookup"] => Ok(Transform::Lookup),
            [combinator, action, _] => {
                let action = match action {
                    "parse" => Action::Parse,
                    "decompose" => Action::Decompose,
                    _ => return Err(Self::unsupported(step)),
                };
                let patterns = self.section(&step.operands[3])?;
                match combinator {
                    "parallel" => Ok(Transform::Parallel(action, patterns)),
                    "sequential" => Ok(Transform::Sequential(action, patterns)),
                    _ => Err(Self::unsupported(step)),
                }
            }
            _ => Err(Self::unsupported(step)),
        }
    }

    fn section(&mut self, name: &'a str) -> Result<Arc<[CompiledPattern]>> {
        if let Some(patterns) = self.sections.get(name) {
            return Ok(patterns.clone());
        }
        let patterns = self
            .grammar
            .patterns(name)
            .ok_or_else(|| GlossaError::grammar(format!("Unknown pattern section: {name}")))?;
        let compiled: Arc<[CompiledPattern]> = patterns
            .iter()
            .map(|p| CompiledPattern::new(name, p))
            .collect();
        self.sections.insert(name, compiled.clone());
        Ok(compiled)
    }

    fn unsupported(step: &Step) -> GlossaError {
        GlossaError::grammar(format!(
            "Unsupported step {:?}: {}",
            step.id,
            step.operands.join(" ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Pattern;

    fn grammar() -> Grammar {
        Grammar::new().section(
            "affixes",
            vec![Pattern::new(
                Gloss::new("", ["n"], "", [Gloss::default(), Gloss::unresolved("w")]),
                Gloss::default(),
            )],
        )
    }

    #[test]
    fn test_compile() {
        let grammar = grammar()
            .stage(0, ["add", "lookup"])
            .stage(1, ["apply", "parallel", "parse", "affixes"])
            .stage(2, ["add", "sequential", "decompose", "affixes"])
            .return_if("unknown");
        let stages = StageCompiler::new(&grammar)
            .compile(grammar.token_plan())
            .unwrap();
        assert_eq!(stages.len(), 4);
        assert!(matches!(stages[0], Stage::Add(0, Transform::Lookup)));
        let (Stage::Apply(1, Transform::Parallel(Action::Parse, a)), Stage::Add(2, Transform::Sequential(Action::Decompose, b))) =
            (&stages[1], &stages[2])
        else {
            panic!("unexpected stages");
        };
        assert!(Arc::ptr_eq(a, b));
        assert!(matches!(stages[3], Stage::Return(Predicate::Unknown)));
    }

    #[test]
    #[should_panic]
    fn test_unknown_section() {
        let grammar = grammar().stage(0, ["apply", "parallel", "parse", "suffixes"]);
        StageCompiler::new(&grammar)
            .compile(grammar.token_plan())
            .unwrap();
    }

    #[test]
    #[should_panic]
    fn test_unknown_operator() {
        let grammar = grammar().stage(0, ["filter", "lookup"]);
        StageCompiler::new(&grammar)
            .compile(grammar.token_plan())
            .unwrap();
    }

    #[test]
    #[should_panic]
    fn test_unknown_predicate() {
        let grammar = grammar().return_if("resolved");
        StageCompiler::new(&grammar)
            .compile(grammar.token_plan())
            .unwrap();
    }

    #[test]
    #[should_panic]
    fn test_unknown_action() {
        let grammar = grammar().stage(0, ["apply", "parallel", "lookup", "affixes"]);
        StageCompiler::new(&grammar)
            .compile(grammar.token_plan())
            .unwrap();
    }
}
