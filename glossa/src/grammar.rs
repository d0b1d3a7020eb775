//! Declarative grammar driving the parser.
pub(crate) mod pattern;

use std::collections::BTreeMap;
use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::common::{self, GRAMMAR_MAGIC};
use crate::errors::{GlossaError, Result};

pub use pattern::Pattern;

/// Identifier of a plan step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Decode, Encode)]
pub enum StepId {
    /// Transforming stage reporting the given confidence when it changes something.
    Stage(i32),
    /// Filter ending the analysis when it accepts a candidate.
    Return,
}

/// One step of a plan: its identifier and operand names.
#[derive(Clone, Debug, PartialEq, Eq, Decode, Encode)]
pub struct Step {
    /// Identifier of the step.
    pub id: StepId,
    /// Names of the operator and its operands, e.g. `["add", "parallel", "parse", "affixes"]`.
    pub operands: Vec<String>,
}

/// Ordered plans and named pattern sections.
///
/// The `token` plan drives the analysis of single words. The `sentence` plan
/// is kept with the grammar but not executed by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Decode, Encode)]
pub struct Grammar {
    token: Vec<Step>,
    sentence: Vec<Step>,
    sections: BTreeMap<String, Vec<Pattern>>,
}

fn to_operands<I, S>(operands: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    operands.into_iter().map(Into::into).collect()
}

impl Grammar {
    /// Creates an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transforming stage to the token plan.
    pub fn stage<I, S>(mut self, id: i32, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token.push(Step {
            id: StepId::Stage(id),
            operands: to_operands(operands),
        });
        self
    }

    /// Appends a return step with the given predicate name to the token plan.
    pub fn return_if<S>(mut self, predicate: S) -> Self
    where
        S: Into<String>,
    {
        self.token.push(Step {
            id: StepId::Return,
            operands: vec![predicate.into()],
        });
        self
    }

    /// Appends a step to the sentence plan.
    pub fn sentence_step(mut self, step: Step) -> Self {
        self.sentence.push(step);
        self
    }

    /// Registers a pattern section.
    pub fn section<S>(mut self, name: S, patterns: Vec<Pattern>) -> Self
    where
        S: Into<String>,
    {
        self.sections.insert(name.into(), patterns);
        self
    }

    /// Gets the token plan.
    pub fn token_plan(&self) -> &[Step] {
        &self.token
    }

    /// Gets the sentence plan.
    pub fn sentence_plan(&self) -> &[Step] {
        &self.sentence
    }

    /// Gets a pattern section.
    pub fn patterns(&self, name: &str) -> Option<&[Pattern]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Exports the grammar.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(GRAMMAR_MAGIC)?;
        let num_bytes = bincode::encode_into_std_write(self, &mut wtr, common::bincode_config())?;
        Ok(GRAMMAR_MAGIC.len() + num_bytes)
    }

    /// Creates a grammar from a reader.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    /// An error is also returned when the magic number mismatches.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; GRAMMAR_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if magic != GRAMMAR_MAGIC {
            return Err(GlossaError::invalid_argument(
                "rdr",
                "The magic number of the input grammar mismatches.",
            ));
        }
        let data = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Ok(data)
    }
}
