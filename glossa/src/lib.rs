//! # Glossa
//!
//! Grammar-driven morphological glossing: text is tokenized, words are looked
//! up in a union of dictionaries, and the stages of a grammar resolve unknown
//! forms, including composite forms split into known morphemes.
//!
//! ```
//! use glossa::{ChainDict, DictionaryBuilder, Gloss, Parser, Processor};
//!
//! let mut builder = DictionaryBuilder::new();
//! builder.set_lang("bam");
//! builder.set_name("demo");
//! builder.set_ver("1");
//! builder.insert("so", Gloss::new("so", ["n"], "house", []));
//! let dict = ChainDict::from_dicts([builder.build().unwrap()]);
//!
//! let parser = Parser::new(dict, None).unwrap();
//! assert_eq!(parser.lemmatize("so").0, 0);
//!
//! let processor = Processor::new(parser).unwrap();
//! let paragraph = processor.parse_paragraph("A ye so ye.");
//! assert_eq!(paragraph.len(), 1);
//! ```
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

pub mod chain;
pub mod common;
pub mod dictionary;
pub mod errors;
pub mod gloss;
pub mod grammar;
pub mod orthography;
pub mod parser;
pub mod processor;
pub mod tokenizer;
mod utils;


pub use chain::ChainDict;
pub use dictionary::{Dictionary, DictionaryBuilder};
pub use gloss::Gloss;
pub use grammar::{Grammar, Pattern};
pub use parser::Parser;
pub use processor::Processor;
pub use tokenizer::Tokenizer;
