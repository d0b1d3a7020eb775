//! Common settings in Glossa.

use bincode::config::{self, Fixint, LittleEndian};

/// Magic bytes heading a binary dictionary.
pub const DICTIONARY_MAGIC: &[u8] = b"GlossaDictionary 0.1\n";

/// Magic bytes heading a binary grammar.
pub const GRAMMAR_MAGIC: &[u8] = b"GlossaGrammar 0.1\n";

/// Part-of-speech tag of the synthetic proper-noun candidate.
pub const PROPER_NOUN_PS: &str = "n.prop";

/// Part-of-speech tag of numerals glossed by the tokenizer.
pub const CARDINAL_PS: &str = "num";

/// Gloss of numerals glossed by the tokenizer.
pub const CARDINAL_GLOSS: &str = "CARDINAL";

/// Part-of-speech set marking morpheme-only articles in Toolbox sources.
pub const MORPHEME_PS: &str = "mrph";

pub(crate) fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}
