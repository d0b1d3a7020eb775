//! Document-level annotation.
use std::fmt;

use crate::common::{CARDINAL_GLOSS, CARDINAL_PS, PROPER_NOUN_PS};
use crate::errors::Result;
use crate::gloss::Gloss;
use crate::orthography::OrthographyConverter;
use crate::parser::Parser;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::utils;

/// Origin of the analyses of a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageMark {
    /// Glossed by the tokenizer, e.g. a numeral.
    Tokenizer,
    /// Stage reported by the parser, `-1` if unresolved.
    Parser(i32),
}

impl fmt::Display for StageMark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Tokenizer => write!(f, "tokenizer"),
            Self::Parser(stage) => write!(f, "{stage}"),
        }
    }
}

/// Analyzed word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordToken {
    /// Surface as written.
    pub token: String,
    /// Confidence of the analyses.
    pub stage: StageMark,
    /// Candidate analyses.
    pub glosses: Vec<Gloss>,
}

/// Annotated token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlossToken {
    /// Word or numeral.
    Word(WordToken),
    /// Punctuation or any other non-word character.
    Punct(String),
    /// Sentence-final punctuation.
    SentPunct(String),
    /// Structural tag.
    Tag(String),
    /// Comment.
    Comment(String),
}

impl GlossToken {
    /// Gets the surface.
    pub fn text(&self) -> &str {
        match self {
            Self::Word(w) => &w.token,
            Self::Punct(s) | Self::SentPunct(s) | Self::Tag(s) | Self::Comment(s) => s,
        }
    }
}

/// Sentence with its original text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedSentence {
    /// Text of the sentence, including whitespace.
    pub text: String,
    /// Annotated tokens, without whitespace.
    pub tokens: Vec<GlossToken>,
}

/// Annotator of whole documents.
pub struct Processor {
    tokenizer: Tokenizer,
    parser: Parser,
    converters: Vec<Box<dyn OrthographyConverter>>,
}

impl Processor {
    /// Creates a new processor.
    ///
    /// # Errors
    ///
    /// [`GlossaError`](crate::errors::GlossaError) is returned when the
    /// tokenizer cannot be built.
    pub fn new(parser: Parser) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            parser,
            converters: vec![],
        })
    }

    /// Rewrites words with the given converters, in order, before analysis.
    pub fn converters(mut self, converters: Vec<Box<dyn OrthographyConverter>>) -> Self {
        self.converters = converters;
        self
    }

    /// Gets the parser.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Annotates paragraphs.
    pub fn parse<I, S>(&self, paragraphs: I) -> Vec<Vec<AnnotatedSentence>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paragraphs
            .into_iter()
            .map(|p| self.parse_paragraph(p.as_ref()))
            .collect()
    }

    /// Annotates a paragraph.
    pub fn parse_paragraph(&self, text: &str) -> Vec<AnnotatedSentence> {
        Tokenizer::split_sentences(self.tokenizer.tokenize(text))
            .map(|sent| self.parse_sentence(text, &sent))
            .collect()
    }

    fn parse_sentence(&self, text: &str, sent: &[Token]) -> AnnotatedSentence {
        let start = sent.first().map_or(0, |t| t.range_byte().start);
        let end = sent.last().map_or(0, |t| t.range_byte().end);
        let mut tokens = Vec::with_capacity(sent.len());
        let mut after_word = false;
        for token in sent {
            let surface = token.text().to_string();
            match token.kind() {
                TokenKind::Comment => tokens.push(GlossToken::Comment(surface)),
                TokenKind::Tag => tokens.push(GlossToken::Tag(surface)),
                TokenKind::SentPunct => tokens.push(GlossToken::SentPunct(surface)),
                TokenKind::Punct | TokenKind::Nonword => tokens.push(GlossToken::Punct(surface)),
                TokenKind::Par | TokenKind::NL | TokenKind::Space => {}
                TokenKind::Cardinal => {
                    let gloss = Gloss::new(surface.clone(), [CARDINAL_PS], CARDINAL_GLOSS, []);
                    tokens.push(GlossToken::Word(WordToken {
                        token: surface,
                        stage: StageMark::Tokenizer,
                        glosses: vec![gloss],
                    }));
                }
                TokenKind::Word => {
                    let (stage, mut glosses) = self.lemmatize(&surface);
                    if after_word
                        && utils::is_title(&surface)
                        && !glosses.iter().any(|g| g.ps.contains(PROPER_NOUN_PS))
                    {
                        let proper = Gloss::new(surface.clone(), [PROPER_NOUN_PS], surface.clone(), []);
                        glosses.insert(0, proper);
                    }
                    tokens.push(GlossToken::Word(WordToken {
                        token: surface,
                        stage: StageMark::Parser(stage),
                        glosses,
                    }));
                    after_word = true;
                }
            }
        }
        AnnotatedSentence {
            text: text[start..end].to_string(),
            tokens,
        }
    }

    /// Analyzes every spelling the converters give for `word`.
    ///
    /// The best stage is reported. Only the glosses of resolved spellings
    /// are kept, unless no spelling was resolved.
    fn lemmatize(&self, word: &str) -> (i32, Vec<Gloss>) {
        if self.converters.is_empty() {
            return self.parser.lemmatize(&word.to_lowercase());
        }
        let mut spellings = vec![word.to_string()];
        for converter in &self.converters {
            spellings = spellings
                .into_iter()
                .flat_map(|w| {
                    let converted = converter.convert(&w);
                    if converted.is_empty() {
                        vec![w]
                    } else {
                        converted
                    }
                })
                .collect();
        }
        let results: Vec<_> = spellings
            .iter()
            .map(|w| self.parser.lemmatize(&w.to_lowercase()))
            .collect();
        let stage = results.iter().map(|(s, _)| *s).max().unwrap_or(-1);
        let resolved = stage >= 0;
        let glosses = results
            .into_iter()
            .filter(|(s, _)| !resolved || *s >= 0)
            .flat_map(|(_, g)| g)
            .collect();
        (stage, glosses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainDict;

    struct Doubler;

    impl OrthographyConverter for Doubler {
        fn name(&self) -> &'static str {
            "doubler"
        }

        fn description(&self) -> &'static str {
            "Appends a copy of the last letter"
        }

        fn convert(&self, word: &str) -> Vec<String> {
            let last = word.chars().last().map(String::from).unwrap_or_default();
            vec![word.to_string(), format!("{word}{last}")]
        }
    }

    struct Silent;

    impl OrthographyConverter for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn description(&self) -> &'static str {
            "Returns nothing"
        }

        fn convert(&self, _: &str) -> Vec<String> {
            vec![]
        }
    }

    fn processor() -> Processor {
        Processor::new(Parser::new(ChainDict::new(), None).unwrap()).unwrap()
    }

    #[test]
    fn test_stage_mark() {
        assert_eq!(StageMark::Tokenizer.to_string(), "tokenizer");
        assert_eq!(StageMark::Parser(-1).to_string(), "-1");
    }

    #[test]
    fn test_converters_multiply() {
        let processor = processor().converters(vec![Box::new(Doubler), Box::new(Doubler)]);
        let (stage, glosses) = processor.lemmatize("Ab");
        assert_eq!(stage, -1);
        let forms: Vec<_> = glosses.iter().map(|g| g.form.as_str()).collect();
        assert_eq!(forms, vec!["ab", "abb", "abb", "abbb"]);
    }

    #[test]
    fn test_empty_conversion() {
        let processor = processor().converters(vec![Box::new(Silent)]);
        assert_eq!(processor.lemmatize("So"), (-1, vec![Gloss::unresolved("so")]));
    }

    #[test]
    fn test_skip_whitespace() {
        let sents = processor().parse_paragraph("a\nb  c");
        assert_eq!(sents.len(), 1);
        assert_eq!(sents[0].text, "a\nb  c");
        let texts: Vec<_> = sents[0].tokens.iter().map(GlossToken::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
