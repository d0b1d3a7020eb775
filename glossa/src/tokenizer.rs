//! Rule-based tokenizer and sentence splitter.
use std::ops::Range;

use regex::Regex;

use crate::errors::{GlossaError, Result};

/// Category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Inline comment such as `<c>…</c>`.
    Comment,
    /// Sentence-final punctuation or an explicit `<st>` marker.
    SentPunct,
    /// Structural tag.
    Tag,
    /// Paragraph break.
    Par,
    /// Line break.
    NL,
    /// Whitespace.
    Space,
    /// Word form.
    Word,
    /// Numeric literal.
    Cardinal,
    /// Punctuation inside a sentence.
    Punct,
    /// Any other character.
    Nonword,
}

/// Declaration of one tokenization rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleSpec<'a> {
    /// Category given to the matched text.
    pub kind: TokenKind,
    /// Pattern matched at the current position.
    pub pattern: &'a str,
    /// Pattern that must match right after the token (end of input always
    /// satisfies it), without being consumed.
    pub follow: Option<&'a str>,
}

impl<'a> RuleSpec<'a> {
    const fn new(kind: TokenKind, pattern: &'a str) -> Self {
        Self {
            kind,
            pattern,
            follow: None,
        }
    }

    const fn followed_by(kind: TokenKind, pattern: &'a str, follow: &'a str) -> Self {
        Self {
            kind,
            pattern,
            follow: Some(follow),
        }
    }
}

/// Combining marks and N'Ko diacritics allowed inside a word, plus the hyphen.
macro_rules! word_marks {
    () => {
        r"\x{0300}\x{0301}\x{0302}\x{030c}\x{0308}\x{07eb}-\x{07f3}\x{07f6}\x{07fa}\-"
    };
}

/// Default rule set. Earlier rules take precedence.
pub const DEFAULT_RULES: &[RuleSpec<'static>] = &[
    RuleSpec::new(TokenKind::Comment, r"(?s)<c>.*?</c>"),
    RuleSpec::new(TokenKind::Comment, r"<sp>.*?</sp>"),
    RuleSpec::new(TokenKind::SentPunct, r"<st>"),
    RuleSpec::new(TokenKind::Tag, r"<.*?>"),
    RuleSpec::new(TokenKind::Par, r"(\r?\n){2,}"),
    RuleSpec::new(TokenKind::NL, r"[\r\n]"),
    RuleSpec::new(TokenKind::Space, r"\s+"),
    RuleSpec::new(TokenKind::Word, r"[nN]\x{00b0}"),
    RuleSpec::new(TokenKind::Word, r"\d+nan"),
    RuleSpec::new(TokenKind::Cardinal, r"(\d([-.,:]\d)?)+"),
    RuleSpec::new(TokenKind::Word, r"(\w\.){2,}"),
    RuleSpec::new(
        TokenKind::Word,
        concat!(r"[\w", word_marks!(), r"]+['\x{2019}\x{07f4}\x{07f5}]"),
    ),
    RuleSpec::new(
        TokenKind::Word,
        concat!(r"(\w[", word_marks!(), r"]{0,2})+"),
    ),
    RuleSpec::followed_by(
        TokenKind::SentPunct,
        r"[.!?\x{061f}\x{07f9}]+",
        r"[\s\x{200f}]",
    ),
    RuleSpec::followed_by(TokenKind::SentPunct, r":", r"[^\S\n]*\n"),
    RuleSpec::new(
        TokenKind::Punct,
        r#"[:;,\x{061b}\x{060c}\x{07f8}\x{200f}\(\)\{\}"]+"#,
    ),
    RuleSpec::new(TokenKind::Nonword, r"\W"),
    RuleSpec::new(TokenKind::Nonword, r"(?s)."),
];

struct Rule {
    kind: TokenKind,
    pattern: Regex,
    follow: Option<Regex>,
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| GlossaError::invalid_argument("rules", e.to_string()))
}

/// Tokenizer applying an ordered list of rules.
///
/// At every position the first rule that matches wins, so the order of the
/// rules is part of their meaning.
pub struct Tokenizer {
    rules: Vec<Rule>,
}

impl Tokenizer {
    /// Creates a tokenizer with [`DEFAULT_RULES`].
    ///
    /// # Errors
    ///
    /// [`GlossaError`] is returned when a rule pattern is invalid.
    pub fn new() -> Result<Self> {
        Self::from_rules(DEFAULT_RULES.iter().copied())
    }

    /// Creates a tokenizer from a custom rule set.
    ///
    /// Characters no rule accepts become one-character [`TokenKind::Nonword`]
    /// tokens.
    ///
    /// # Errors
    ///
    /// [`GlossaError`] is returned when a rule pattern is invalid.
    pub fn from_rules<'a, I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = RuleSpec<'a>>,
    {
        let rules = rules
            .into_iter()
            .map(|spec| {
                Ok(Rule {
                    kind: spec.kind,
                    pattern: anchored(spec.pattern)?,
                    follow: spec.follow.map(anchored).transpose()?,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { rules })
    }

    /// Tokenizes the input lazily.
    ///
    /// Tokens borrow only the input, so they may outlive the tokenizer.
    pub fn tokenize<'t, 'a>(&'t self, input: &'a str) -> TokenIter<'t, 'a> {
        TokenIter {
            tokenizer: self,
            input,
            pos: 0,
        }
    }

    /// Groups tokens into sentences.
    ///
    /// Every group but the last ends with a [`TokenKind::SentPunct`] token;
    /// the tokens after the last one form a final group when there are any.
    pub fn split_sentences<'a, I>(tokens: I) -> Sentences<I::IntoIter>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        Sentences {
            tokens: tokens.into_iter(),
        }
    }

    fn next_token<'a>(&self, input: &'a str, pos: usize) -> Token<'a> {
        let rest = &input[pos..];
        for rule in &self.rules {
            let Some(m) = rule.pattern.find(rest) else {
                continue;
            };
            if m.end() == 0 {
                continue;
            }
            if let Some(follow) = rule.follow.as_ref() {
                let after = &rest[m.end()..];
                if !after.is_empty() && !follow.is_match(after) {
                    continue;
                }
            }
            return Token::new(rule.kind, input, pos..pos + m.end());
        }
        let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
        Token::new(TokenKind::Nonword, input, pos..pos + len)
    }
}

/// Token with its category and position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    start: usize,
}

impl<'a> Token<'a> {
    #[inline(always)]
    fn new(kind: TokenKind, input: &'a str, range: Range<usize>) -> Self {
        Self {
            kind,
            start: range.start,
            text: &input[range],
        }
    }

    /// Gets the category.
    #[inline(always)]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Gets the matched text.
    #[inline(always)]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Gets the position range of the token in bytes.
    #[inline(always)]
    pub const fn range_byte(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

/// Iterator of tokens.
pub struct TokenIter<'t, 'a> {
    tokenizer: &'t Tokenizer,
    input: &'a str,
    pos: usize,
}

impl<'t, 'a> Iterator for TokenIter<'t, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        let token = self.tokenizer.next_token(self.input, self.pos);
        self.pos = token.range_byte().end;
        Some(token)
    }
}

/// Iterator of sentences.
pub struct Sentences<I> {
    tokens: I,
}

impl<'a, I> Iterator for Sentences<I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = Vec<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut sent = vec![];
        for token in self.tokens.by_ref() {
            let end = token.kind() == TokenKind::SentPunct;
            sent.push(token);
            if end {
                return Some(sent);
            }
        }
        if sent.is_empty() {
            None
        } else {
            Some(sent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        let tokenizer = Tokenizer::new().unwrap();
        tokenizer
            .tokenize(input)
            .map(|t| (t.kind(), t.text()))
            .collect()
    }

    #[test]
    fn test_words_and_punct() {
        use TokenKind::*;
        assert_eq!(
            kinds("Musa, kɛ!"),
            vec![
                (Word, "Musa"),
                (Punct, ","),
                (Space, " "),
                (Word, "kɛ"),
                (SentPunct, "!"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("1.500 2nan n°3"),
            vec![
                (Cardinal, "1.500"),
                (Space, " "),
                (Word, "2nan"),
                (Space, " "),
                (Word, "n°"),
                (Cardinal, "3"),
            ]
        );
    }

    #[test]
    fn test_tags_and_comments() {
        use TokenKind::*;
        assert_eq!(
            kinds("<c>a\nb</c><st><h>a"),
            vec![
                (Comment, "<c>a\nb</c>"),
                (SentPunct, "<st>"),
                (Tag, "<h>"),
                (Word, "a"),
            ]
        );
    }

    #[test]
    fn test_apostrophe_and_diacritics() {
        use TokenKind::*;
        assert_eq!(
            kinds("k'a ka\u{0300}n dugu-kolo"),
            vec![
                (Word, "k'"),
                (Word, "a"),
                (Space, " "),
                (Word, "ka\u{0300}n"),
                (Space, " "),
                (Word, "dugu-kolo"),
            ]
        );
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(kinds("A.B.")[0], (TokenKind::Word, "A.B."));
    }

    #[test]
    fn test_sentence_punct_needs_space() {
        use TokenKind::*;
        assert_eq!(
            kinds("a.b a. b"),
            vec![
                (Word, "a"),
                (Nonword, "."),
                (Word, "b"),
                (Space, " "),
                (Word, "a"),
                (SentPunct, "."),
                (Space, " "),
                (Word, "b"),
            ]
        );
    }

    #[test]
    fn test_colon() {
        use TokenKind::*;
        assert_eq!(kinds("a: b")[1], (Punct, ":"));
        assert_eq!(kinds("a:  \nb")[1], (SentPunct, ":"));
    }

    #[test]
    fn test_paragraphs() {
        use TokenKind::*;
        assert_eq!(
            kinds("a\n\nb\nc"),
            vec![(Word, "a"), (Par, "\n\n"), (Word, "b"), (NL, "\n"), (Word, "c")]
        );
    }

    #[test]
    fn test_total_coverage() {
        let tokenizer = Tokenizer::new().unwrap();
        for input in [
            "Mogo ko a kɛra. A taara.",
            "<c>x</c> 12:30, «ko» ߞߊ߬ ߓߊ߯!\r\n\r\n ‏؟ _ ~ \u{0301}",
            "",
            "\u{0300}\u{0300}abc\u{200f}",
        ] {
            let rebuilt: String = tokenizer.tokenize(input).map(|t| t.text()).collect();
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn test_tokens_outlive_tokenizer() {
        let input = String::from("so ye.");
        let tokens: Vec<Token> = {
            let tokenizer = Tokenizer::new().unwrap();
            tokenizer.tokenize(&input).collect()
        };
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].text(), ".");
        assert_eq!(tokens[3].range_byte(), 5..6);
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = Tokenizer::new().unwrap();
        assert_eq!(tokenizer.tokenize("").count(), 0);
        assert_eq!(Tokenizer::split_sentences(tokenizer.tokenize("")).count(), 0);
    }

    #[test]
    fn test_split_sentences() {
        let tokenizer = Tokenizer::new().unwrap();
        let input = "Mogo ko a kɛra. A taara.";
        let sents: Vec<_> = Tokenizer::split_sentences(tokenizer.tokenize(input)).collect();
        assert_eq!(sents.len(), 2);
        for sent in &sents {
            assert_eq!(sent.last().unwrap().kind(), TokenKind::SentPunct);
        }
        let total: usize = sents.iter().map(Vec::len).sum();
        assert_eq!(total, tokenizer.tokenize(input).count());
        let rebuilt: String = sents.iter().flatten().map(|t| t.text()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_split_incomplete_sentence() {
        let tokenizer = Tokenizer::new().unwrap();
        let sents: Vec<_> =
            Tokenizer::split_sentences(tokenizer.tokenize("A taara. A ma")).collect();
        assert_eq!(sents.len(), 2);
        assert_eq!(sents[1].last().unwrap().text(), "ma");
    }

    #[test]
    fn test_custom_rules_fallback() {
        let tokenizer =
            Tokenizer::from_rules([RuleSpec::new(TokenKind::Word, r"\w+")]).unwrap();
        let tokens: Vec<_> = tokenizer
            .tokenize("ab c")
            .map(|t| (t.kind(), t.text()))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "ab"),
                (TokenKind::Nonword, " "),
                (TokenKind::Word, "c"),
            ]
        );
    }

    #[test]
    #[should_panic]
    fn test_invalid_rule() {
        Tokenizer::from_rules([RuleSpec::new(TokenKind::Word, r"(")]).unwrap();
    }
}
