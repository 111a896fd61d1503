//! Lexical analyzer for use case diagram source text.
//!
//! The lexer converts source text into a vector of [`PositionedToken`]s for
//! the parser. Spaces and tabs between tokens are skipped; newlines are kept
//! because they terminate statements. A synthetic [`Token::Eof`] always ends
//! the vector.
//!
//! Lexing stops at the first character that starts no token.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, delimited, terminated},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location as _, Stream},
    token::{literal, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::LineIndex,
    tokens::{Keyword, PositionedToken, Token},
};

/// Diagnostic details attached to a committed lexer failure via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = Result<O, ErrMode<ContextError<LexerDiagnostic>>>;

/// Replace every run of whitespace with one space and trim both ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Skip spaces and tabs.
fn blanks<'a>(input: &mut Input<'a>) -> IResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

/// Parse `@startuml` and `@enduml`
fn markers<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("@startuml").value(Token::StartUml),
        literal("@enduml").value(Token::EndUml),
    ))
    .parse_next(input)
}

/// Parse a double quoted string. The value is everything between the quotes,
/// newlines included; there are no escapes.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(take_while(0.., |c: char| c != '"'), '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add a closing `\"`"),
            start,
        })
        .map(Token::StringLiteral)
        .parse_next(input)
}

fn is_stereotype_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse `<<name>>`, keeping only the name.
fn stereotype<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    "<<".parse_next(input)?;

    cut_err(delimited(
        blanks,
        take_while(1.., is_stereotype_char),
        (blanks, ">>"),
    ))
    .context(LexerDiagnostic {
        code: ErrorCode::E004,
        message: "malformed stereotype",
        help: Some("write a stereotype as `<<name>>` using letters, digits, `_` or `-`"),
        start,
    })
    .map(Token::Stereotype)
    .parse_next(input)
}

/// Parse `<|--`
fn inherit<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    literal("<|--").value(Token::Inherit).parse_next(input)
}

/// Parse solid (`-->`) and dotted (`..>`) arrows of any length.
fn arrow<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        (take_while(1.., '-'), '>').value(Token::SolidArrow),
        (take_while(1.., '.'), '>').value(Token::DottedArrow),
    ))
    .parse_next(input)
}

/// Parse `:text:` on a single line.
///
/// Backtracks when no closing colon follows on the same line, which leaves
/// the `:` to be read as a plain [`Token::Colon`].
fn actor_text<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    delimited(':', take_while(1.., |c: char| c != ':' && c != '\n'), ':')
        .map(|text: &str| Token::ActorText(collapse_whitespace(text)))
        .parse_next(input)
}

/// Parse `(text)` on a single line.
fn use_case_text<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    '('.parse_next(input)?;

    cut_err(terminated(
        take_while(1.., |c: char| !matches!(c, '(' | ')' | '\n')),
        ')',
    ))
    .context(LexerDiagnostic {
        code: ErrorCode::E003,
        message: "unterminated use case text",
        help: Some("close the use case text with `)` on the same line"),
        start,
    })
    .map(|text: &str| Token::UseCaseText(collapse_whitespace(text)))
    .parse_next(input)
}

/// Parse an identifier, then look the whole word up in the keyword table.
fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(|word: &'a str| Keyword::from_word(word).map_or(Token::Identifier(word), Token::Keyword))
        .parse_next(input)
}

/// Parse single character tokens
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        ':'.value(Token::Colon),
    ))
    .parse_next(input)
}

/// Parse `\n` or `\r\n`
fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt(("\r\n", "\n")).value(Token::Newline).parse_next(input)
}

/// Parse a single token. Alternatives are tried in priority order.
fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        markers,
        string_literal,
        stereotype, // Must come before inherit
        inherit,
        arrow,
        actor_text, // Must come before punctuation
        use_case_text,
        word,
        // winnow implements `Alt` for tuples of up to nine parsers
        alt((punctuation, newline)),
    ))
    .parse_next(input)
}

/// Lexer that accumulates tokens for one source text.
struct Lexer<'a> {
    lines: LineIndex<'a>,
    tokens: Vec<PositionedToken<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: LineIndex::new(source),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input, stopping at the first error.
    fn tokenize(mut self, mut input: Input<'a>) -> Result<Vec<PositionedToken<'a>>, Diagnostic> {
        loop {
            let start = input.current_token_start();
            blanks(&mut input).map_err(|err| self.convert_err_mode(err, start, start))?;

            if input.eof_offset() == 0 {
                break;
            }

            let start = input.current_token_start();
            match token(&mut input) {
                Ok(token) => {
                    let end = input.current_token_start();
                    let span = self.lines.span(start..end);
                    self.tokens.push(PositionedToken::new(token, span));
                }
                Err(err) => {
                    let error_pos = input.current_token_start();
                    return Err(self.convert_err_mode(err, start, error_pos));
                }
            }
        }

        let end = input.current_token_start();
        let span = self.lines.span(end..end);
        self.tokens.push(PositionedToken::new(Token::Eof, span));

        Ok(self.tokens)
    }

    /// Convert a winnow error into a diagnostic.
    ///
    /// Committed failures carry a `LexerDiagnostic` describing what was being
    /// lexed. Anything else means no token starts at `token_start`, which is
    /// reported as E002 (unexpected character).
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        token_start: usize,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let end = error_pos.max(*start + 1);
            let span = self.lines.span(*start..end);

            let mut diag = Diagnostic::error(*code, *message)
                .with_label(span, code.description())
                .with_found(self.lines.text(*start..end));
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let found = self.lines.char_at(token_start);
        let width = found.map_or(0, char::len_utf8);
        let span = self.lines.span(token_start..token_start + width);
        let message = match found {
            Some(c) => format!("unexpected character `{}`", c.escape_debug()),
            None => "unexpected character".to_string(),
        };

        let mut diag = Diagnostic::error(ErrorCode::E002, message)
            .with_label(span, ErrorCode::E002.description());
        if let Some(c) = found {
            diag = diag.with_found(c.to_string());
        }
        if matches!(found, Some('-' | '.')) {
            diag = diag.with_help("arrows are written `-->` or `..>`");
        }
        diag
    }
}

/// Tokenize source text.
///
/// # Returns
///
/// - `Ok(tokens)` - every token of the input followed by [`Token::Eof`]
/// - `Err(ParseError)` - the first lexical error
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let tokens = Lexer::new(input).tokenize(LocatingSlice::new(input))?;
    trace!(token_count = tokens.len(); "Tokenized source");
    Ok(tokens)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Identifiers that are not keywords.
    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,20}".prop_filter("avoid keywords", |s| {
            Keyword::from_word(s).is_none()
        })
    }

    /// Words separated by random runs of blanks.
    fn spaced_words_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[A-Za-z0-9]{1,8}", "[ \t]{1,3}"), 1..5)
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_identifier_is_one_token(id: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(id).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(&tokens[0].token, &Token::Identifier(id));
        prop_assert_eq!(&tokens[1].token, &Token::Eof);
        Ok(())
    }

    fn check_actor_text_collapses(words: &[(String, String)]) -> Result<(), TestCaseError> {
        let mut raw = String::new();
        for (word, gap) in words {
            raw.push_str(gap);
            raw.push_str(word);
        }
        let source = format!(":{raw}:");
        let expected = words
            .iter()
            .map(|(word, _)| word.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&tokens[0].token, &Token::ActorText(expected));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn identifier_is_one_token(id in identifier_strategy()) {
            check_identifier_is_one_token(&id)?;
        }

        #[test]
        fn actor_text_collapses(words in spaced_words_strategy()) {
            check_actor_text_collapses(&words)?;
        }
    }
}
