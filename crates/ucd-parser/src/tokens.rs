//! Token types produced by the lexer.

use std::fmt;

use ucd_core::ast::write_delimited;

use crate::span::Span;

/// Reserved words. Any identifier spelled like one of these lexes as a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Actor,
    As,
    UseCase,
    Package,
    Includes,
    Extends,
}

impl Keyword {
    const TABLE: [(&'static str, Keyword); 6] = [
        ("actor", Keyword::Actor),
        ("as", Keyword::As),
        ("usecase", Keyword::UseCase),
        ("package", Keyword::Package),
        ("includes", Keyword::Includes),
        ("extends", Keyword::Extends),
    ];

    /// Look up a complete word in the keyword table.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, keyword)| *keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Actor => "actor",
            Keyword::As => "as",
            Keyword::UseCase => "usecase",
            Keyword::Package => "package",
            Keyword::Includes => "includes",
            Keyword::Extends => "extends",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical token.
///
/// Text-carrying variants hold their value with delimiters removed.
/// `ActorText` and `UseCaseText` own their value because runs of whitespace
/// inside them are collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// `@startuml`
    StartUml,
    /// `@enduml`
    EndUml,
    Colon,
    /// `->`, `-->`, ...
    SolidArrow,
    /// `.>`, `..>`, ...
    DottedArrow,
    /// `<|--`
    Inherit,
    LeftBrace,
    RightBrace,
    StringLiteral(&'src str),
    Stereotype(&'src str),
    ActorText(String),
    UseCaseText(String),
    Identifier(&'src str),
    Keyword(Keyword),
    Newline,
    /// Synthetic token appended after the last character.
    Eof,
}

impl Token<'_> {
    /// Stable human readable name of the token kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::StartUml => "start marker",
            Token::EndUml => "end marker",
            Token::Colon => "colon",
            Token::SolidArrow => "solid arrow",
            Token::DottedArrow => "dotted arrow",
            Token::Inherit => "inheritance arrow",
            Token::LeftBrace => "left brace",
            Token::RightBrace => "right brace",
            Token::StringLiteral(_) => "string",
            Token::Stereotype(_) => "stereotype",
            Token::ActorText(_) => "actor text",
            Token::UseCaseText(_) => "use case text",
            Token::Identifier(_) => "identifier",
            Token::Keyword(_) => "keyword",
            Token::Newline => "newline",
            Token::Eof => "end of input",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StartUml => write!(f, "@startuml"),
            Token::EndUml => write!(f, "@enduml"),
            Token::Colon => write!(f, ":"),
            Token::SolidArrow => write!(f, "-->"),
            Token::DottedArrow => write!(f, "..>"),
            Token::Inherit => write!(f, "<|--"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Stereotype(s) => write!(f, "<<{s}>>"),
            Token::ActorText(s) => write_delimited(f, ':', s, ':'),
            Token::UseCaseText(s) => write_delimited(f, '(', s, ')'),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Keyword(k) => write!(f, "{k}"),
            Token::Newline => write!(f, "\\n"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// A token with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }

    /// 1-based line of the first character.
    pub fn line(&self) -> usize {
        self.span.line()
    }

    /// 1-based column of the first character.
    pub fn column(&self) -> usize {
        self.span.column()
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        for (word, keyword) in Keyword::TABLE {
            assert_eq!(Keyword::from_word(word), Some(keyword));
            assert_eq!(keyword.as_str(), word);
        }
        assert_eq!(Keyword::from_word("Actor"), None);
        assert_eq!(Keyword::from_word("actors"), None);
    }

    #[test]
    fn test_token_display_matches_source_form() {
        assert_eq!(Token::ActorText("Main User".into()).to_string(), ":Main User:");
        assert_eq!(Token::UseCaseText("Login".into()).to_string(), "(Login)");
        assert_eq!(Token::Stereotype("human").to_string(), "<<human>>");
        assert_eq!(Token::Keyword(Keyword::UseCase).to_string(), "usecase");
        assert_eq!(Token::LeftBrace.to_string(), "{");
    }

    #[test]
    fn test_empty_delimited_text_display_relexes() {
        let actor = Token::ActorText("".into());
        let use_case = Token::UseCaseText("".into());

        assert_eq!(actor.to_string(), ": :");
        assert_eq!(use_case.to_string(), "( )");

        let tokens = crate::lexer::tokenize(": :").unwrap();
        assert_eq!(tokens[0].token, actor);
    }
}
