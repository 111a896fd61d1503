//! Parser for ucd source tokens.
//!
//! This module transforms the token vector from the [`lexer`](super::lexer)
//! into a [`Diagram`]. The public entry point is [`build_diagram`].
//!
//! Every production is decided by its first token, except that actor and use
//! case text may start either a shorthand declaration or a relation; there the
//! parser peeks one token further for an arrow. Failures are committed at the
//! offending token, so the first token that cannot continue the diagram is the
//! one reported.
//!
//! Semantic checks run against a [`SymbolTable`] as soon as each node has been
//! parsed, in document order. A duplicate or unresolved name aborts the parse
//! at that node.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{opt, peek, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use ucd_core::ast::{
    ArrowStyle, Definition, Diagram, EntityDecl, EntityKind, LinkLabel, Notation, PackageDecl,
    RefNotation, Reference, Relation,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Spanned,
    symbols::SymbolTable,
    tokens::{Keyword, PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at the offending token
    ///
    /// The token index is `tokens.len() - remaining`.
    Remaining(usize),
    /// A semantic check rejected the node being built
    Semantic(Box<Diagnostic>),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type Failure = ErrMode<ContextError<Context>>;
type IResult<O> = std::result::Result<O, Failure>;

/// The construct whose definition list is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Diagram,
    Package,
}

impl Block {
    fn is_closed_by(self, token: &Token<'_>) -> bool {
        match self {
            Block::Diagram => matches!(token, Token::EndUml),
            Block::Package => matches!(token, Token::RightBrace),
        }
    }
}

/// What joins the two sides of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connector {
    Arrow(ArrowStyle),
    Inherit,
}

/// Convert a failure into a committed error located at the token `remaining`
/// tokens before the end.
fn commit(err: Failure, remaining: usize) -> Failure {
    match err {
        ErrMode::Backtrack(mut e) | ErrMode::Cut(mut e) => {
            e.push(Context::Remaining(remaining));
            ErrMode::Cut(e)
        }
        err => err,
    }
}

/// Committed error at the current token
fn unexpected(input: &Input<'_>, label: &'static str) -> Failure {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    e.push(Context::Remaining(input.eof_offset()));
    ErrMode::Cut(e)
}

/// Committed error carrying a semantic diagnostic
fn semantic(diagnostic: Diagnostic) -> Failure {
    let mut e = ContextError::new();
    e.push(Context::Semantic(Box::new(diagnostic)));
    ErrMode::Cut(e)
}

/// Run `parser`; on failure report `label` as expected at the current token.
fn expect<'src, O, P>(input: &mut Input<'src>, label: &'static str, parser: P) -> IResult<O>
where
    P: winnow::Parser<Input<'src>, O, Failure>,
{
    let remaining = input.eof_offset();
    parser
        .context(Context::Label(label))
        .parse_next(input)
        .map_err(|err| commit(err, remaining))
}

/// Look at the next token without consuming it
fn lookahead<'src>(input: &mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    peek(any).parse_next(input)
}

/// Match one specific token
fn exact<'src>(expected: Token<'static>) -> impl winnow::Parser<Input<'src>, (), Failure> {
    any.verify(move |token: &PositionedToken<'_>| token.token == expected)
        .void()
}

/// Parse zero or more newlines
fn newlines0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., exact(Token::Newline)).parse_next(input)
}

/// Parse an identifier with span preservation
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse `as <identifier>`
fn alias<'src>(input: &mut Input<'src>) -> IResult<Option<Spanned<String>>> {
    if opt(exact(Token::Keyword(Keyword::As)))
        .parse_next(input)?
        .is_none()
    {
        return Ok(None);
    }
    expect(input, "identifier after `as`", identifier).map(Some)
}

/// Parse `<<name>>`
fn stereotype<'src>(input: &mut Input<'src>) -> IResult<String> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Stereotype(name) => Some(name.to_string()),
        _ => None,
    })
    .parse_next(input)
}

/// Parse the label following `actor` or `usecase`
fn entity_label<'src>(
    kind: EntityKind,
) -> impl winnow::Parser<Input<'src>, (Spanned<String>, Notation), Failure> {
    any.verify_map(move |token: &PositionedToken<'_>| {
        let (label, notation) = match (&token.token, kind) {
            (Token::Identifier(name), _) => (name.to_string(), Notation::Identifier),
            (Token::StringLiteral(text), _) => (text.to_string(), Notation::Quoted),
            (Token::ActorText(text), EntityKind::Actor) => (text.clone(), Notation::Delimited),
            (Token::UseCaseText(text), EntityKind::UseCase) => {
                (text.clone(), Notation::Delimited)
            }
            _ => return None,
        };
        Some((Spanned::new(label, token.span), notation))
    })
}

/// Parse actor or use case text standing alone as a declaration
fn shorthand_label<'src>(input: &mut Input<'src>) -> IResult<(EntityKind, Spanned<String>)> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::ActorText(text) => Some((EntityKind::Actor, Spanned::new(text.clone(), token.span))),
        Token::UseCaseText(text) => Some((
            EntityKind::UseCase,
            Spanned::new(text.clone(), token.span),
        )),
        _ => None,
    })
    .parse_next(input)
}

/// Parse the optional alias and stereotype of a declaration, then register
/// the alias and the label.
fn entity_tail<'src>(
    input: &mut Input<'src>,
    symbols: &mut SymbolTable,
    kind: EntityKind,
    label: Spanned<String>,
    notation: Notation,
) -> IResult<EntityDecl> {
    let alias = alias(input)?;
    let stereotype = opt(stereotype).parse_next(input)?;

    if let Some(alias) = &alias {
        symbols.declare_identifier(alias).map_err(semantic)?;
    }
    symbols.declare_label(kind, &label).map_err(semantic)?;

    trace!(kind:%, label:% = label; "Declared entity");

    Ok(EntityDecl::new(
        kind,
        label.into_inner(),
        notation,
        alias.map(Spanned::into_inner),
        stereotype,
    ))
}

/// Parse `actor ...` or `usecase ...`
fn keyword_declaration<'src>(
    input: &mut Input<'src>,
    symbols: &mut SymbolTable,
    kind: EntityKind,
) -> IResult<EntityDecl> {
    let (keyword, expected) = match kind {
        EntityKind::Actor => (Keyword::Actor, "actor name, `:text:` or string"),
        EntityKind::UseCase => (Keyword::UseCase, "use case name, `(text)` or string"),
    };
    exact(Token::Keyword(keyword)).parse_next(input)?;

    let (label, notation) = expect(input, expected, entity_label(kind))?;
    entity_tail(input, symbols, kind, label, notation)
}

/// Parse `:text:` or `(text)` declarations
fn shorthand_declaration<'src>(
    input: &mut Input<'src>,
    symbols: &mut SymbolTable,
) -> IResult<EntityDecl> {
    let (kind, label) = shorthand_label(input)?;
    entity_tail(input, symbols, kind, label, Notation::Shorthand)
}

/// Parse a relation endpoint before resolution
fn reference<'src>(input: &mut Input<'src>) -> IResult<(Spanned<String>, RefNotation)> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let (name, notation) = match &token.token {
            Token::Identifier(name) => (name.to_string(), RefNotation::Identifier),
            Token::ActorText(text) => (text.clone(), RefNotation::ActorText),
            Token::UseCaseText(text) => (text.clone(), RefNotation::UseCaseText),
            _ => return None,
        };
        Some((Spanned::new(name, token.span), notation))
    })
    .parse_next(input)
}

/// Parse an arrow or `<|--`
fn connector<'src>(input: &mut Input<'src>) -> IResult<Connector> {
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::SolidArrow => Some(Connector::Arrow(ArrowStyle::Solid)),
        Token::DottedArrow => Some(Connector::Arrow(ArrowStyle::Dotted)),
        Token::Inherit => Some(Connector::Inherit),
        _ => None,
    })
    .parse_next(input)
}

/// Whether the current token is followed by a connector
fn starts_relation<'src>(input: &mut Input<'src>) -> IResult<bool> {
    opt(peek((any, connector)))
        .map(|found| found.is_some())
        .parse_next(input)
}

/// Parse `: includes`, `: extends` or `: name`
fn link<'src>(input: &mut Input<'src>) -> IResult<Option<LinkLabel>> {
    if opt(exact(Token::Colon)).parse_next(input)?.is_none() {
        return Ok(None);
    }

    let label = expect(
        input,
        "`includes`, `extends` or a link name",
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::Keyword(Keyword::Includes) => Some(LinkLabel::Includes),
            Token::Keyword(Keyword::Extends) => Some(LinkLabel::Extends),
            Token::Identifier(name) => Some(LinkLabel::Named(name.to_string())),
            _ => None,
        }),
    )?;
    Ok(Some(label))
}

fn resolve(
    symbols: &SymbolTable,
    (name, notation): (Spanned<String>, RefNotation),
) -> IResult<Reference> {
    let namespace = symbols.resolve(&name).map_err(semantic)?;
    Ok(Reference::new(name.into_inner(), notation, namespace))
}

/// Parse an association or inheritance and resolve both endpoints
fn relation<'src>(input: &mut Input<'src>, symbols: &mut SymbolTable) -> IResult<Relation> {
    let left = expect(input, "relation source", reference)?;
    let connector = expect(input, "`-->`, `..>` or `<|--`", connector)?;
    let right = expect(input, "relation target", reference)?;

    let relation = match connector {
        Connector::Arrow(style) => {
            let label = link(input)?;
            Relation::Association {
                left: resolve(symbols, left)?,
                right: resolve(symbols, right)?,
                style,
                label,
            }
        }
        Connector::Inherit => Relation::Inheritance {
            parent: resolve(symbols, left)?,
            child: resolve(symbols, right)?,
        },
    };

    Ok(relation)
}

/// Parse `package Name { ... }`
fn package<'src>(input: &mut Input<'src>, symbols: &mut SymbolTable) -> IResult<PackageDecl> {
    exact(Token::Keyword(Keyword::Package)).parse_next(input)?;

    let name = expect(input, "package name", identifier)?;
    symbols.declare_identifier(&name).map_err(semantic)?;

    expect(input, "`{` after package name", exact(Token::LeftBrace))?;
    let definitions = definitions(input, symbols, Block::Package)?;
    expect(input, "`}`", exact(Token::RightBrace))?;

    trace!(name:% = name, definitions = definitions.len(); "Parsed package");

    Ok(PackageDecl::new(name.into_inner(), definitions))
}

/// Parse a single definition
fn definition<'src>(input: &mut Input<'src>, symbols: &mut SymbolTable) -> IResult<Definition> {
    let next = lookahead(input)?;

    match &next.token {
        Token::Keyword(Keyword::Actor) => {
            keyword_declaration(input, symbols, EntityKind::Actor).map(Definition::Entity)
        }
        Token::Keyword(Keyword::UseCase) => {
            keyword_declaration(input, symbols, EntityKind::UseCase).map(Definition::Entity)
        }
        Token::Keyword(Keyword::Package) => package(input, symbols).map(Definition::Package),
        Token::Identifier(_) => relation(input, symbols).map(Definition::Relation),
        Token::ActorText(_) | Token::UseCaseText(_) => {
            if starts_relation(input)? {
                relation(input, symbols).map(Definition::Relation)
            } else {
                shorthand_declaration(input, symbols).map(Definition::Entity)
            }
        }
        _ => Err(unexpected(input, "definition")),
    }
}

/// Parse newline terminated definitions until the block's closing token.
///
/// Blank lines are empty definitions and produce nothing.
fn definitions<'src>(
    input: &mut Input<'src>,
    symbols: &mut SymbolTable,
    block: Block,
) -> IResult<Vec<Definition>> {
    let mut definitions = Vec::new();

    loop {
        let next = lookahead(input)?;
        if block.is_closed_by(&next.token) {
            break;
        }
        if next.token != Token::Newline {
            definitions.push(definition(input, symbols)?);
        }
        expect(input, "newline after definition", exact(Token::Newline))?;
    }

    Ok(definitions)
}

/// Parse a whole diagram
fn diagram<'src>(input: &mut Input<'src>, symbols: &mut SymbolTable) -> IResult<Diagram> {
    newlines0(input)?;
    expect(input, "`@startuml`", exact(Token::StartUml))?;

    let name = opt(identifier).parse_next(input)?;
    if let Some(name) = &name {
        symbols.declare_identifier(name).map_err(semantic)?;
    }
    expect(input, "newline after `@startuml`", exact(Token::Newline))?;

    let definitions = definitions(input, symbols, Block::Diagram)?;

    expect(input, "`@enduml`", exact(Token::EndUml))?;
    newlines0(input)?;
    expect(input, "end of input after `@enduml`", exact(Token::Eof))?;

    Ok(Diagram::new(name.map(Spanned::into_inner), definitions))
}

/// Describe a token for an error message.
fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Newline | Token::Eof => token.kind_name().to_string(),
        _ => format!("{} `{token}`", token.kind_name()),
    }
}

/// Convert a winnow error into a diagnostic.
///
/// Semantic failures already carry their diagnostic. Syntax failures are
/// reported at the token recorded by the innermost `Remaining` context, or at
/// the current position if none was recorded.
fn convert_error(
    error: Failure,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(diagnostic) = context.context().find_map(|ctx| match ctx {
        Context::Semantic(diagnostic) => Some(diagnostic.as_ref().clone()),
        _ => None,
    }) {
        return diagnostic;
    }

    let remaining = context
        .context()
        .find_map(|ctx| match ctx {
            Context::Remaining(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(current_remaining);

    let expected = context
        .context()
        .find_map(|ctx| match ctx {
            Context::Label(label) => Some(format!(", expected {label}")),
            _ => None,
        })
        .unwrap_or_default();

    let index = tokens.len().saturating_sub(remaining);
    let Some(token) = tokens.get(index).or(tokens.last()) else {
        return Diagnostic::error(ErrorCode::E101, format!("unexpected end of input{expected}"));
    };

    match token.token {
        Token::Eof => Diagnostic::error(ErrorCode::E101, format!("unexpected end of input{expected}"))
            .with_label(token.span, "input ends here")
            .with_help("every diagram must be closed with `@enduml`")
            .with_found(token.token.to_string()),
        _ => Diagnostic::error(
            ErrorCode::E100,
            format!("unexpected {}{expected}", describe(&token.token)),
        )
        .with_label(token.span, ErrorCode::E100.description())
        .with_found(token.token.to_string()),
    }
}

/// Build a [`Diagram`] from tokens, validating names as they are declared and
/// used.
///
/// A new [`SymbolTable`] is created for every call.
///
/// # Errors
///
/// Returns the diagnostic of the first syntax or semantic error.
pub fn build_diagram<'src>(tokens: &'src [PositionedToken<'src>]) -> Result<Diagram, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);
    let mut symbols = SymbolTable::new();

    match diagram(&mut token_slice, &mut symbols) {
        Ok(diagram) => {
            debug!(
                identifiers = symbols.identifier_count(),
                labels = symbols.label_count();
                "Diagram validated"
            );
            Ok(diagram)
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
