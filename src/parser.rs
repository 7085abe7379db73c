//! Parser for TypeScript ambient declaration files.

use std::fmt;

use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, Token, TokenKind};

/// A fatal lexical or grammar error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the source.
    pub pos: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl ParseError {
    pub fn new(src: &str, pos: usize, message: impl Into<String>) -> Self {
        let pos = pos.min(src.len());
        let before = &src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message: message.into(),
            pos,
            line,
            column,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a declaration file. The whole input must be consumed.
pub fn parse(src: &str) -> ParseResult<Document> {
    let tokens = Lexer::new(src)
        .tokenize()
        .map_err(|err| ParseError::new(src, err.pos, err.message))?;
    let mut parser = Parser::new(src, tokens);
    parser.parse_document()
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::StringLiteral(_) => f.write_str("string literal"),
            TokenKind::NumberLiteral(_) => f.write_str("number literal"),
            TokenKind::Eof => f.write_str("end of input"),
            other => match other.keyword_text() {
                Some(text) => write!(f, "keyword `{text}`"),
                None => write!(f, "`{}`", punctuation_text(other)),
            },
        }
    }
}

fn punctuation_text(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBrace => "{",
        TokenKind::RBrace => "}",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::LAngle => "<",
        TokenKind::RAngle => ">",
        TokenKind::Comma => ",",
        TokenKind::Semicolon => ";",
        TokenKind::Colon => ":",
        TokenKind::Dot => ".",
        TokenKind::DotDotDot => "...",
        TokenKind::Question => "?",
        TokenKind::Arrow => "=>",
        TokenKind::Eq => "=",
        TokenKind::Pipe => "|",
        TokenKind::Amp => "&",
        TokenKind::Shr => ">>",
        TokenKind::UShr => ">>>",
        TokenKind::GtEq => ">=",
        _ => "operator",
    }
}

/// Parser for TypeScript declaration files.
struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    src: &'src str,
    warnings: Vec<ParseWarning>,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            src,
            warnings: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_nth(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(self.src, pos, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error_at(
            self.current().start,
            format!("expected {expected}, found {}", self.peek()),
        )
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Close a `<...>` list. A `>>`, `>>>` or `>=` token is split so that
    /// nested lists like `Array<Array<T>>` close correctly.
    fn expect_close_angle(&mut self) -> ParseResult<()> {
        let remainder = match self.peek() {
            TokenKind::RAngle => {
                self.advance();
                return Ok(());
            }
            TokenKind::Shr => TokenKind::RAngle,
            TokenKind::UShr => TokenKind::Shr,
            TokenKind::GtEq => TokenKind::Eq,
            _ => return Err(self.unexpected("`>`")),
        };
        let token = &mut self.tokens[self.pos];
        token.kind = remainder;
        token.start += 1;
        Ok(())
    }

    fn warn(&mut self, pos: usize, message: String) {
        tracing::warn!(pos, "{message}");
        self.warnings.push(ParseWarning { message, pos });
    }

    fn is_ident_like(kind: &TokenKind) -> bool {
        matches!(kind, TokenKind::Ident(_)) || kind.is_contextual_keyword()
    }

    /// A binding name: an identifier or a contextual keyword.
    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            kind if kind.is_contextual_keyword() => {
                self.advance();
                Ok(kind.keyword_text().unwrap_or_default().to_string())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// A property name: any identifier, any reserved word, or a literal.
    fn expect_property_name(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) | TokenKind::StringLiteral(name) | TokenKind::NumberLiteral(name) => {
                self.advance();
                Ok(name)
            }
            kind => match kind.keyword_text() {
                Some(text) => {
                    self.advance();
                    Ok(text.to_string())
                }
                None => Err(self.unexpected("property name")),
            },
        }
    }

    fn parse_document(&mut self) -> ParseResult<Document> {
        let mut declarations = Vec::new();

        while !self.check(&TokenKind::Eof) {
            if self.matches(&TokenKind::Semicolon) {
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }

        Ok(Document {
            declarations,
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    fn is_unsupported_statement(&self) -> bool {
        match self.peek() {
            TokenKind::Import | TokenKind::Enum => true,
            TokenKind::Const => matches!(self.peek_nth(1), TokenKind::Enum),
            TokenKind::Export => match self.peek_nth(1) {
                TokenKind::Eq | TokenKind::Default | TokenKind::LBrace | TokenKind::Star => true,
                TokenKind::Ident(name) => name == "as",
                _ => false,
            },
            TokenKind::Module => matches!(self.peek_nth(1), TokenKind::StringLiteral(_)),
            _ => false,
        }
    }

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let start = self.current().start;

        loop {
            if self.is_unsupported_statement() {
                return self.skip_unsupported(start);
            }
            if !self.matches(&TokenKind::Export) && !self.matches(&TokenKind::Declare) {
                break;
            }
        }

        match self.peek() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                Ok(Declaration::Variable(self.parse_variable()?))
            }
            TokenKind::Function => Ok(Declaration::Function(self.parse_function()?)),
            TokenKind::Interface => Ok(Declaration::Interface(self.parse_interface()?)),
            TokenKind::Class => Ok(Declaration::Class(self.parse_class()?)),
            TokenKind::Type if Self::is_ident_like(self.peek_nth(1)) => {
                Ok(Declaration::TypeAlias(self.parse_type_alias()?))
            }
            TokenKind::Module | TokenKind::Namespace => {
                Ok(Declaration::Namespace(self.parse_namespace()?))
            }
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// Consume a balanced run of tokens up to a top-level `;` or a closing
    /// `}` and keep its source text.
    fn skip_unsupported(&mut self, start: usize) -> ParseResult<Declaration> {
        let mut depth = 0usize;
        let mut end = start;

        loop {
            match self.peek() {
                TokenKind::Eof if depth > 0 => return Err(self.unexpected("closing bracket")),
                TokenKind::Eof => break,
                TokenKind::RBrace if depth == 0 => break,
                TokenKind::RParen | TokenKind::RBracket if depth == 0 => {
                    return Err(self.unexpected("declaration"));
                }
                _ => {}
            }

            let token = self.advance();
            end = token.end;
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth -= 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        if self.check(&TokenKind::Semicolon) {
                            end = self.advance().end;
                        }
                        break;
                    }
                }
                TokenKind::Semicolon if depth == 0 => break,
                _ => {}
            }
        }

        Ok(Declaration::Unsupported(self.src[start..end].to_string()))
    }

    fn parse_variable(&mut self) -> ParseResult<VarDecl> {
        self.advance(); // var / let / const
        let name = self.expect_ident()?;
        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.matches(&TokenKind::Semicolon);

        Ok(VarDecl { name, ty })
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let signature = self.parse_signature()?;
        self.matches(&TokenKind::Semicolon);

        Ok(FunctionDecl { name, signature })
    }

    fn parse_interface(&mut self) -> ParseResult<InterfaceDecl> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.matches(&TokenKind::Extends) {
            loop {
                extends.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_member_block()?;

        Ok(InterfaceDecl {
            name,
            type_params,
            extends,
            members,
        })
    }

    fn parse_class(&mut self) -> ParseResult<ClassDecl> {
        self.expect(&TokenKind::Class)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let extends = if self.matches(&TokenKind::Extends) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.matches(&TokenKind::Implements) {
            loop {
                implements.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_member_block()?;

        Ok(ClassDecl {
            name,
            type_params,
            extends,
            implements,
            members,
        })
    }

    fn parse_type_alias(&mut self) -> ParseResult<TypeAliasDecl> {
        self.expect(&TokenKind::Type)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);

        Ok(TypeAliasDecl {
            name,
            type_params,
            ty,
        })
    }

    fn parse_namespace(&mut self) -> ParseResult<NamespaceDecl> {
        self.advance(); // module / namespace

        let mut path = vec![self.expect_ident()?];
        while self.matches(&TokenKind::Dot) {
            path.push(self.expect_ident()?);
        }

        self.expect(&TokenKind::LBrace)?;
        let mut declarations = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(self.unexpected("`}`"));
            }
            if self.matches(&TokenKind::Semicolon) {
                continue;
            }
            declarations.push(self.parse_declaration()?);
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(NamespaceDecl { path, declarations })
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        if !self.matches(&TokenKind::LAngle) {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        loop {
            let name = self.expect_ident()?;

            let constraint = if self.matches(&TokenKind::Extends) {
                Some(self.parse_type()?)
            } else {
                None
            };

            let default = if self.matches(&TokenKind::Eq) {
                Some(self.parse_type()?)
            } else {
                None
            };

            params.push(TypeParam {
                name,
                constraint,
                default,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_close_angle()?;
        Ok(params)
    }

    fn parse_signature(&mut self) -> ParseResult<Signature> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let result = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        Ok(Signature {
            type_params,
            params,
            result,
        })
    }

    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            // `this: T` only constrains the receiver; it is not a real parameter.
            if self.check(&TokenKind::This) {
                self.advance();
                self.expect(&TokenKind::Colon)?;
                self.parse_type()?;
            } else {
                params.push(self.parse_param()?);
            }

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        let start = self.current().start;
        let spread = self.matches(&TokenKind::DotDotDot);
        let name = self.expect_ident()?;
        let optional = self.matches(&TokenKind::Question);
        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        if !spread {
            return Ok(Param { name, optional, ty });
        }

        let ty = match ty.map(Type::into_array_element) {
            Some(Ok(elem)) => Some(Type::Repeated(Box::new(elem))),
            Some(Err(ty)) => {
                self.warn(
                    start,
                    format!(
                        "dropping repeated marker of param `{name}` because its type `{ty}` is not an array type"
                    ),
                );
                Some(ty)
            }
            None => {
                self.warn(
                    start,
                    format!("dropping repeated marker of param `{name}` because it has no array type"),
                );
                None
            }
        };

        Ok(Param { name, optional, ty })
    }

    fn parse_member_block(&mut self) -> ParseResult<Vec<Member>> {
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            members.push(self.parse_member()?);
            if !self.matches(&TokenKind::Semicolon) && !self.matches(&TokenKind::Comma) {
                break;
            }
            // Tolerate doubled separators.
            while self.matches(&TokenKind::Semicolon) {}
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(members)
    }

    /// Whether the current word is a modifier rather than a member name,
    /// e.g. `static name: T` versus `static: boolean`.
    fn is_modifier(&self) -> bool {
        !matches!(
            self.peek_nth(1),
            TokenKind::Colon
                | TokenKind::Question
                | TokenKind::LParen
                | TokenKind::LAngle
                | TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::RBrace
        )
    }

    fn parse_member(&mut self) -> ParseResult<Member> {
        let mut is_static = false;
        loop {
            let is_modifier_word = match self.peek() {
                TokenKind::Static => {
                    if self.is_modifier() {
                        is_static = true;
                    }
                    true
                }
                TokenKind::Public | TokenKind::Private | TokenKind::Protected => true,
                TokenKind::Ident(word) => word == "readonly" || word == "abstract",
                _ => false,
            };
            if is_modifier_word && self.is_modifier() {
                self.advance();
            } else {
                break;
            }
        }

        let member = self.parse_member_body()?;
        Ok(if is_static {
            Member::Static(Box::new(member))
        } else {
            member
        })
    }

    fn parse_member_body(&mut self) -> ParseResult<Member> {
        if self.check(&TokenKind::LBracket) {
            self.advance();
            let param = self.parse_param()?;
            self.expect(&TokenKind::RBracket)?;
            self.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            return Ok(Member::Index { param, ty });
        }

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            return Ok(Member::Call(self.parse_signature()?));
        }

        if self.check(&TokenKind::New)
            && matches!(self.peek_nth(1), TokenKind::LParen | TokenKind::LAngle)
        {
            self.advance();
            return Ok(Member::Construct(self.parse_signature()?));
        }

        let name = self.expect_property_name()?;
        let optional = self.matches(&TokenKind::Question);

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let signature = self.parse_signature()?;
            return Ok(Member::Method {
                name,
                optional,
                signature,
            });
        }

        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        Ok(Member::Property { name, optional, ty })
    }

    fn parse_type(&mut self) -> ParseResult<Type> {
        // Leading `|` is allowed: `type T = | A | B`
        self.matches(&TokenKind::Pipe);

        let first = self.parse_intersection_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut types = vec![first];
        while self.matches(&TokenKind::Pipe) {
            types.push(self.parse_intersection_type()?);
        }
        Ok(Type::Union(types))
    }

    fn parse_intersection_type(&mut self) -> ParseResult<Type> {
        let first = self.parse_postfix_type()?;
        if !self.check(&TokenKind::Amp) {
            return Ok(first);
        }

        let mut types = vec![first];
        while self.matches(&TokenKind::Amp) {
            types.push(self.parse_postfix_type()?);
        }
        Ok(Type::Intersection(types))
    }

    fn parse_postfix_type(&mut self) -> ParseResult<Type> {
        let mut ty = self.parse_primary_type()?;

        // Array suffix: T[]
        while self.check(&TokenKind::LBracket) && self.peek_nth(1) == &TokenKind::RBracket {
            self.advance();
            self.advance();
            ty = Type::array(ty);
        }

        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<Type> {
        let core = match self.peek() {
            TokenKind::Any_ => Some(CoreType::Any),
            TokenKind::Void_ => Some(CoreType::Void),
            TokenKind::Number_ => Some(CoreType::Number),
            TokenKind::Bool_ => Some(CoreType::Bool),
            TokenKind::Boolean_ => Some(CoreType::Boolean),
            TokenKind::String_ => Some(CoreType::String),
            _ => None,
        };
        if let Some(core) = core {
            self.advance();
            return Ok(Type::Core(core));
        }

        match self.peek().clone() {
            TokenKind::Ident(_) => {
                let name = self.parse_qualified_name()?;
                let args = if self.check(&TokenKind::LAngle) {
                    self.parse_type_args()?
                } else {
                    Vec::new()
                };
                Ok(Type::Named { name, args })
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(Type::Literal(format!("{s:?}")))
            }
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(Type::Literal(n))
            }
            TokenKind::Minus if matches!(self.peek_nth(1), TokenKind::NumberLiteral(_)) => {
                self.advance();
                match self.advance().kind {
                    TokenKind::NumberLiteral(n) => Ok(Type::Literal(format!("-{n}"))),
                    _ => Err(self.unexpected("number literal")),
                }
            }
            TokenKind::True | TokenKind::False | TokenKind::Null | TokenKind::This => {
                let text = self.peek().keyword_text().unwrap_or_default().to_string();
                self.advance();
                Ok(Type::Literal(text))
            }
            TokenKind::Typeof => {
                self.advance();
                Ok(Type::Query(self.parse_qualified_name()?))
            }
            TokenKind::LBrace => Ok(Type::Object(self.parse_member_block()?)),
            TokenKind::LBracket => self.parse_tuple_type(),
            TokenKind::LParen if self.is_function_type_start() => self.parse_function_type(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Type::Parenthesized(Box::new(inner)))
            }
            TokenKind::LAngle => self.parse_function_type(),
            TokenKind::New => {
                self.advance();
                match self.parse_function_type()? {
                    Type::Function(sig) => Ok(Type::Constructor(sig)),
                    other => Ok(other),
                }
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_qualified_name(&mut self) -> ParseResult<Vec<String>> {
        let mut name = vec![self.expect_ident()?];
        while self.check(&TokenKind::Dot) && Self::is_ident_like(self.peek_nth(1)) {
            self.advance();
            name.push(self.expect_ident()?);
        }
        Ok(name)
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<Type>> {
        self.expect(&TokenKind::LAngle)?;
        let mut args = Vec::new();

        loop {
            args.push(self.parse_type()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_close_angle()?;
        Ok(args)
    }

    /// At a `(`: does the matching `)` precede `=>`?
    fn is_function_type_start(&self) -> bool {
        let mut depth = 0usize;
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            match self.tokens[idx].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(idx + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            idx += 1;
        }
        false
    }

    fn parse_function_type(&mut self) -> ParseResult<Type> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        let result = self.parse_type()?;

        Ok(Type::Function(Box::new(Signature {
            type_params,
            params,
            result: Some(result),
        })))
    }

    fn parse_tuple_type(&mut self) -> ParseResult<Type> {
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_type()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(Type::Tuple(elements))
    }
}
