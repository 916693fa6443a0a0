//! Parser for Cool.
//!
//! Declarations are parsed by recursive descent and expressions by
//! precedence climbing, with binding strengths read from the [`Language`].
//! The parser never rejects input: absent tokens become zero-width missing
//! nodes and unexpected tokens are wrapped in `ERROR` nodes, so every source
//! text produces a complete [`Tree`].

use std::iter;
use std::mem;

use cool_foundation::{Error, ErrorKind, Point, Result, Span};
use cool_grammar::{Associativity, FieldId, Language, OperatorInfo, Symbol};

use crate::config::ParserConfig;
use crate::kinds::SymbolTable;
use crate::lexer::Lexer;
use crate::token::{StringPartKind, Token, TokenKind};
use crate::tree::{NodeData, SyntaxError, Tree};

/// Parser for Cool source code.
///
/// A parser needs a language before it can produce trees:
///
/// ```
/// use cool_grammar::{Language, language};
/// use cool_syntax::Parser;
///
/// let mut parser = Parser::new();
/// parser.set_language(&Language::new(language()).unwrap()).unwrap();
/// let tree = parser.parse("class Main {};").unwrap();
/// assert!(!tree.root_node().has_error());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Parser {
    language: Option<(Language, SymbolTable)>,
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with no language and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: ParserConfig) {
        self.config = config;
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Sets the language used for subsequent parses.
    ///
    /// # Errors
    /// Returns an `IncompatibleLanguage` error if the language lacks a node
    /// kind, field, or operator the parser produces. The previous language,
    /// if any, is kept in that case.
    pub fn set_language(&mut self, language: &Language) -> Result<()> {
        let table = SymbolTable::resolve(language)?;
        tracing::debug!(
            language = language.name(),
            abi = language.abi_version(),
            "parser language set"
        );
        self.language = Some((language.clone(), table));
        Ok(())
    }

    /// Returns the current language, if one is set.
    #[must_use]
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref().map(|(language, _)| language)
    }

    /// Parses source text into a tree.
    ///
    /// Returns `None` only when no language has been set. Syntax errors do
    /// not prevent a tree from being built; see [`Tree::errors`].
    #[must_use]
    pub fn parse(&self, source: &str) -> Option<Tree> {
        let (language, table) = self.language.as_ref()?;
        tracing::trace!(bytes = source.len(), "parsing");

        let mut state = ParseState::new(table, &self.config, source);
        let root = state.source_file();
        let tree = Tree::new(
            language.clone(),
            source.to_owned(),
            state.nodes,
            root,
            state.errors,
        );

        tracing::debug!(
            nodes = tree.node_count(),
            errors = tree.errors().len(),
            "parsed source"
        );
        Some(tree)
    }
}

/// Parses source text, failing on the first syntax error.
///
/// # Errors
/// Returns an `IncompatibleLanguage` error if the language cannot drive the
/// parser, or a `ParseError` describing the earliest syntax error.
pub fn parse_strict(language: &Language, source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    let tree = parser
        .parse(source)
        .ok_or_else(|| Error::new(ErrorKind::Internal("parser has no language".into())))?;

    if let Some(error) = tree.errors().first() {
        let point = error.span.start_point;
        return Err(Error::parse_error(
            error.message.clone(),
            point.line(),
            point.display_column(),
            context_line(source, error.span.start),
        ));
    }
    Ok(tree)
}

/// Returns the source line containing `offset`.
fn context_line(source: &str, offset: usize) -> String {
    let offset = offset.min(source.len());
    let line_start = source
        .get(..offset)
        .and_then(|before| before.rfind('\n'))
        .map_or(0, |i| i + 1);
    let line_end = source
        .get(offset..)
        .and_then(|after| after.find('\n'))
        .map_or(source.len(), |i| offset + i);
    source
        .get(line_start..line_end)
        .unwrap_or_default()
        .to_string()
}

/// A finished node and the comments before it that still need a parent.
struct Built {
    id: usize,
    leading: Vec<usize>,
}

impl Built {
    fn bare(id: usize) -> Self {
        Self {
            id,
            leading: Vec::new(),
        }
    }
}

/// Children collected for a node under construction.
struct Builder {
    symbol: Symbol,
    leading: Vec<usize>,
    children: Vec<usize>,
    fields: Vec<Option<FieldId>>,
}

impl Builder {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            leading: Vec::new(),
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Appends a child. Comments before the first child are handed up to
    /// the parent so a node's span starts at its first real token.
    fn push(&mut self, field: Option<FieldId>, built: Built) {
        if self.children.is_empty() {
            self.leading.extend(built.leading);
        } else {
            self.fields
                .extend(iter::repeat_n(None, built.leading.len()));
            self.children.extend(built.leading);
        }
        self.children.push(built.id);
        self.fields.push(field);
    }

    fn child(&mut self, built: Built) {
        self.push(None, built);
    }

    fn field(&mut self, field: FieldId, built: Built) {
        self.push(Some(field), built);
    }
}

/// State for a single parse.
struct ParseState<'a> {
    table: &'a SymbolTable,
    config: &'a ParserConfig,
    source: &'a str,
    lexer: Lexer<'a>,
    /// Current significant token (lookahead).
    current: Token,
    /// End of the last consumed token; missing nodes are placed here.
    prev_end: (usize, Point),
    /// Comment nodes lexed since the last consumed token.
    pending: Vec<usize>,
    nodes: Vec<NodeData>,
    errors: Vec<SyntaxError>,
    depth: usize,
}

impl<'a> ParseState<'a> {
    fn new(table: &'a SymbolTable, config: &'a ParserConfig, source: &'a str) -> Self {
        let mut state = Self {
            table,
            config,
            source,
            lexer: Lexer::new(source),
            current: Token::new(TokenKind::Eof, Span::default()),
            prev_end: (0, Point::default()),
            pending: Vec::new(),
            nodes: Vec::new(),
            errors: Vec::new(),
            depth: 0,
        };
        state.current = state.fetch();
        state
    }

    // ------------------------------------------------------------------
    // Tokens

    /// Lexes up to the next significant token, queueing comments.
    fn fetch(&mut self) -> Token {
        loop {
            let token = self.lexer.next_token();
            if !token.kind.is_trivia() {
                return token;
            }
            self.comment(&token);
        }
    }

    fn comment(&mut self, token: &Token) {
        let unterminated = matches!(token.kind, TokenKind::BlockComment { terminated: false });
        if unterminated {
            self.error("unterminated block comment", token.span);
        }
        if self.config.include_extras {
            let mut data = NodeData::leaf(self.table.leaf_symbol(&token.kind), token.span);
            data.is_extra = true;
            data.has_error = unterminated;
            let id = self.alloc(data);
            self.pending.push(id);
        }
    }

    /// Returns the kind of the significant token after the current one.
    fn peek(&self) -> TokenKind {
        let mut lexer = self.lexer.clone();
        loop {
            let token = lexer.next_token();
            if !token.kind.is_trivia() {
                return token.kind;
            }
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Consumes the current token, returning it with the comments before it.
    fn consume(&mut self) -> (Token, Vec<usize>) {
        let leading = mem::take(&mut self.pending);
        let next = self.fetch();
        let token = mem::replace(&mut self.current, next);
        self.prev_end = (token.span.end, token.span.end_point);
        (token, leading)
    }

    // ------------------------------------------------------------------
    // Nodes

    fn alloc(&mut self, data: NodeData) -> usize {
        self.nodes.push(data);
        self.nodes.len() - 1
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(SyntaxError {
            message: message.into(),
            span,
        });
    }

    /// Consumes the current token as a leaf of the given kind.
    fn leaf(&mut self, symbol: Symbol) -> Built {
        let (token, leading) = self.consume();
        let id = self.alloc(NodeData::leaf(symbol, token.span));
        Built { id, leading }
    }

    /// Consumes the current fixed token as an anonymous leaf.
    fn token(&mut self) -> Built {
        let symbol = self.table.leaf_symbol(&self.current.kind);
        self.leaf(symbol)
    }

    /// Consumes the current token as whatever node it forms on its own.
    fn token_node(&mut self) -> Built {
        if matches!(self.current.kind, TokenKind::String { .. }) {
            return self.string_literal();
        }
        let symbol = self.table.leaf_symbol(&self.current.kind);
        let is_error = matches!(self.current.kind, TokenKind::Error(_));
        let built = self.leaf(symbol);
        self.nodes[built.id].has_error = is_error;
        built
    }

    /// Creates a zero-width node for input that should have been there.
    fn missing(&mut self, symbol: Symbol, message: String) -> Built {
        let (offset, point) = self.prev_end;
        let span = Span::empty_at(offset, point);
        let mut data = NodeData::leaf(symbol, span);
        data.is_missing = true;
        data.has_error = true;
        self.error(message, span);
        Built::bare(self.alloc(data))
    }

    fn finish(&mut self, builder: Builder) -> Built {
        let span = match (builder.children.first(), builder.children.last()) {
            (Some(&first), Some(&last)) => self.nodes[first].span.to(self.nodes[last].span),
            _ => Span::empty_at(self.prev_end.0, self.prev_end.1),
        };
        let id = self.alloc_node(builder.symbol, builder.children, builder.fields, span);
        Built {
            id,
            leading: builder.leading,
        }
    }

    fn alloc_node(
        &mut self,
        symbol: Symbol,
        children: Vec<usize>,
        fields: Vec<Option<FieldId>>,
        span: Span,
    ) -> usize {
        let id = self.nodes.len();
        let mut has_error = false;
        for &child in &children {
            let data = &mut self.nodes[child];
            data.parent = Some(id);
            has_error |= data.has_error;
        }
        let mut data = NodeData::leaf(symbol, span);
        data.children = children;
        data.fields = fields;
        data.has_error = has_error;
        self.alloc(data)
    }

    // ------------------------------------------------------------------
    // Recovery

    /// Wraps tokens in an `ERROR` node until `stop` matches.
    ///
    /// Returns `None` without consuming anything if `stop` already matches
    /// or the input is exhausted.
    fn skip_error(&mut self, stop: impl Fn(&TokenKind) -> bool) -> Option<Built> {
        if self.at_eof() || stop(&self.current.kind) {
            return None;
        }
        let message = match &self.current.kind {
            TokenKind::Error(message) => message.clone(),
            kind => format!("unexpected {}", kind.name()),
        };

        let error = self.table.kinds.error;
        let mut builder = Builder::new(error);
        while !self.at_eof() && !stop(&self.current.kind) {
            let node = self.token_node();
            builder.child(node);
        }

        // A lone unknown character is already an ERROR leaf.
        let lone = match builder.children.as_slice() {
            [only] if self.nodes[*only].symbol == error => Some(*only),
            _ => None,
        };
        let built = match lone {
            Some(id) => Built {
                id,
                leading: builder.leading,
            },
            None => self.finish(builder),
        };
        self.nodes[built.id].has_error = true;
        let span = self.nodes[built.id].span;
        self.error(message, span);
        Some(built)
    }

    /// Consumes an expected fixed token, recovering if it is absent.
    ///
    /// Unexpected tokens are skipped into an `ERROR` node up to the expected
    /// token or a synchronizing one; if the expected token still is not
    /// there, a missing node takes its place.
    fn expect(&mut self, builder: &mut Builder, expected: &TokenKind) {
        if !self.at(expected) && !self.current.kind.is_synchronizing() {
            let wanted = mem::discriminant(expected);
            if let Some(skipped) =
                self.skip_error(|kind| mem::discriminant(kind) == wanted || kind.is_synchronizing())
            {
                builder.child(skipped);
            }
        }

        let symbol = self.table.leaf_symbol(expected);
        let node = if self.at(expected) {
            self.leaf(symbol)
        } else {
            let message = format!(
                "expected {}, found {}",
                expected.name(),
                self.current.kind.name()
            );
            self.missing(symbol, message)
        };
        builder.child(node);
    }

    /// Consumes an object identifier, or inserts a missing one.
    fn identifier(&mut self) -> Built {
        let symbol = self.table.kinds.identifier;
        if self.current.kind.is_identifier() {
            self.leaf(symbol)
        } else {
            let message = format!("expected identifier, found {}", self.current.kind.name());
            self.missing(symbol, message)
        }
    }

    /// Consumes a type name, or inserts a missing one.
    fn type_name(&mut self) -> Built {
        let table = self.table;
        let kinds = &table.kinds;
        match self.current.kind {
            TokenKind::TypeIdentifier => self.leaf(kinds.type_identifier),
            TokenKind::PrimitiveType => self.leaf(kinds.primitive_type),
            _ => {
                let message = format!("expected type, found {}", self.current.kind.name());
                self.missing(kinds.type_identifier, message)
            }
        }
    }

    // ------------------------------------------------------------------
    // Declarations

    fn source_file(&mut self) -> usize {
        let mut builder = Builder::new(self.table.kinds.source_file);
        while !self.at_eof() {
            if self.at(&TokenKind::Class) {
                let class = self.class_item();
                builder.child(class);
            } else if let Some(skipped) =
                self.skip_error(|kind| matches!(kind, TokenKind::Class))
            {
                builder.child(skipped);
            }
        }

        // The root owns every comment no inner node claimed.
        let trailing = mem::take(&mut self.pending);
        let mut children = builder.leading;
        let mut fields = vec![None; children.len()];
        children.append(&mut builder.children);
        fields.append(&mut builder.fields);
        fields.extend(iter::repeat_n(None, trailing.len()));
        children.extend(trailing);

        let span = Span::new(
            0,
            self.source.len(),
            Point::default(),
            self.current.span.end_point,
        );
        self.alloc_node(builder.symbol, children, fields, span)
    }

    fn class_item(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.class_item);
        builder.child(self.token());

        let name = match self.current.kind {
            TokenKind::TypeIdentifier | TokenKind::PrimitiveType => {
                self.leaf(table.kinds.type_identifier)
            }
            _ => {
                let message = format!("expected class name, found {}", self.current.kind.name());
                self.missing(table.kinds.type_identifier, message)
            }
        };
        builder.field(table.fields.name, name);

        if self.at(&TokenKind::Inherits) {
            builder.child(self.token());
            let parent = self.type_name();
            builder.field(table.fields.inherits, parent);
        }

        let features = self.field_declaration_list();
        builder.field(table.fields.features, features);
        self.expect(&mut builder, &TokenKind::Semicolon);
        self.finish(builder)
    }

    fn field_declaration_list(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.field_declaration_list);
        self.expect(&mut builder, &TokenKind::LBrace);

        while !matches!(
            self.current.kind,
            TokenKind::RBrace | TokenKind::Class | TokenKind::Eof
        ) {
            if self.current.kind.is_identifier() {
                let feature = self.feature();
                builder.child(feature);
                self.expect(&mut builder, &TokenKind::Semicolon);
            } else if let Some(skipped) = self.skip_error(|kind| {
                kind.is_identifier() || matches!(kind, TokenKind::RBrace | TokenKind::Class)
            }) {
                builder.child(skipped);
            }
        }

        self.expect(&mut builder, &TokenKind::RBrace);
        self.finish(builder)
    }

    fn feature(&mut self) -> Built {
        if self.peek() == TokenKind::LParen {
            self.method_declaration()
        } else {
            self.attribute_declaration()
        }
    }

    fn method_declaration(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.method_declaration);
        let name = self.identifier();
        builder.field(table.fields.name, name);
        let parameters = self.parameters();
        builder.field(table.fields.parameters, parameters);
        self.expect(&mut builder, &TokenKind::Colon);
        let return_type = self.type_name();
        builder.field(table.fields.return_type, return_type);
        self.expect(&mut builder, &TokenKind::LBrace);
        let body = self.full_expression();
        builder.field(table.fields.body, body);
        self.expect(&mut builder, &TokenKind::RBrace);
        self.finish(builder)
    }

    fn attribute_declaration(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.attribute_declaration);
        let name = self.leaf(table.kinds.field_identifier);
        builder.field(table.fields.name, name);
        self.expect(&mut builder, &TokenKind::Colon);
        let ty = self.type_name();
        builder.field(table.fields.type_, ty);
        if self.at(&TokenKind::Assign) {
            builder.child(self.token());
            let init = self.full_expression();
            builder.field(table.fields.right, init);
        }
        self.finish(builder)
    }

    fn parameters(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.parameters);
        self.expect(&mut builder, &TokenKind::LParen);
        if self.current.kind.is_identifier() {
            loop {
                let parameter = self.parameter();
                builder.child(parameter);
                if !self.at(&TokenKind::Comma) {
                    break;
                }
                builder.child(self.token());
            }
        }
        self.expect(&mut builder, &TokenKind::RParen);
        self.finish(builder)
    }

    fn parameter(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.parameter);
        let name = self.identifier();
        builder.field(table.fields.name, name);
        self.expect(&mut builder, &TokenKind::Colon);
        let ty = self.type_name();
        builder.field(table.fields.type_, ty);
        self.finish(builder)
    }

    // ------------------------------------------------------------------
    // Expressions

    fn full_expression(&mut self) -> Built {
        self.expression(self.table.precedences.assign)
    }

    /// Parses an expression whose operators bind at least as tightly as `min`.
    fn expression(&mut self, min: i32) -> Built {
        if self.depth >= self.config.max_depth {
            return self.too_deep();
        }
        self.depth += 1;

        let table = self.table;
        let mut lhs = self.prefix();
        loop {
            lhs = match self.current.kind {
                TokenKind::Dot if table.precedences.call >= min => self.dispatch(lhs),
                TokenKind::At if table.precedences.superclass >= min => self.dispatch(lhs),
                _ => match table.operator(&self.current.kind) {
                    Some(op) if op.precedence >= min => self.binary(lhs, op),
                    _ => break,
                },
            };
        }

        self.depth -= 1;
        lhs
    }

    fn prefix(&mut self) -> Built {
        let table = self.table;
        let kinds = &table.kinds;
        let levels = &table.precedences;
        match self.current.kind {
            TokenKind::Identifier | TokenKind::TypeIdentifier => self.identifier_expression(),
            TokenKind::SelfValue => self.leaf(kinds.self_value),
            TokenKind::Integer => self.leaf(kinds.integer_literal),
            TokenKind::String { .. } => self.string_literal(),
            TokenKind::True | TokenKind::False => self.boolean_literal(),
            TokenKind::If => self.if_expression(),
            TokenKind::While => self.while_expression(),
            TokenKind::LBrace => self.block(),
            TokenKind::Let => self.let_expression(),
            TokenKind::Case => self.case_expression(),
            TokenKind::New => self.new_expression(),
            TokenKind::Isvoid => self.prefix_operator(kinds.isvoid_expression, levels.isvoid),
            TokenKind::Not => self.prefix_operator(kinds.not_expression, levels.negation),
            TokenKind::Tilde => self.prefix_operator(kinds.unary_expression, levels.comp),
            TokenKind::LParen => self.parenthesized_expression(),
            ref kind if kind.is_synchronizing() => {
                let message = format!("expected expression, found {}", kind.name());
                self.missing(kinds.identifier, message)
            }
            _ => match self.skip_error(|kind| kind.is_synchronizing() || kind.starts_expression())
            {
                Some(skipped) => skipped,
                None => {
                    let message =
                        format!("expected expression, found {}", self.current.kind.name());
                    self.missing(kinds.identifier, message)
                }
            },
        }
    }

    /// An identifier on its own, or the start of an assignment or a call
    /// on `self`.
    fn identifier_expression(&mut self) -> Built {
        let table = self.table;
        match self.peek() {
            TokenKind::Assign => {
                let mut builder = Builder::new(table.kinds.assignment_expression);
                let left = self.leaf(table.kinds.identifier);
                builder.field(table.fields.left, left);
                builder.child(self.token());
                let right = self.expression(table.precedences.assign);
                builder.field(table.fields.right, right);
                self.finish(builder)
            }
            TokenKind::LParen => {
                let mut builder = Builder::new(table.kinds.dispatch_expression);
                let method = self.leaf(table.kinds.identifier);
                builder.field(table.fields.method, method);
                let arguments = self.arguments();
                builder.field(table.fields.arguments, arguments);
                self.finish(builder)
            }
            _ => self.leaf(table.kinds.identifier),
        }
    }

    /// `value.method(args)` or `value@Type.method(args)`.
    fn dispatch(&mut self, receiver: Built) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.dispatch_expression);
        builder.field(table.fields.value, receiver);
        if self.at(&TokenKind::At) {
            builder.child(self.token());
            let ty = self.type_name();
            builder.field(table.fields.type_, ty);
        }
        self.expect(&mut builder, &TokenKind::Dot);
        let method = self.identifier();
        builder.field(table.fields.method, method);
        let arguments = self.arguments();
        builder.field(table.fields.arguments, arguments);
        self.finish(builder)
    }

    fn arguments(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.arguments);
        self.expect(&mut builder, &TokenKind::LParen);
        if self.current.kind.starts_expression() {
            loop {
                let argument = self.full_expression();
                builder.child(argument);
                if !self.at(&TokenKind::Comma) {
                    break;
                }
                builder.child(self.token());
            }
        }
        self.expect(&mut builder, &TokenKind::RParen);
        self.finish(builder)
    }

    fn binary(&mut self, lhs: Built, op: OperatorInfo) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.binary_expression);
        builder.field(table.fields.left, lhs);
        let operator = self.leaf(op.symbol);
        builder.field(table.fields.operator, operator);
        let next = match op.associativity {
            Associativity::Left => op.precedence + 1,
            Associativity::Right => op.precedence,
        };
        let rhs = self.expression(next);
        builder.field(table.fields.right, rhs);
        self.finish(builder)
    }

    fn prefix_operator(&mut self, symbol: Symbol, operand_level: i32) -> Built {
        let mut builder = Builder::new(symbol);
        builder.child(self.token());
        let operand = self.expression(operand_level);
        builder.child(operand);
        self.finish(builder)
    }

    fn boolean_literal(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.boolean_literal);
        builder.child(self.token());
        self.finish(builder)
    }

    fn string_literal(&mut self) -> Built {
        let table = self.table;
        let (token, leading) = self.consume();
        let (parts, terminated) = match token.kind {
            TokenKind::String { parts, terminated } => (parts, terminated),
            _ => (Vec::new(), false),
        };
        let quote = table.anonymous("\"");
        let span = token.span;

        let mut builder = Builder::new(table.kinds.string_literal);
        builder.leading = leading;

        let open_end = Point::new(span.start_point.row, span.start_point.column + 1);
        let open = Span::new(span.start, span.start + 1, span.start_point, open_end);
        builder.child(Built::bare(self.alloc(NodeData::leaf(quote, open))));

        for part in parts {
            let symbol = match part.kind {
                StringPartKind::Content => table.kinds.string_content,
                StringPartKind::Escape => table.kinds.escape_sequence,
            };
            builder.child(Built::bare(self.alloc(NodeData::leaf(symbol, part.span))));
        }

        if terminated {
            let close_start = Point::new(
                span.end_point.row,
                span.end_point.column.saturating_sub(1),
            );
            let close = Span::new(span.end - 1, span.end, close_start, span.end_point);
            builder.child(Built::bare(self.alloc(NodeData::leaf(quote, close))));
        } else {
            let missing = self.missing(quote, "unterminated string literal".to_string());
            builder.child(missing);
        }
        self.finish(builder)
    }

    fn if_expression(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.if_expression);
        builder.child(self.token());
        let condition = self.full_expression();
        builder.field(table.fields.condition, condition);
        self.expect(&mut builder, &TokenKind::Then);
        let consequence = self.full_expression();
        builder.field(table.fields.consequence, consequence);
        if self.at(&TokenKind::Else) {
            builder.child(self.token());
            let alternative = self.full_expression();
            builder.field(table.fields.alternative, alternative);
        }
        self.expect(&mut builder, &TokenKind::Fi);
        self.finish(builder)
    }

    fn while_expression(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.while_expression);
        builder.child(self.token());
        let condition = self.full_expression();
        builder.field(table.fields.condition, condition);
        self.expect(&mut builder, &TokenKind::Loop);
        let body = self.full_expression();
        builder.field(table.fields.body, body);
        self.expect(&mut builder, &TokenKind::Pool);
        self.finish(builder)
    }

    /// `{ e1; e2; }`: every expression is followed by `;`.
    fn block(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.block);
        builder.child(self.token());
        if self.at(&TokenKind::Semicolon) {
            builder.child(self.token());
        } else {
            loop {
                let expression = self.full_expression();
                builder.child(expression);
                self.expect(&mut builder, &TokenKind::Semicolon);
                if !self.current.kind.starts_expression() {
                    break;
                }
            }
        }
        self.expect(&mut builder, &TokenKind::RBrace);
        self.finish(builder)
    }

    fn let_expression(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.let_expression);
        builder.child(self.token());
        // The binding list may be empty: `let in e`.
        if !self.at(&TokenKind::In) {
            loop {
                let name = self.identifier();
                builder.field(table.fields.name, name);
                self.expect(&mut builder, &TokenKind::Colon);
                let ty = self.type_name();
                builder.field(table.fields.type_, ty);
                if self.at(&TokenKind::Assign) {
                    builder.child(self.token());
                    let init = self.full_expression();
                    builder.field(table.fields.right, init);
                }
                if !self.at(&TokenKind::Comma) {
                    break;
                }
                builder.child(self.token());
            }
        }
        self.expect(&mut builder, &TokenKind::In);
        let body = self.expression(table.precedences.assign);
        builder.field(table.fields.body, body);
        self.finish(builder)
    }

    fn case_expression(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.case_expression);
        builder.child(self.token());
        let value = self.full_expression();
        builder.field(table.fields.value, value);
        self.expect(&mut builder, &TokenKind::Of);

        if self.current.kind.is_identifier() {
            loop {
                let arm = self.case_arm();
                builder.field(table.fields.body, arm);
                if !self.at(&TokenKind::Semicolon) {
                    break;
                }
                builder.child(self.token());
                if !self.current.kind.is_identifier() {
                    break;
                }
            }
        } else if self.at(&TokenKind::Semicolon) {
            builder.child(self.token());
        }

        self.expect(&mut builder, &TokenKind::Esac);
        self.finish(builder)
    }

    fn case_arm(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.case_arm);

        let mut pattern = Builder::new(table.kinds.case_pattern);
        let name = self.identifier();
        pattern.field(table.fields.name, name);
        self.expect(&mut pattern, &TokenKind::Colon);
        let ty = self.type_name();
        pattern.field(table.fields.type_, ty);
        let pattern = self.finish(pattern);

        builder.field(table.fields.pattern, pattern);
        self.expect(&mut builder, &TokenKind::Arrow);
        let value = self.full_expression();
        builder.field(table.fields.value, value);
        self.finish(builder)
    }

    fn new_expression(&mut self) -> Built {
        let table = self.table;
        let mut builder = Builder::new(table.kinds.new_expression);
        builder.child(self.token());
        let ty = self.type_name();
        builder.field(table.fields.type_, ty);
        self.finish(builder)
    }

    fn parenthesized_expression(&mut self) -> Built {
        let mut builder = Builder::new(self.table.kinds.parenthesized_expression);
        builder.child(self.token());
        let inner = self.full_expression();
        builder.child(inner);
        self.expect(&mut builder, &TokenKind::RParen);
        self.finish(builder)
    }

    /// Swallows an over-deep expression, brackets balanced, into an `ERROR`.
    fn too_deep(&mut self) -> Built {
        tracing::debug!(depth = self.depth, "expression nesting limit reached");
        let mut builder = Builder::new(self.table.kinds.error);
        let mut open = 0usize;
        while !self.at_eof() {
            match self.current.kind {
                TokenKind::LParen | TokenKind::LBrace => open += 1,
                TokenKind::RParen | TokenKind::RBrace if open > 0 => open -= 1,
                ref kind if open == 0 && kind.is_synchronizing() => break,
                _ => {}
            }
            let node = self.token_node();
            builder.child(node);
        }
        let built = self.finish(builder);
        self.nodes[built.id].has_error = true;
        let span = self.nodes[built.id].span;
        self.error("expression nested too deeply", span);
        built
    }
}
