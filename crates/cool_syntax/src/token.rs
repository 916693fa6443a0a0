//! Token types for Cool.
//!
//! Tokens are the output of the lexer and input to the parser.

use cool_foundation::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The type of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

/// What a piece of a string literal is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringPartKind {
    /// A run of literal characters.
    Content,
    /// One of `\b`, `\t`, `\n`, `\f`, `\"`.
    Escape,
}

/// A piece of a string literal between its quotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringPart {
    /// Content run or escape sequence.
    pub kind: StringPartKind,
    /// Location of the piece.
    pub span: Span,
}

/// Token types for Cool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    /// `class`
    Class,
    /// `inherits`
    Inherits,
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `fi`
    Fi,
    /// `while`
    While,
    /// `loop`
    Loop,
    /// `pool`
    Pool,
    /// `let`
    Let,
    /// `in`
    In,
    /// `case`
    Case,
    /// `of`
    Of,
    /// `esac`
    Esac,
    /// `new`
    New,
    /// `isvoid`
    Isvoid,
    /// `not`
    Not,
    /// `true`
    True,
    /// `false`
    False,
    /// `self`
    SelfValue,

    // Words and literals
    /// Word such as `main` or `_tmp`
    Identifier,
    /// Word starting with an uppercase letter, such as `Main`
    TypeIdentifier,
    /// One of `Bool`, `Int`, `IO`, `Object`, `String`, `SELF_TYPE`
    PrimitiveType,
    /// Integer literal like `42`
    Integer,
    /// String literal like `"hello\n"`
    String {
        /// Content runs and escape sequences, in order.
        parts: Vec<StringPart>,
        /// False if the literal hit a newline or end of input first.
        terminated: bool,
    },

    // Punctuation
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `@`
    At,
    /// `<-`
    Assign,
    /// `=>`
    Arrow,
    /// `~`
    Tilde,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,

    // Trivia
    /// `-- comment` up to the end of the line
    InlineComment,
    /// `(* comment *)`
    BlockComment {
        /// False if the comment runs to the end of input.
        terminated: bool,
    },

    // Meta
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns the keyword token for a word, if it is one.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "class" => Self::Class,
            "inherits" => Self::Inherits,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "fi" => Self::Fi,
            "while" => Self::While,
            "loop" => Self::Loop,
            "pool" => Self::Pool,
            "let" => Self::Let,
            "in" => Self::In,
            "case" => Self::Case,
            "of" => Self::Of,
            "esac" => Self::Esac,
            "new" => Self::New,
            "isvoid" => Self::Isvoid,
            "not" => Self::Not,
            "true" => Self::True,
            "false" => Self::False,
            "self" => Self::SelfValue,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the fixed spelling of this token, if it has one.
    ///
    /// `self` is excluded: it forms a named node rather than an anonymous one.
    #[must_use]
    pub const fn literal(&self) -> Option<&'static str> {
        let text = match self {
            Self::Class => "class",
            Self::Inherits => "inherits",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::Fi => "fi",
            Self::While => "while",
            Self::Loop => "loop",
            Self::Pool => "pool",
            Self::Let => "let",
            Self::In => "in",
            Self::Case => "case",
            Self::Of => "of",
            Self::Esac => "esac",
            Self::New => "new",
            Self::Isvoid => "isvoid",
            Self::Not => "not",
            Self::True => "true",
            Self::False => "false",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::At => "@",
            Self::Assign => "<-",
            Self::Arrow => "=>",
            Self::Tilde => "~",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            _ => return None,
        };
        Some(text)
    }

    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::InlineComment | Self::BlockComment { .. })
    }

    /// Returns true if this token is a word usable as an object identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier | Self::TypeIdentifier)
    }

    /// Returns true if this token can begin an expression.
    #[must_use]
    pub const fn starts_expression(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::TypeIdentifier
                | Self::SelfValue
                | Self::Integer
                | Self::String { .. }
                | Self::True
                | Self::False
                | Self::If
                | Self::While
                | Self::LBrace
                | Self::Let
                | Self::Case
                | Self::New
                | Self::Isvoid
                | Self::Not
                | Self::Tilde
                | Self::LParen
        )
    }

    /// Returns true if this token closes or separates an enclosing construct.
    ///
    /// Error recovery stops skipping input at these tokens.
    #[must_use]
    pub const fn is_synchronizing(&self) -> bool {
        matches!(
            self,
            Self::Semicolon
                | Self::RBrace
                | Self::RParen
                | Self::Comma
                | Self::Class
                | Self::Then
                | Self::Else
                | Self::Fi
                | Self::Loop
                | Self::Pool
                | Self::In
                | Self::Of
                | Self::Esac
                | Self::Arrow
                | Self::Eof
        )
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelfValue => "'self'",
            Self::Identifier => "identifier",
            Self::TypeIdentifier => "type identifier",
            Self::PrimitiveType => "primitive type",
            Self::Integer => "integer",
            Self::String { .. } => "string",
            Self::InlineComment | Self::BlockComment { .. } => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
            other => match other.quoted_literal() {
                Some(name) => name,
                None => "token",
            },
        }
    }

    const fn quoted_literal(&self) -> Option<&'static str> {
        let text = match self {
            Self::Class => "'class'",
            Self::Inherits => "'inherits'",
            Self::If => "'if'",
            Self::Then => "'then'",
            Self::Else => "'else'",
            Self::Fi => "'fi'",
            Self::While => "'while'",
            Self::Loop => "'loop'",
            Self::Pool => "'pool'",
            Self::Let => "'let'",
            Self::In => "'in'",
            Self::Case => "'case'",
            Self::Of => "'of'",
            Self::Esac => "'esac'",
            Self::New => "'new'",
            Self::Isvoid => "'isvoid'",
            Self::Not => "'not'",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::At => "'@'",
            Self::Assign => "'<-'",
            Self::Arrow => "'=>'",
            Self::Tilde => "'~'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Lt => "'<'",
            Self::Le => "'<='",
            Self::Eq => "'='",
            _ => return None,
        };
        Some(text)
    }
}
