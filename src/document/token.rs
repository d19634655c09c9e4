//! Tokenizer boundary and the default lexical tokenizer.

/// Lexical classification of a token. Drives theme colors; whitespace and newlines only affect
/// layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Reserved word of the snapshot's language.
    Keyword,
    /// Any other word.
    Identifier,
    /// Numeric literal.
    Number,
    /// String or character literal.
    String,
    /// Line or block comment (one line at most).
    Comment,
    /// Operator or delimiter.
    Punctuation,
    /// Run of spaces or tabs.
    Whitespace,
    /// A single line break.
    Newline,
}

impl TokenKind {
    /// Tokens of this kind produce no ink.
    pub fn is_blank(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }
}

/// Immutable lexical unit of a snapshot's text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// Source text. Never contains a line break unless `kind` is [`TokenKind::Newline`].
    pub text: String,
    /// Classification.
    pub kind: TokenKind,
}

impl Token {
    /// Build a token.
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Turns raw snapshot text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` written in `language`. Concatenating the token texts must reproduce `text`.
    fn tokenize(&self, text: &str, language: &str) -> Vec<Token>;
}

/// Default hand-written lexer with per-language keyword tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexTokenizer;

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default", "delete",
    "do", "else", "export", "extends", "false", "finally", "for", "from", "function", "if",
    "import", "in", "instanceof", "interface", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "void",
    "while", "yield",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

#[derive(Clone, Copy)]
struct LangRules {
    keywords: &'static [&'static str],
    hash_comments: bool,
    slash_comments: bool,
    rust_chars: bool,
}

fn rules_for(language: &str) -> LangRules {
    match language.trim().to_ascii_lowercase().as_str() {
        "rust" | "rs" => LangRules {
            keywords: RUST_KEYWORDS,
            hash_comments: false,
            slash_comments: true,
            rust_chars: true,
        },
        "javascript" | "js" | "typescript" | "ts" | "jsx" | "tsx" => LangRules {
            keywords: JS_KEYWORDS,
            hash_comments: false,
            slash_comments: true,
            rust_chars: false,
        },
        "python" | "py" => LangRules {
            keywords: PYTHON_KEYWORDS,
            hash_comments: true,
            slash_comments: false,
            rust_chars: false,
        },
        _ => LangRules {
            keywords: &[],
            hash_comments: false,
            slash_comments: true,
            rust_chars: false,
        },
    }
}

impl Tokenizer for LexTokenizer {
    fn tokenize(&self, text: &str, language: &str) -> Vec<Token> {
        let rules = rules_for(language);
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::new();
        let mut i = 0;
        let mut in_block_comment = false;

        let take = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
        let line_end = |from: usize| {
            chars[from..]
                .iter()
                .position(|&c| c == '\n')
                .map_or(chars.len(), |p| from + p)
        };

        while i < chars.len() {
            let c = chars[i];

            if c == '\n' {
                out.push(Token::new("\n", TokenKind::Newline));
                i += 1;
                continue;
            }

            if in_block_comment {
                let end = line_end(i);
                let close = (i..end.saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
                    .map(|j| j + 2);
                let stop = close.unwrap_or(end);
                in_block_comment = close.is_none();
                out.push(Token::new(take(i, stop), TokenKind::Comment));
                i = stop;
                continue;
            }

            if c == ' ' || c == '\t' || c == '\r' {
                let start = i;
                while i < chars.len() && matches!(chars[i], ' ' | '\t' | '\r') {
                    i += 1;
                }
                out.push(Token::new(take(start, i), TokenKind::Whitespace));
                continue;
            }

            let next = chars.get(i + 1).copied();
            if (rules.slash_comments && c == '/' && next == Some('/'))
                || (rules.hash_comments && c == '#')
            {
                let end = line_end(i);
                out.push(Token::new(take(i, end), TokenKind::Comment));
                i = end;
                continue;
            }
            if rules.slash_comments && c == '/' && next == Some('*') {
                let end = line_end(i);
                let close = (i + 2..end.saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
                    .map(|j| j + 2);
                let stop = close.unwrap_or(end);
                in_block_comment = close.is_none();
                out.push(Token::new(take(i, stop), TokenKind::Comment));
                i = stop;
                continue;
            }

            let is_quote = match c {
                '"' | '`' => true,
                '\'' if rules.rust_chars => {
                    next == Some('\\') || chars.get(i + 2).copied() == Some('\'')
                }
                '\'' => true,
                _ => false,
            };
            if is_quote {
                let end = line_end(i);
                let mut j = i + 1;
                while j < end {
                    if chars[j] == '\\' {
                        j += 2;
                        continue;
                    }
                    if chars[j] == c {
                        j += 1;
                        break;
                    }
                    j += 1;
                }
                let stop = j.min(end);
                out.push(Token::new(take(i, stop), TokenKind::String));
                i = stop;
                continue;
            }

            if c.is_ascii_digit() {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || matches!(chars[i], '_' | '.'))
                {
                    i += 1;
                }
                out.push(Token::new(take(start, i), TokenKind::Number));
                continue;
            }

            if c.is_alphabetic() || c == '_' || c == '$' {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let word = take(start, i);
                let kind = if rules.keywords.contains(&word.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                out.push(Token::new(word, kind));
                continue;
            }

            out.push(Token::new(c.to_string(), TokenKind::Punctuation));
            i += 1;
        }

        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/token.rs"]
mod tests;
