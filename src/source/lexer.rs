//! Go tokenizer.
//!
//! Produces just enough token structure for declaration scanning: identifiers,
//! literals, comments and single-character punctuation, each with its byte span
//! and line information. Multi-character operators come out as consecutive
//! punctuation tokens; the parser never needs to tell `<-` from `<` `-`.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    /// Interpreted string literal `"..."`
    String,
    /// Raw string literal `` `...` ``
    RawString,
    /// Rune literal `'x'`
    Char,
    LineComment,
    BlockComment,
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based line of the last character
    pub end_line: usize,
    /// 1-based column of the first character
    pub column: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    pub fn is_keyword(&self, src: &str, keyword: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == keyword
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::RawString)
    }

    /// Whether a newline after this token terminates the statement
    /// (Go's automatic semicolon insertion rule).
    pub fn ends_line(&self, src: &str) -> bool {
        match self.kind {
            TokenKind::Ident => {
                let text = self.text(src);
                !is_go_keyword(text) || matches!(text, "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Number | TokenKind::String | TokenKind::RawString | TokenKind::Char => true,
            TokenKind::Punct(c) => matches!(c, ')' | ']' | '}'),
            TokenKind::LineComment | TokenKind::BlockComment => false,
        }
    }
}

/// Reserved words of the Go language.
pub fn is_go_keyword(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    /// Consume a quoted literal whose opening quote was already consumed.
    fn eat_quoted(&mut self, quote: char) -> bool {
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\n' => return false,
                c if c == quote => return true,
                _ => {}
            }
        }
        false
    }

    fn eat_block_comment(&mut self) -> bool {
        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                return true;
            }
        }
        false
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Split Go source text into tokens, comments included.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut cursor = Cursor::new(src);
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }

        let (start, line, column) = (cursor.pos, cursor.line, cursor.column);
        let kind = match c {
            '/' if cursor.peek_second() == Some('/') => {
                cursor.eat_while(|c| c != '\n');
                TokenKind::LineComment
            }
            '/' if cursor.peek_second() == Some('*') => {
                cursor.bump();
                cursor.bump();
                if !cursor.eat_block_comment() {
                    return Err(ParseError::new(line, column, "unterminated block comment"));
                }
                TokenKind::BlockComment
            }
            '"' => {
                cursor.bump();
                if !cursor.eat_quoted('"') {
                    return Err(ParseError::new(line, column, "unterminated string literal"));
                }
                TokenKind::String
            }
            '\'' => {
                cursor.bump();
                if !cursor.eat_quoted('\'') {
                    return Err(ParseError::new(line, column, "unterminated rune literal"));
                }
                TokenKind::Char
            }
            '`' => {
                cursor.bump();
                cursor.eat_while(|c| c != '`');
                if cursor.bump().is_none() {
                    return Err(ParseError::new(line, column, "unterminated raw string literal"));
                }
                TokenKind::RawString
            }
            c if is_ident_start(c) => {
                cursor.eat_while(is_ident_continue);
                TokenKind::Ident
            }
            c if c.is_ascii_digit() => {
                cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
                TokenKind::Number
            }
            c => {
                cursor.bump();
                TokenKind::Punct(c)
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: cursor.pos,
            line,
            end_line: cursor.line,
            column,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_field_line() {
        let src = "Name string `json:\"name\"`";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text(src), "Name");
        assert_eq!(tokens[2].kind, TokenKind::RawString);
        assert_eq!(tokens[2].text(src), "`json:\"name\"`");
    }

    #[test]
    fn test_comments_keep_lines() {
        let src = "// one\n/* two\n three */\ntype";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[1].kind, TokenKind::BlockComment);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].end_line, 3);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_punctuation_and_numbers() {
        assert_eq!(
            kinds("[3]*x"),
            vec![
                TokenKind::Punct('['),
                TokenKind::Number,
                TokenKind::Punct(']'),
                TokenKind::Punct('*'),
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        let src = "Größe int";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[0].text(src), "Größe");
        assert_eq!(tokens[1].column, 7);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("x := \"oops\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 6);
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        assert!(tokenize("/* never closed").is_err());
    }

    #[test]
    fn test_semicolon_insertion_rule() {
        let src = "x ) , return struct";
        let tokens = tokenize(src).unwrap();
        assert!(tokens[0].ends_line(src));
        assert!(tokens[1].ends_line(src));
        assert!(!tokens[2].ends_line(src));
        assert!(tokens[3].ends_line(src));
        assert!(!tokens[4].ends_line(src));
    }
}
