use super::lexer::{tokenize, Token, TokenKind};
use super::model::{Declaration, Field, ImportReference, SourceFile};
use super::tag::StructTag;
use crate::error::ParseError;

/// Scan Go source text into a [`SourceFile`].
///
/// Only the package clause, import declarations and top-level struct type
/// declarations are interpreted; everything else is skipped while keeping
/// track of bracket nesting so that types declared inside function bodies are
/// never picked up.
pub fn parse_source(src: &str) -> Result<SourceFile, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens: &tokens,
        pos: 0,
    };
    parser.parse_file()
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Next non-comment token without consuming anything.
    fn peek_significant(&self) -> Option<Token> {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.is_comment())
            .copied()
    }

    /// Consume comments and return the next token.
    fn next_significant(&mut self) -> Option<Token> {
        while let Some(tok) = self.peek() {
            self.pos += 1;
            if !tok.is_comment() {
                return Some(tok);
            }
        }
        None
    }

    fn last_consumed_line(&self) -> usize {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| !t.is_comment())
            .map_or(0, |t| t.end_line)
    }

    fn last_token(&self) -> Option<Token> {
        self.tokens.last().copied()
    }

    fn eof_error(&self, what: &str) -> ParseError {
        let (line, column) = self
            .last_token()
            .map(|t| (t.end_line, t.column))
            .unwrap_or((1, 1));
        ParseError::new(line, column, format!("unexpected end of file, expected {what}"))
    }

    fn unexpected(&self, tok: Token, what: &str) -> ParseError {
        ParseError::new(
            tok.line,
            tok.column,
            format!("expected {what}, found `{}`", tok.text(self.src)),
        )
    }

    fn expect_ident(&mut self, what: &str) -> Result<Token, ParseError> {
        match self.next_significant() {
            Some(tok) if tok.is_ident() => Ok(tok),
            Some(tok) => Err(self.unexpected(tok, what)),
            None => Err(self.eof_error(what)),
        }
    }

    /// Collect the comment group ending right before `tok`, consuming it.
    ///
    /// Comments separated from the token by a blank line do not count.
    fn take_doc(group: &mut Vec<Token>, tok: Token) -> Vec<Token> {
        let attached = group
            .last()
            .is_some_and(|last| last.end_line + 1 == tok.line);
        let doc = if attached { group.clone() } else { Vec::new() };
        group.clear();
        doc
    }

    fn doc_lines(&self, comments: &[Token]) -> Vec<String> {
        comments
            .iter()
            .flat_map(|c| c.text(self.src).lines())
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }

    /// Add a comment to the pending doc group.
    ///
    /// A comment trailing code on the same line starts no group.
    fn push_comment(group: &mut Vec<Token>, tok: Token, last_code_line: usize) {
        if tok.line == last_code_line {
            group.clear();
            return;
        }
        if group.last().is_some_and(|last| tok.line > last.end_line + 1) {
            group.clear();
        }
        group.push(tok);
    }

    fn parse_file(&mut self) -> Result<SourceFile, ParseError> {
        let package = match self.next_significant() {
            Some(tok) if tok.is_keyword(self.src, "package") => {
                self.expect_ident("package name")?.text(self.src).to_string()
            }
            Some(tok) => return Err(self.unexpected(tok, "package clause")),
            None => return Err(self.eof_error("package clause")),
        };

        let mut imports = Vec::new();
        let mut declarations = Vec::new();
        let mut depth_stack: Vec<Token> = Vec::new();
        let mut comments: Vec<Token> = Vec::new();
        let mut last_code_line = self.last_consumed_line();

        while let Some(tok) = self.peek() {
            if tok.is_comment() {
                Self::push_comment(&mut comments, tok, last_code_line);
                self.pos += 1;
                continue;
            }
            let doc = Self::take_doc(&mut comments, tok);
            last_code_line = tok.end_line;

            if depth_stack.is_empty() && tok.is_keyword(self.src, "import") {
                self.pos += 1;
                self.parse_imports(&mut imports)?;
                last_code_line = self.last_consumed_line();
                continue;
            }
            if depth_stack.is_empty() && tok.is_keyword(self.src, "type") {
                self.pos += 1;
                let doc = self.doc_lines(&doc);
                self.parse_type_decl(doc, &mut declarations)?;
                last_code_line = self.last_consumed_line();
                continue;
            }

            match tok.kind {
                TokenKind::Punct('(' | '[' | '{') => depth_stack.push(tok),
                TokenKind::Punct(close @ (')' | ']' | '}')) => match depth_stack.pop() {
                    Some(open) if matches_bracket(open, close) => {}
                    _ => return Err(self.unexpected(tok, "matching bracket")),
                },
                _ => {}
            }
            self.pos += 1;
        }

        if let Some(open) = depth_stack.last() {
            return Err(ParseError::new(
                open.line,
                open.column,
                format!("unclosed `{}`", open.text(self.src)),
            ));
        }

        Ok(SourceFile {
            package,
            imports,
            declarations,
        })
    }

    fn parse_imports(&mut self, imports: &mut Vec<ImportReference>) -> Result<(), ParseError> {
        match self.peek_significant() {
            Some(tok) if tok.is_punct('(') => {
                self.next_significant();
                loop {
                    match self.peek_significant() {
                        Some(tok) if tok.is_punct(')') => {
                            self.next_significant();
                            return Ok(());
                        }
                        Some(tok) if tok.is_punct(';') => {
                            self.next_significant();
                        }
                        Some(_) => imports.push(self.parse_import_spec()?),
                        None => return Err(self.eof_error("`)` closing import block")),
                    }
                }
            }
            Some(_) => {
                imports.push(self.parse_import_spec()?);
                Ok(())
            }
            None => Err(self.eof_error("import path")),
        }
    }

    fn parse_import_spec(&mut self) -> Result<ImportReference, ParseError> {
        let first = self
            .next_significant()
            .ok_or_else(|| self.eof_error("import path"))?;
        let (alias, path_tok) = if first.is_string() {
            (None, first)
        } else if first.is_ident() || first.is_punct('.') {
            let path = self
                .next_significant()
                .ok_or_else(|| self.eof_error("import path"))?;
            (Some(first.text(self.src).to_string()), path)
        } else {
            return Err(self.unexpected(first, "import path"));
        };
        if !path_tok.is_string() {
            return Err(self.unexpected(path_tok, "import path"));
        }
        let path = unquote(path_tok.text(self.src));
        Ok(ImportReference { alias, path })
    }

    fn parse_type_decl(
        &mut self,
        doc: Vec<String>,
        declarations: &mut Vec<Declaration>,
    ) -> Result<(), ParseError> {
        let Some(next) = self.peek_significant() else {
            return Err(self.eof_error("type name"));
        };
        if !next.is_punct('(') {
            if let Some(decl) = self.parse_type_spec(doc)? {
                declarations.push(decl);
            }
            return Ok(());
        }

        self.next_significant();
        let mut comments: Vec<Token> = Vec::new();
        let mut last_code_line = next.end_line;
        while let Some(tok) = self.peek() {
            if tok.is_comment() {
                Self::push_comment(&mut comments, tok, last_code_line);
                self.pos += 1;
                continue;
            }
            last_code_line = tok.end_line;
            if tok.is_punct(')') {
                self.pos += 1;
                return Ok(());
            }
            if tok.is_punct(';') {
                comments.clear();
                self.pos += 1;
                continue;
            }
            let spec_doc = Self::take_doc(&mut comments, tok);
            let spec_doc = if spec_doc.is_empty() {
                doc.clone()
            } else {
                self.doc_lines(&spec_doc)
            };
            if let Some(decl) = self.parse_type_spec(spec_doc)? {
                declarations.push(decl);
            }
            last_code_line = self.last_consumed_line();
        }
        Err(self.eof_error("`)` closing type group"))
    }

    /// Parse one `Name [TypeParams] Type` spec, returning a declaration when the
    /// type is a struct. Always consumes the whole spec.
    fn parse_type_spec(&mut self, doc: Vec<String>) -> Result<Option<Declaration>, ParseError> {
        let name = self.expect_ident("type name")?;
        let mut type_params = String::new();

        if let Some(open) = self.peek_significant().filter(|t| t.is_punct('[')) {
            let start = self.position_of(open);
            let close = self.matching_close(start)?;
            let inner: Vec<Token> = self.tokens[start + 1..close]
                .iter()
                .filter(|t| !t.is_comment())
                .copied()
                .collect();
            if looks_like_type_params(&inner) {
                type_params = self.render_tokens(&inner);
                self.pos = close + 1;
            }
        }

        match self.peek_significant() {
            Some(tok) if tok.is_keyword(self.src, "struct") => {
                self.next_significant();
                let open = self
                    .next_significant()
                    .ok_or_else(|| self.eof_error("`{` after struct"))?;
                if !open.is_punct('{') {
                    return Err(self.unexpected(open, "`{` after struct"));
                }
                let fields = self.parse_struct_body()?;
                Ok(Some(Declaration {
                    name: name.text(self.src).to_string(),
                    type_params,
                    fields,
                    doc,
                    line: name.line,
                }))
            }
            _ => {
                self.skip_spec()?;
                Ok(None)
            }
        }
    }

    fn position_of(&self, tok: Token) -> usize {
        self.tokens[self.pos..]
            .iter()
            .position(|t| *t == tok)
            .map(|offset| self.pos + offset)
            .unwrap_or(self.pos)
    }

    /// Index of the bracket closing the one at `open_index`.
    fn matching_close(&self, open_index: usize) -> Result<usize, ParseError> {
        let mut stack: Vec<Token> = Vec::new();
        for (index, tok) in self.tokens.iter().enumerate().skip(open_index) {
            match tok.kind {
                TokenKind::Punct('(' | '[' | '{') => stack.push(*tok),
                TokenKind::Punct(close @ (')' | ']' | '}')) => match stack.pop() {
                    Some(open) if matches_bracket(open, close) => {
                        if stack.is_empty() {
                            return Ok(index);
                        }
                    }
                    _ => return Err(self.unexpected(*tok, "matching bracket")),
                },
                _ => {}
            }
        }
        let open = self.tokens[open_index];
        Err(ParseError::new(
            open.line,
            open.column,
            format!("unclosed `{}`", open.text(self.src)),
        ))
    }

    /// Skip the remainder of a non-struct type spec.
    fn skip_spec(&mut self) -> Result<(), ParseError> {
        let mut stack: Vec<Token> = Vec::new();
        let mut prev: Option<Token> = None;
        while let Some(tok) = self.peek() {
            if tok.is_comment() {
                self.pos += 1;
                continue;
            }
            if stack.is_empty() {
                if tok.is_punct(';') {
                    self.pos += 1;
                    return Ok(());
                }
                if tok.is_punct(')') {
                    // closes the enclosing type group
                    return Ok(());
                }
                if let Some(prev) = prev {
                    if tok.line > prev.end_line && prev.ends_line(self.src) {
                        return Ok(());
                    }
                }
            }
            match tok.kind {
                TokenKind::Punct('(' | '[' | '{') => stack.push(tok),
                TokenKind::Punct(close @ (')' | ']' | '}')) => match stack.pop() {
                    Some(open) if matches_bracket(open, close) => {}
                    _ => return Err(self.unexpected(tok, "matching bracket")),
                },
                _ => {}
            }
            prev = Some(tok);
            self.pos += 1;
        }
        if let Some(open) = stack.last() {
            return Err(ParseError::new(
                open.line,
                open.column,
                format!("unclosed `{}`", open.text(self.src)),
            ));
        }
        Ok(())
    }

    /// Parse struct fields up to and including the closing `}`.
    fn parse_struct_body(&mut self) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();
        loop {
            match self.peek_significant() {
                None => return Err(self.eof_error("`}` closing struct")),
                Some(tok) if tok.is_punct('}') => {
                    self.next_significant();
                    return Ok(fields);
                }
                Some(tok) if tok.is_punct(';') => {
                    self.next_significant();
                }
                Some(_) => {
                    let line = self.collect_field_tokens()?;
                    self.interpret_field(&line, &mut fields)?;
                }
            }
        }
    }

    /// Gather the significant tokens of one field declaration.
    fn collect_field_tokens(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut line: Vec<Token> = Vec::new();
        let mut stack: Vec<Token> = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.is_comment() {
                self.pos += 1;
                continue;
            }
            if stack.is_empty() {
                if tok.is_punct(';') {
                    self.pos += 1;
                    break;
                }
                if tok.is_punct('}') {
                    break;
                }
                if let Some(prev) = line.last() {
                    if tok.line > prev.end_line && prev.ends_line(self.src) {
                        break;
                    }
                }
            }
            match tok.kind {
                TokenKind::Punct('(' | '[' | '{') => stack.push(tok),
                TokenKind::Punct(close @ (')' | ']' | '}')) => match stack.pop() {
                    Some(open) if matches_bracket(open, close) => {}
                    _ => return Err(self.unexpected(tok, "matching bracket")),
                },
                _ => {}
            }
            line.push(tok);
            self.pos += 1;
        }
        if line.is_empty() {
            return Err(self.eof_error("field declaration"));
        }
        Ok(line)
    }

    fn interpret_field(&self, line: &[Token], fields: &mut Vec<Field>) -> Result<(), ParseError> {
        let (body, tag) = match line.split_last() {
            Some((last, rest)) if last.is_string() && !rest.is_empty() => {
                (rest, StructTag::parse(&unquote(last.text(self.src))))
            }
            _ => (line, StructTag::default()),
        };

        if let Some(embedded_name) = self.embedded_name(body) {
            fields.push(Field {
                name: embedded_name,
                ty: self.render_tokens(body),
                tag,
                embedded: true,
            });
            return Ok(());
        }

        let mut names = Vec::new();
        let mut index = 0;
        loop {
            let tok = body[index];
            if !tok.is_ident() {
                return Err(self.unexpected(tok, "field name"));
            }
            names.push(tok.text(self.src).to_string());
            index += 1;
            match body.get(index) {
                Some(comma) if comma.is_punct(',') => index += 1,
                _ => break,
            }
            if index >= body.len() {
                return Err(self.eof_error("field name"));
            }
        }

        let ty_tokens = &body[index..];
        if ty_tokens.is_empty() {
            let last = body[body.len() - 1];
            return Err(ParseError::new(
                last.line,
                last.column,
                format!("missing type for field `{}`", last.text(self.src)),
            ));
        }
        let ty = self.render_tokens(ty_tokens);
        for name in names {
            fields.push(Field {
                name,
                ty: ty.clone(),
                tag: tag.clone(),
                embedded: false,
            });
        }
        Ok(())
    }

    /// Field name of an embedded field (`T`, `*T`, `pkg.T`, `*pkg.T`, `T[A]`),
    /// or `None` when the tokens name an explicit field.
    fn embedded_name(&self, body: &[Token]) -> Option<String> {
        let mut index = 0;
        if body.first()?.is_punct('*') {
            index += 1;
        }
        let mut name = body.get(index).filter(|t| t.is_ident())?;
        index += 1;
        if body.get(index).is_some_and(|t| t.is_punct('.')) {
            name = body.get(index + 1).filter(|t| t.is_ident())?;
            index += 2;
        }
        if body.get(index).is_some_and(|t| t.is_punct('[')) && body.last()?.is_punct(']') {
            // generic instantiation must run to the end of the declaration
            let mut depth = 0usize;
            for (offset, tok) in body[index..].iter().enumerate() {
                match tok.kind {
                    TokenKind::Punct('[') => depth += 1,
                    TokenKind::Punct(']') => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 && index + offset + 1 != body.len() {
                            return None;
                        }
                    }
                    _ => {}
                }
            }
            index = body.len();
        }
        (index == body.len()).then(|| name.text(self.src).to_string())
    }

    /// Reassemble tokens into single-line source text.
    ///
    /// Original spacing is kept where tokens share a line; a line break becomes
    /// `; ` where Go would insert a semicolon and a plain space otherwise.
    fn render_tokens(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut prev: Option<Token> = None;
        for tok in tokens {
            if let Some(prev) = prev {
                let tight = matches!(prev.kind, TokenKind::Punct('(' | '['))
                    || matches!(tok.kind, TokenKind::Punct(')' | ']'));
                if tok.line > prev.end_line {
                    if prev.ends_line(self.src) && !tok.is_punct('}') && !tight {
                        out.push_str("; ");
                    } else if !tight {
                        out.push(' ');
                    }
                } else if tok.start > prev.end {
                    out.push(' ');
                }
            }
            out.push_str(tok.text(self.src));
            prev = Some(*tok);
        }
        out
    }
}

fn matches_bracket(open: Token, close: char) -> bool {
    matches!(
        (open.kind, close),
        (TokenKind::Punct('('), ')') | (TokenKind::Punct('['), ']') | (TokenKind::Punct('{'), '}')
    )
}

/// Distinguish `type Pair[K comparable, V any] struct` from an array type
/// such as `type Grid [3]struct{...}`.
fn looks_like_type_params(inner: &[Token]) -> bool {
    match inner {
        [first, second, ..] if first.is_ident() => matches!(
            second.kind,
            TokenKind::Ident | TokenKind::Punct(',' | '~' | '[')
        ),
        _ => false,
    }
}

/// Strip the quotes of a string literal and resolve simple escapes.
fn unquote(literal: &str) -> String {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
