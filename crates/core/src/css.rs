//! Minimal CSS block parser and printer.
//!
//! The parser only recovers the structure the rewriter needs: rules,
//! at-rules, declarations and comments, each with its start position in
//! the input. Declaration values are kept as raw text so that rewriting
//! can preserve every byte it does not deliberately replace. The printer
//! records, for each emitted node, the pair of output position and input
//! position; the pipeline turns those pairs into the output source map.

use thiserror::Error;

#[derive(Error, Debug)]
#[error("CSS syntax error at {}:{}: {message}", .line + 1, .column + 1)]
pub struct CssError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// 0-based line and column, matching the source-map convention. Columns
/// count UTF-16 code units, as source-map consumers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule {
        selector: String,
        body: Vec<Node>,
        pos: Pos,
    },
    AtRule {
        name: String,
        params: String,
        body: Option<Vec<Node>>,
        pos: Pos,
    },
    Declaration(Declaration),
    Comment {
        text: String,
        pos: Pos,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

pub fn parse(src: &str) -> Result<Stylesheet, CssError> {
    let mut parser = Parser::new(src);
    let nodes = parser.parse_nodes(true)?;
    Ok(Stylesheet { nodes })
}

struct Parser {
    chars: Vec<char>,
    idx: usize,
    line: u32,
    column: u32,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            idx: 0,
            line: 0,
            column: 0,
        }
    }

    fn pos(&self) -> Pos {
        Pos { line: self.line, column: self.column }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.idx + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16() as u32;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> CssError {
        CssError { line: self.line, column: self.column, message: message.into() }
    }

    fn error_at(&self, pos: Pos, message: impl Into<String>) -> CssError {
        CssError { line: pos.line, column: pos.column, message: message.into() }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && self.peek2() == Some('*')
    }

    /// Consume `/* ... */`, returning the inner text.
    fn parse_comment_text(&mut self) -> Result<String, CssError> {
        let start = self.pos();
        self.bump();
        self.bump();
        let mut text = String::new();
        loop {
            match self.peek() {
                Some('*') if self.peek2() == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(text);
                }
                Some(_) => text.push(self.bump().unwrap()),
                None => return Err(self.error_at(start, "unclosed comment")),
            }
        }
    }

    /// Consume a quoted string into `buf`, including both quote characters.
    fn take_string(&mut self, buf: &mut String) -> Result<(), CssError> {
        let start = self.pos();
        let quote = self.bump().unwrap();
        buf.push(quote);
        loop {
            match self.bump() {
                Some(c) => {
                    buf.push(c);
                    if c == quote {
                        return Ok(());
                    }
                }
                None => return Err(self.error_at(start, "unclosed string")),
            }
        }
    }

    /// Scan raw text up to an unnested `{`, `;` or `}` (none consumed),
    /// honoring strings, parentheses and comments.
    fn scan_raw(&mut self) -> Result<String, CssError> {
        let mut buf = String::new();
        let mut paren_depth = 0usize;
        loop {
            match self.peek() {
                None => return Ok(buf),
                Some('\'') | Some('"') => self.take_string(&mut buf)?,
                Some('/') if self.peek2() == Some('*') => {
                    let text = self.parse_comment_text()?;
                    buf.push_str("/*");
                    buf.push_str(&text);
                    buf.push_str("*/");
                }
                Some('(') => {
                    paren_depth += 1;
                    buf.push(self.bump().unwrap());
                }
                Some(')') => {
                    paren_depth = paren_depth.saturating_sub(1);
                    buf.push(self.bump().unwrap());
                }
                Some('{' | ';' | '}') if paren_depth == 0 => return Ok(buf),
                Some(_) => buf.push(self.bump().unwrap()),
            }
        }
    }

    fn parse_nodes(&mut self, top_level: bool) -> Result<Vec<Node>, CssError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => {
                    if top_level {
                        return Ok(nodes);
                    }
                    return Err(self.error("unclosed block"));
                }
                Some('}') => {
                    if top_level {
                        return Err(self.error("unexpected '}'"));
                    }
                    return Ok(nodes);
                }
                Some(';') => {
                    // Stray semicolon, tolerated.
                    self.bump();
                }
                Some('/') if self.at_comment() => {
                    let pos = self.pos();
                    let text = self.parse_comment_text()?;
                    nodes.push(Node::Comment { text, pos });
                }
                Some('@') => nodes.push(self.parse_at_rule()?),
                Some(_) => {
                    if let Some(node) = self.parse_rule_or_declaration()? {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    fn parse_at_rule(&mut self) -> Result<Node, CssError> {
        let pos = self.pos();
        self.bump(); // '@'
        let mut name = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '-') {
            name.push(self.bump().unwrap());
        }
        if name.is_empty() {
            return Err(self.error_at(pos, "missing at-rule name"));
        }
        let params = self.scan_raw()?.trim().to_string();
        match self.peek() {
            Some('{') => {
                self.bump();
                let body = self.parse_nodes(false)?;
                if self.peek() != Some('}') {
                    return Err(self.error_at(pos, format!("unclosed @{name} block")));
                }
                self.bump();
                Ok(Node::AtRule { name, params, body: Some(body), pos })
            }
            Some(';') | None => {
                if self.peek() == Some(';') {
                    self.bump();
                }
                Ok(Node::AtRule { name, params, body: None, pos })
            }
            Some('}') => Ok(Node::AtRule { name, params, body: None, pos }),
            _ => unreachable!("scan_raw stops on {{ ; }}"),
        }
    }

    fn parse_rule_or_declaration(&mut self) -> Result<Option<Node>, CssError> {
        let pos = self.pos();
        let raw = self.scan_raw()?;
        match self.peek() {
            Some('{') => {
                self.bump();
                let body = self.parse_nodes(false)?;
                if self.peek() != Some('}') {
                    return Err(self.error_at(pos, "unclosed rule block"));
                }
                self.bump();
                Ok(Some(Node::Rule { selector: raw.trim().to_string(), body, pos }))
            }
            Some(';') | Some('}') | None => {
                if self.peek() == Some(';') {
                    self.bump();
                }
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                let Some(colon) = raw.find(':') else {
                    return Err(self.error_at(pos, format!("declaration missing ':': {raw}")));
                };
                Ok(Some(Node::Declaration(Declaration {
                    property: raw[..colon].trim().to_string(),
                    value: raw[colon + 1..].trim().to_string(),
                    pos,
                })))
            }
            _ => unreachable!("scan_raw stops on {{ ; }}"),
        }
    }
}

/// A node emitted at `out` that was parsed at `input` in the generated
/// stylesheet. The pipeline maps `input` through the input source map to
/// produce the final mapping for `out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedSpan {
    pub out: Pos,
    pub input: Pos,
}

pub struct Serialized {
    pub code: String,
    pub spans: Vec<MappedSpan>,
}

pub fn serialize(sheet: &Stylesheet) -> Serialized {
    let mut printer = Printer::default();
    for node in &sheet.nodes {
        printer.write_node(node, 0);
    }
    Serialized { code: printer.out, spans: printer.spans }
}

#[derive(Default)]
struct Printer {
    out: String,
    line: u32,
    column: u32,
    spans: Vec<MappedSpan>,
}

impl Printer {
    fn push(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += c.len_utf16() as u32;
            }
        }
        self.out.push_str(text);
    }

    fn mark(&mut self, input: Pos) {
        self.spans.push(MappedSpan {
            out: Pos { line: self.line, column: self.column },
            input,
        });
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.push("  ");
        }
    }

    fn write_node(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Rule { selector, body, pos } => {
                self.indent(depth);
                self.mark(*pos);
                self.push(selector);
                self.push(" {\n");
                for child in body {
                    self.write_node(child, depth + 1);
                }
                self.indent(depth);
                self.push("}\n");
            }
            Node::AtRule { name, params, body, pos } => {
                self.indent(depth);
                self.mark(*pos);
                self.push("@");
                self.push(name);
                if !params.is_empty() {
                    self.push(" ");
                    self.push(params);
                }
                match body {
                    Some(body) => {
                        self.push(" {\n");
                        for child in body {
                            self.write_node(child, depth + 1);
                        }
                        self.indent(depth);
                        self.push("}\n");
                    }
                    None => self.push(";\n"),
                }
            }
            Node::Declaration(decl) => {
                self.indent(depth);
                self.mark(decl.pos);
                self.push(&decl.property);
                self.push(": ");
                self.push(&decl.value);
                self.push(";\n");
            }
            Node::Comment { text, pos } => {
                self.indent(depth);
                self.mark(*pos);
                self.push("/*");
                self.push(text);
                self.push("*/\n");
            }
        }
    }
}
