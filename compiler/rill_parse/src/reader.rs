//! Recursive-descent reader.

use rill_ir::{Name, Span};
use rill_lexer::{Token, TokenKind, Tokenizer};
use rill_stack::ensure_sufficient_stack;
use rill_value::Value;
use tracing::trace;

use crate::{MapEntry, Node, NodeKind, ReadError, ReadErrorKind};

pub(crate) struct Reader<'src> {
    tokens: Tokenizer<'src>,
}

impl<'src> Reader<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Reader {
            tokens: Tokenizer::new(source),
        }
    }

    pub(crate) fn read_all(mut self) -> Result<Vec<Node>, ReadError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.next_token()? {
            nodes.push(self.read_node(token)?);
        }
        trace!(forms = nodes.len(), "read source");
        Ok(nodes)
    }

    fn next_token(&mut self) -> Result<Option<Token<'src>>, ReadError> {
        self.tokens.next().transpose().map_err(ReadError::from)
    }

    fn read_node(&mut self, token: Token<'src>) -> Result<Node, ReadError> {
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => {
                ensure_sufficient_stack(|| self.read_group(token))
            }
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => Err(
                ReadError::new(ReadErrorKind::UnexpectedClose { found: token.kind }, token.span),
            ),
            TokenKind::Str => Ok(Node::atom(Value::string(token.text), token.span)),
            TokenKind::Word => read_word(&token.text, token.span),
        }
    }

    /// Read children up to the matching close; `open` has been consumed.
    fn read_group(&mut self, open: Token<'src>) -> Result<Node, ReadError> {
        let mut children = Vec::new();
        loop {
            let Some(token) = self.next_token()? else {
                return Err(ReadError::new(
                    ReadErrorKind::Unclosed { open: open.kind },
                    open.span,
                ));
            };

            if token.kind.is_close() {
                if open.kind.closing() != Some(token.kind) {
                    return Err(ReadError::new(
                        ReadErrorKind::Mismatched {
                            open: open.kind,
                            open_span: open.span,
                            found: token.kind,
                        },
                        token.span,
                    ));
                }
                let span = open.span.merge(token.span);
                return finish_group(open.kind, children, span);
            }

            if open.kind == TokenKind::OpenParen && children.is_empty() {
                if let Some(label) = label_name(&token) {
                    children.push(Node::new(NodeKind::Label(Name::new(label)), token.span));
                    continue;
                }
            }

            children.push(self.read_node(token)?);
        }
    }
}

/// `:name` word text, without the colon.
fn label_name<'t>(token: &'t Token<'_>) -> Option<&'t str> {
    if token.kind != TokenKind::Word {
        return None;
    }
    token.text.strip_prefix(':').filter(|name| !name.is_empty())
}

fn finish_group(open: TokenKind, children: Vec<Node>, span: Span) -> Result<Node, ReadError> {
    let kind = match open {
        TokenKind::OpenBracket => NodeKind::List(children),
        TokenKind::OpenBrace => NodeKind::Map(map_entries(children, span)?),
        _ => NodeKind::Expression(children),
    };
    Ok(Node::new(kind, span))
}

fn map_entries(children: Vec<Node>, span: Span) -> Result<Vec<MapEntry>, ReadError> {
    if children.len() % 2 != 0 {
        return Err(ReadError::new(ReadErrorKind::OddMapEntries, span));
    }
    let mut entries = Vec::with_capacity(children.len() / 2);
    let mut iter = children.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        let name = match &key.kind {
            NodeKind::Atom(Value::Number(n)) => Name::from(Value::Number(*n).to_string()),
            NodeKind::Atom(atom) => match (atom.as_str(), atom.as_variable()) {
                (Some(text), _) => Name::new(text),
                (_, Some(symbol)) => symbol.clone(),
                _ => {
                    return Err(ReadError::new(
                        ReadErrorKind::InvalidMapKey {
                            found: atom.type_name(),
                        },
                        key.span,
                    ));
                }
            },
            _ => {
                return Err(ReadError::new(
                    ReadErrorKind::InvalidMapKey {
                        found: key.describe(),
                    },
                    key.span,
                ));
            }
        };
        entries.push(MapEntry {
            key: name,
            key_span: key.span,
            value,
        });
    }
    Ok(entries)
}

/// Whether a word should be read as a number.
fn looks_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [first, ..] if first.is_ascii_digit() => true,
        [b'+' | b'-' | b'.', second, ..] => second.is_ascii_digit(),
        _ => false,
    }
}

/// Classify a bare word.
fn read_word(text: &str, span: Span) -> Result<Node, ReadError> {
    let value = match text {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if looks_numeric(text) => match text.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => {
                return Err(ReadError::new(
                    ReadErrorKind::InvalidNumber {
                        text: text.to_string(),
                    },
                    span,
                ));
            }
        },
        // In value position `:name` is the string "name" (a jump target).
        _ => match text.strip_prefix(':').filter(|rest| !rest.is_empty()) {
            Some(label) => Value::string(label),
            None => Value::variable(text),
        },
    };
    Ok(Node::atom(value, span))
}

#[cfg(test)]
mod tests;
