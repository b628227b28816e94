//! Expression compilation for candidate-starter users and groups.
//!
//! The grammar is intentionally small: literal text with embedded `${path}`
//! or `#{path}` references, where `path` is a dotted identifier such as
//! `initiator` or `order.owner`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{definition::Variables, error::ExpressionError};

/// Compiles strings into evaluatable [`Expression`]s.
pub trait ExpressionCompiler: Send + Sync {
    fn compile(&self, text: &str) -> Result<Expression, ExpressionError>;
}

/// One piece of a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Segment {
    Literal(String),
    /// Dotted path into the variables, already split.
    Reference(Vec<String>),
}

/// A compiled expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// The source text, verbatim.
    pub text: String,
    pub segments: Vec<Segment>,
}

impl Expression {
    /// Evaluate against `variables`.
    ///
    /// A lone reference yields the referenced value unchanged; anything else
    /// is rendered into a string.
    ///
    /// # Errors
    /// [`ExpressionError::UnknownProperty`] if a referenced path is not set.
    pub fn evaluate(&self, variables: &Variables) -> Result<Value, ExpressionError> {
        if let [Segment::Reference(path)] = self.segments.as_slice() {
            return resolve(path, variables).cloned();
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Reference(path) => match resolve(path, variables)? {
                    Value::String(s) => out.push_str(s),
                    Value::Null => {}
                    other => out.push_str(&other.to_string()),
                },
            }
        }
        Ok(Value::String(out))
    }
}

fn resolve<'v>(path: &[String], variables: &'v Variables) -> Result<&'v Value, ExpressionError> {
    let unknown = || ExpressionError::UnknownProperty(path.join("."));

    let (first, rest) = path.split_first().ok_or_else(unknown)?;
    let mut current = variables.get(first).ok_or_else(unknown)?;
    for part in rest {
        current = current.get(part.as_str()).ok_or_else(unknown)?;
    }
    Ok(current)
}

// ---------------------------------------------------------------------------
// TemplateExpressionCompiler
// ---------------------------------------------------------------------------

/// The stock [`ExpressionCompiler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExpressionCompiler;

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Byte offset of the earliest `${` or `#{` in `s`.
fn next_opener(s: &str) -> Option<usize> {
    match (s.find("${"), s.find("#{")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl ExpressionCompiler for TemplateExpressionCompiler {
    fn compile(&self, text: &str) -> Result<Expression, ExpressionError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;
        let mut offset = 0;

        while let Some(start) = next_opener(rest) {
            literal.push_str(&rest[..start]);
            let open = offset + start;
            let body = &rest[start + 2..];

            let end = body.find('}').ok_or_else(|| ExpressionError::Unterminated {
                text: text.to_owned(),
                offset: open,
            })?;
            let reference = body[..end].trim();
            if reference.is_empty() {
                return Err(ExpressionError::Empty { text: text.to_owned(), offset: open });
            }

            let path: Vec<String> = reference.split('.').map(str::to_owned).collect();
            if !path.iter().all(|p| is_identifier(p)) {
                return Err(ExpressionError::InvalidReference {
                    text: text.to_owned(),
                    reference: reference.to_owned(),
                });
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Reference(path));

            let consumed = start + 2 + end + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Expression { text: text.to_owned(), segments })
    }
}
