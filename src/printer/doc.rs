//! Layout instructions
//!
//! A [`Doc`] describes what to print and where a line may break, but not
//! where it does: that is decided later by a layout engine given a line
//! width. The vocabulary is the usual one for Wadler-style pretty printers.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    /// Literal text, never broken.
    Text(String),
    Concat(Vec<Doc>),
    /// Contents break one indentation level deeper.
    Indent(Box<Doc>),
    /// Contents are printed flat if they fit, otherwise every line of this
    /// group breaks.
    Group(Box<Doc>),
    /// A space when flat, a newline when broken.
    Line,
    /// Nothing when flat, a newline when broken.
    SoftLine,
    /// Always a newline; the enclosing groups break.
    HardLine,
}

pub fn text(s: impl Into<String>) -> Doc {
    Doc::Text(s.into())
}

pub fn concat(parts: Vec<Doc>) -> Doc {
    Doc::Concat(parts)
}

pub fn indent(doc: Doc) -> Doc {
    Doc::Indent(Box::new(doc))
}

pub fn group(doc: Doc) -> Doc {
    Doc::Group(Box::new(doc))
}

pub fn line() -> Doc {
    Doc::Line
}

pub fn softline() -> Doc {
    Doc::SoftLine
}

pub fn hardline() -> Doc {
    Doc::HardLine
}

/// `docs` with a copy of `separator` between each pair.
pub fn join(separator: Doc, docs: Vec<Doc>) -> Doc {
    let mut parts = Vec::with_capacity(docs.len() * 2);
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            parts.push(separator.clone());
        }
        parts.push(doc);
    }
    Doc::Concat(parts)
}

impl From<&str> for Doc {
    fn from(s: &str) -> Self {
        Doc::Text(s.to_string())
    }
}

impl From<String> for Doc {
    fn from(s: String) -> Self {
        Doc::Text(s)
    }
}

impl Doc {
    /// Whether a hard line occurs anywhere inside, nested groups included.
    pub fn contains_hard_line(&self) -> bool {
        match self {
            Doc::HardLine => true,
            Doc::Concat(parts) => parts.iter().any(Doc::contains_hard_line),
            Doc::Indent(inner) | Doc::Group(inner) => inner.contains_hard_line(),
            Doc::Text(_) | Doc::Line | Doc::SoftLine => false,
        }
    }
}

/// Builder-call dump, e.g. `group(["a", indent([line, "b"])])`.
impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Doc::Text(s) => write!(f, "{:?}", s),
            Doc::Concat(parts) => {
                f.write_str("[")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                f.write_str("]")
            }
            Doc::Indent(inner) => write!(f, "indent({})", inner),
            Doc::Group(inner) => write!(f, "group({})", inner),
            Doc::Line => f.write_str("line"),
            Doc::SoftLine => f.write_str("softline"),
            Doc::HardLine => f.write_str("hardline"),
        }
    }
}
