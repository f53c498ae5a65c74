use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::value::Value;

/// A node of the UI tree built by the host primitives: a kind tag, the
/// props captured at construction, and child values (nested elements or
/// plain values rendered as text).
pub struct Element {
    pub kind: String,
    pub props: Vec<(String, Value)>,
    pub children: Vec<Value>,
}

impl Element {
    pub fn new(kind: &str, mut props: Vec<(String, Value)>, children: Vec<Value>) -> Self {
        props.sort_by(|a, b| a.0.cmp(&b.0));
        Element {
            kind: kind.to_string(),
            props,
            children,
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Indented tree rendering with a depth guard: a node whose value-graph
    /// depth hits the ceiling renders as `...` so cycles threaded through
    /// props or children terminate.
    pub(crate) fn fmt_guarded(
        &self,
        f: &mut Formatter<'_>,
        indent: usize,
        depth: usize,
    ) -> fmt::Result {
        if depth >= crate::runner::ds::value::RENDER_DEPTH_LIMIT {
            return write!(f, "{:indent$}...", "", indent = indent * 2);
        }
        write!(f, "{:indent$}{}", "", self.kind, indent = indent * 2)?;
        for (key, value) in &self.props {
            write!(f, " {}=", key)?;
            value.fmt_depth(f, depth + 1)?;
        }
        for child in &self.children {
            writeln!(f)?;
            match child {
                Value::Element(e) => e.fmt_guarded(f, indent + 1, depth + 1)?,
                Value::String(s) => {
                    write!(f, "{:indent$}{}", "", s, indent = (indent + 1) * 2)?
                }
                other => {
                    write!(f, "{:indent$}", "", indent = (indent + 1) * 2)?;
                    other.fmt_depth(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_guarded(f, 0, 0)
    }
}
