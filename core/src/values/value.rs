use super::function::FnValue;
use crate::{String, Vec};
use alloc::sync::Arc;
use boundary_types::Literal;
use core::fmt;
use parking_lot::RwLock;

/// A runtime value on either side of the boundary.
///
/// Both runtimes share this one model; what differs is which carriers a
/// value uses. Host records are [`Value::Object`]s, native records are
/// [`Value::Array`]s, native payload constructors are [`Value::Block`]s.
#[derive(Clone)]
pub enum Value {
    /// Nothing there: an omitted key, a missing argument, `None`.
    Absent,
    Null,
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    /// Keyed record. Key order is not significant.
    Object(Vec<(String, Value)>),
    /// Tagged block, the native carrier for payload constructors.
    Block { tag: u32, fields: Vec<Value> },
    /// Mutable cell with identity.
    Box(BoxRef),
    Function(FnValue),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn boxed(contents: Value) -> Self {
        Value::Box(BoxRef::new(contents))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Look up a key of an object. Absent-valued keys count as missing.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .find(|(k, v)| k == key && !v.is_absent())
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_box(&self) -> Option<&BoxRef> {
        match self {
            Value::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FnValue> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Short name of the value's carrier, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Block { .. } => "block",
            Value::Box(_) => "box",
            Value::Function(_) => "function",
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Unit => Value::Unit,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::String(s) => Value::Str(s.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent)
            | (Value::Null, Value::Null)
            | (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                let present = |entries: &[(String, Value)]| {
                    entries.iter().filter(|(_, v)| !v.is_absent()).count()
                };
                present(a) == present(b)
                    && a.iter()
                        .filter(|(_, v)| !v.is_absent())
                        .all(|(k, v)| other.get(k) == Some(v))
            }
            (
                Value::Block { tag: ta, fields: fa },
                Value::Block { tag: tb, fields: fb },
            ) => ta == tb && fa == fb,
            // Boxes compare by contents; use `BoxRef::same_box` for identity.
            (Value::Box(a), Value::Box(b)) => a.same_box(b) || a.get() == b.get(),
            (Value::Function(a), Value::Function(b)) => a.same_function(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => format_float(f, *x),
            Value::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Value::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Block { tag, fields } => {
                write!(f, "<{}>(", tag)?;
                write_list(f, fields)?;
                write!(f, ")")
            }
            Value::Box(b) => write!(f, "ref({})", b.get()),
            Value::Function(func) => write!(f, "<function/{}>", func.arity()),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn format_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Shared mutable cell. Clones alias the same cell.
#[derive(Clone)]
pub struct BoxRef(Arc<RwLock<Value>>);

impl BoxRef {
    pub fn new(contents: Value) -> Self {
        BoxRef(Arc::new(RwLock::new(contents)))
    }

    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    pub fn set(&self, contents: Value) {
        *self.0.write() = contents;
    }

    /// True if both handles point to the same cell.
    pub fn same_box(&self, other: &BoxRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for BoxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxRef({:?})", self.get())
    }
}
