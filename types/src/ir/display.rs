use super::{ParamRole, TypeId, TypeTerm};
use crate::TypeArena;
use core::fmt;

/// Pretty-printer for a type term, used in diagnostics and logs.
///
/// Named references print as `Module.name<args>` and are never expanded,
/// so recursive types print finitely.
pub struct TypeDisplay<'a> {
    arena: &'a TypeArena,
    ty: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(arena: &'a TypeArena, ty: TypeId) -> Self {
        Self { arena, ty }
    }

    fn child(&self, ty: TypeId) -> TypeDisplay<'a> {
        TypeDisplay::new(self.arena, ty)
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, items: &[TypeId]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.child(*item))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.arena.get(self.ty);
        match &data.term {
            TypeTerm::Scalar(s) => write!(f, "{}", s.name()),
            TypeTerm::Var(index) => write!(f, "'{}", index),
            TypeTerm::Record(fields) | TypeTerm::Object(fields) => {
                if matches!(data.term, TypeTerm::Object(_)) {
                    write!(f, "{{. ")?;
                } else {
                    write!(f, "{{")?;
                }
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if field.mutable {
                        write!(f, "mutable ")?;
                    }
                    let marker = if field.optional { "?" } else { "" };
                    write!(f, "{}{}: {}", field.name, marker, self.child(field.ty))?;
                }
                write!(f, "}}")
            }
            TypeTerm::Variant(ctors) => {
                for (i, ctor) in ctors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    match ctor.payload {
                        Some(payload) => write!(f, "{}({})", ctor.name, self.child(payload))?,
                        None => write!(f, "{}", ctor.name)?,
                    }
                }
                Ok(())
            }
            TypeTerm::Tuple(elems) => {
                write!(f, "(")?;
                self.write_list(f, elems)?;
                write!(f, ")")
            }
            TypeTerm::Array(inner) => write!(f, "array<{}>", self.child(*inner)),
            TypeTerm::Option(inner) => write!(f, "option<{}>", self.child(*inner)),
            TypeTerm::Nullable(inner) => write!(f, "nullable<{}>", self.child(*inner)),
            TypeTerm::Ref(inner) => write!(f, "ref<{}>", self.child(*inner)),
            TypeTerm::Opaque(name) => write!(f, "{}", name),
            TypeTerm::Function(sig) => {
                write!(f, "(")?;
                for (i, param) in sig.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &param.role {
                        ParamRole::Positional => {}
                        ParamRole::Named(label) => write!(f, "~{}: ", label)?,
                        ParamRole::Optional { label, .. } => write!(f, "~{}: ?", label)?,
                    }
                    write!(f, "{}", self.child(param.ty))?;
                }
                write!(f, ") => {}", self.child(sig.ret))
            }
            TypeTerm::NamedRef(named) => {
                write!(f, "{}.{}", named.module, named.name)?;
                if !named.args.is_empty() {
                    write!(f, "<")?;
                    self.write_list(f, &named.args)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

/// Format a type as a string.
pub fn display_type(arena: &TypeArena, ty: TypeId) -> alloc::string::String {
    alloc::format!("{}", TypeDisplay::new(arena, ty))
}
