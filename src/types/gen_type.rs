use super::GenType;
use crate::{CombRef, CompileCtx, GrammarError};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

impl GenType {
    /// Stable identifier of the type for emitted code and emit once bookkeeping.
    pub fn name(&self) -> String {
        match self {
            GenType::Pos => "Pos".into(),
            GenType::Bool => "Bool".into(),
            GenType::Token => "Token".into(),
            GenType::AstRoot => "ASTNode".into(),
            GenType::Node(schema) => schema.name().into(),
            GenType::Enum(schema) => schema.name().into(),
            GenType::Row(row) => row.name().unwrap_or("Row").into(),
            GenType::List(element) => format!("List_{}", element.name()),
        }
    }

    /// Whether values of this type have reference semantics in the emitted code.
    pub fn is_pointer_like(&self) -> bool {
        match self {
            GenType::Pos | GenType::Bool | GenType::Token | GenType::Enum(_) => false,
            GenType::AstRoot | GenType::Node(_) | GenType::Row(_) | GenType::List(_) => true,
        }
    }

    /// Idempotently register the declaration and definition of this type in `ctx`.
    ///
    /// For node classes the `source` combinator, when given, supplies the component types
    /// the class fields are bound to.
    pub fn add_to_context(
        &self,
        ctx: &mut CompileCtx,
        source: Option<&CombRef>,
    ) -> Result<(), GrammarError> {
        match self {
            GenType::Node(schema) => schema.add_to_context(ctx, source),
            GenType::Enum(schema) => schema.add_to_context(ctx),
            GenType::List(element) => element.add_to_context(ctx, None),
            _ => Ok(()),
        }
    }
}

impl PartialEq for GenType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GenType::Pos, GenType::Pos)
            | (GenType::Bool, GenType::Bool)
            | (GenType::Token, GenType::Token)
            | (GenType::AstRoot, GenType::AstRoot) => true,
            (GenType::Node(a), GenType::Node(b)) => Rc::ptr_eq(a, b) || a.name() == b.name(),
            (GenType::Enum(a), GenType::Enum(b)) => Rc::ptr_eq(a, b) || a.name() == b.name(),
            (GenType::Row(a), GenType::Row(b)) => Rc::ptr_eq(a, b),
            (GenType::List(a), GenType::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for GenType {}

impl Display for GenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Debug for GenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
