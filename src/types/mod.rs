//! A module consist of the generatable type universe of the emitted parser.
//!
//! Type inference over the combinator tree produces values of [GenType].
//! The AST shape itself is declared with [NodeSchema] records carrying typed [Field]s,
//! and closed keyword alternatives are declared with [EnumSchema] records.
//! Anonymous [Row](GenType::Row) tuple types are created by sequence combinators, one
//! distinct type per sequence occurrence, and [List](GenType::List) types are created by
//! the list combinator for its element type.

mod enum_schema;
mod gen_type;
mod node_schema;

pub use node_schema::common_ancestor;

use once_cell::unsync::OnceCell;

#[cfg(test)]
mod __tests__;

/// The closed set of types the code generator can emit.
///
/// Primitive and enum variants have value semantics in the emitted code while node, row and
/// list variants have pointer semantics. Every variant supports a stable
/// [name](GenType::name), a [null expression](crate::templates::ITemplates::null_expr) used
/// to fill a result slot on match failure, and idempotent
/// [registration](GenType::add_to_context) in a compilation context.
#[derive(Clone)]
pub enum GenType {
    /// Token index position of the emitted parser.
    Pos,
    Bool,
    /// Opaque token handle.
    Token,
    /// The implicit root of the AST class hierarchy, provided by the target runtime.
    AstRoot,
    /// A declared AST node class.
    Node(std::rc::Rc<NodeSchema>),
    /// A declared enum type.
    Enum(std::rc::Rc<EnumSchema>),
    /// An anonymous tuple produced by one sequence combinator occurrence.
    Row(std::rc::Rc<RowId>),
    /// A homogeneous sequence of the element type.
    List(Box<GenType>),
}

/// The description record of one AST node class.
///
/// A node class has a name, an abstract or concrete marking, at most one base class and an
/// ordered list of fields. Field types are bound when a
/// [Transform](crate::combinator::Transform) combinator wires the class to its matched
/// sequence.
///
/// # Example
/// ```
/// use ada_parsegen::types::{Field, NodeSchema};
///
/// let use_decl = NodeSchema::abstract_node("UseDecl", None);
/// let use_pkg_decl = NodeSchema::new(
///     "UsePkgDecl",
///     Some(&use_decl),
///     vec![Field::new("packages")],
/// );
/// assert_eq!(use_pkg_decl.base().unwrap().name(), "UseDecl");
/// assert_eq!(use_pkg_decl.all_fields().len(), 1);
/// ```
pub struct NodeSchema {
    name: &'static str,
    is_abstract: bool,
    base: Option<std::rc::Rc<NodeSchema>>,
    fields: Vec<Field>,
    repr_name: Option<&'static str>,
}

/// A typed field of an AST node class.
///
/// The presentation flags only drive the emitted pretty printer; the field type is inferred
/// from the combinator component the field is bound to.
pub struct Field {
    name: &'static str,
    repr: bool,
    kw_repr: bool,
    opt: bool,
    suppress_if_null: bool,
    ty: OnceCell<GenType>,
}

/// A closed named set of symbolic alternatives with a fixed ordering.
///
/// Every emitted enum type carries an implicit `uninitialized` sentinel which is also its
/// null expression. The optional suffix keeps emitted alternative identifiers out of the
/// target language keyword space.
///
/// # Example
/// ```
/// use ada_parsegen::types::EnumSchema;
///
/// let in_out = EnumSchema::with_suffix("InOut", vec!["in", "out", "inout"], "way");
/// assert_eq!(in_out.emitted_alt("in"), "in_way");
/// ```
pub struct EnumSchema {
    name: &'static str,
    alternatives: Vec<&'static str>,
    suffix: Option<&'static str>,
}

/// The identity of one anonymous row tuple type.
///
/// Row types are structurally one per sequence combinator occurrence; the generated name
/// keeps them distinct and is assigned when the row type is first registered.
pub struct RowId {
    name: OnceCell<String>,
}

impl RowId {
    pub fn new() -> std::rc::Rc<Self> {
        std::rc::Rc::new(Self {
            name: OnceCell::new(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.get().map(|n| n.as_str())
    }

    pub(crate) fn assign(&self, name: String) {
        let _ = self.name.set(name);
    }
}
