use super::{Field, GenType, NodeSchema};
use crate::templates::{AstNodeDefEnv, AstNodeImplEnv, ReprField};
use crate::{CombRef, CompileCtx, GrammarError};
use once_cell::unsync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl Field {
    /// Create a field which takes part in the emitted pretty printer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            repr: true,
            kw_repr: false,
            opt: false,
            suppress_if_null: false,
            ty: OnceCell::new(),
        }
    }

    /// Create a field which is excluded from the emitted pretty printer.
    pub fn hidden(name: &'static str) -> Self {
        Self {
            repr: false,
            ..Self::new(name)
        }
    }

    /// Render the field value in keyword position of the pretty printer.
    pub fn keyword(mut self) -> Self {
        self.kw_repr = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.opt = true;
        self
    }

    /// Skip the field in the pretty printer when its value is null.
    pub fn suppress_null(mut self) -> Self {
        self.suppress_if_null = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_repr(&self) -> bool {
        self.repr
    }

    pub fn is_keyword_repr(&self) -> bool {
        self.kw_repr
    }

    pub fn is_optional(&self) -> bool {
        self.opt
    }

    pub fn suppress_if_null(&self) -> bool {
        self.suppress_if_null
    }

    /// Inferred type of the field, unresolved until its binding combinator is typed.
    pub fn ty(&self) -> Option<&GenType> {
        self.ty.get()
    }

    fn bind_type(&self, ty: &GenType, class_name: &str) -> Result<(), GrammarError> {
        match self.ty.get() {
            None => {
                let _ = self.ty.set(ty.clone());
                Ok(())
            }
            Some(bound) if bound == ty => Ok(()),
            Some(bound) => Err(GrammarError::new(
                "FieldBinding".into(),
                format!(
                    "Field {}.{} is bound to {} but its combinator supplies {}.",
                    class_name, self.name, bound, ty
                ),
            )),
        }
    }
}

impl NodeSchema {
    /// Declare a concrete AST node class.
    /// ### Arguments
    /// * `name` - An unique class name.
    /// * `base` - Base class; [None] derives from the implicit AST root.
    /// * `fields` - Ordered field list appended after the base class fields.
    pub fn new(
        name: &'static str,
        base: Option<&Rc<NodeSchema>>,
        fields: Vec<Field>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name,
            is_abstract: false,
            base: base.cloned(),
            fields,
            repr_name: None,
        })
    }

    /// Declare an abstract AST node class which only serves as a common ancestor.
    pub fn abstract_node(name: &'static str, base: Option<&Rc<NodeSchema>>) -> Rc<Self> {
        Rc::new(Self {
            name,
            is_abstract: true,
            base: base.cloned(),
            fields: Vec::new(),
            repr_name: None,
        })
    }

    /// Declare a concrete class whose pretty printer label differs from the class name.
    pub fn repr_named(
        name: &'static str,
        repr_name: &'static str,
        base: Option<&Rc<NodeSchema>>,
        fields: Vec<Field>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name,
            is_abstract: false,
            base: base.cloned(),
            fields,
            repr_name: Some(repr_name),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn base(&self) -> Option<&Rc<NodeSchema>> {
        self.base.as_ref()
    }

    /// Fields declared on this class, without the inherited ones.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn repr_name(&self) -> &'static str {
        self.repr_name.unwrap_or(self.name)
    }

    /// The base class chain and this class, root first.
    pub fn ancestry(self: &Rc<Self>) -> Vec<Rc<NodeSchema>> {
        let mut chain = match &self.base {
            Some(base) => base.ancestry(),
            None => Vec::new(),
        };
        chain.push(self.clone());
        chain
    }

    /// Base class fields followed by this class fields, in declaration order.
    pub fn all_fields(self: &Rc<Self>) -> Vec<&Field> {
        let mut fields: Vec<&Field> = Vec::new();
        collect_fields(self, &mut fields);
        fields
    }

    /// Idempotently register this class and its base chain in `ctx`.
    ///
    /// When a `source` combinator is given, its kept components are bound to the class
    /// fields in order; a component count differing from the declared field count is a
    /// fatal grammar error. A class without own fields passes the source combinator up to
    /// its base class.
    pub fn add_to_context(
        self: &Rc<Self>,
        ctx: &mut CompileCtx,
        source: Option<&CombRef>,
    ) -> Result<(), GrammarError> {
        if ctx.has_type(self.name) {
            return Ok(());
        }

        let matchers: Vec<CombRef> = match source {
            None => Vec::new(),
            Some(comb) => match comb.as_seq() {
                Some(seq) => seq.kept_matchers(),
                None => vec![comb.clone()],
            },
        };

        if let Some(base) = &self.base {
            let base_source = if self.fields.is_empty() { source } else { None };
            base.add_to_context(ctx, base_source)?;
        }
        ctx.note_type(self.name);

        let mut component_types = Vec::with_capacity(matchers.len());
        for matcher in &matchers {
            component_types.push(matcher.resolved_type()?);
        }

        if source.is_some() {
            self.bind_fields(&component_types)?;
        }

        self.register(ctx);
        Ok(())
    }

    /// Register this class with explicitly supplied component types instead of a source
    /// combinator. Used by the right reducing list variant whose binary constructor takes
    /// the folded ancestor type twice.
    pub(crate) fn register_with_types(
        self: &Rc<Self>,
        ctx: &mut CompileCtx,
        component_types: &[GenType],
    ) -> Result<(), GrammarError> {
        if ctx.has_type(self.name) {
            return Ok(());
        }
        if let Some(base) = &self.base {
            base.add_to_context(ctx, None)?;
        }
        ctx.note_type(self.name);
        self.bind_fields(component_types)?;
        self.register(ctx);
        Ok(())
    }

    fn bind_fields(self: &Rc<Self>, component_types: &[GenType]) -> Result<(), GrammarError> {
        let fields = self.all_fields();
        if component_types.len() != fields.len() {
            return Err(GrammarError::new(
                "FieldBinding".into(),
                format!(
                    "{} declares {} fields but its combinator supplies {} components.",
                    self.name,
                    fields.len(),
                    component_types.len()
                ),
            ));
        }
        for (field, ty) in fields.into_iter().zip(component_types.iter()) {
            field.bind_type(ty, self.name)?;
        }
        Ok(())
    }

    fn register(self: &Rc<Self>, ctx: &mut CompileCtx) {
        let templates = ctx.templates();
        ctx.push_type_decl(templates.astnode_type_decl(self.name));

        let own_fields = bound_fields(&self.fields);
        let inherited: Vec<(String, GenType)> = match &self.base {
            Some(base) => {
                let mut collected = Vec::new();
                for ancestor in base.ancestry() {
                    collected.extend(bound_fields(&ancestor.fields));
                }
                collected
            }
            None => Vec::new(),
        };

        let definition = templates.astnode_type_def(&AstNodeDefEnv {
            name: self.name,
            base_name: self.base.as_ref().map(|b| b.name).unwrap_or("ASTNode"),
            is_abstract: self.is_abstract,
            fields: &own_fields,
            inherited: &inherited,
        });
        ctx.push_type_def(definition);

        let repr_fields: Vec<ReprField> = self
            .fields
            .iter()
            .filter(|field| field.repr && field.ty().is_some())
            .map(|field| ReprField {
                name: field.name.to_string(),
                keyword: field.kw_repr,
                suppress_if_null: field.suppress_if_null,
                pointer_like: field.ty().map_or(false, |t| t.is_pointer_like()),
            })
            .collect();
        ctx.push_body(templates.astnode_type_impl(&AstNodeImplEnv {
            name: self.name,
            repr_name: self.repr_name(),
            repr_fields: &repr_fields,
        }));
    }
}

fn collect_fields<'s>(schema: &'s Rc<NodeSchema>, fields: &mut Vec<&'s Field>) {
    if let Some(base) = &schema.base {
        collect_fields(base, fields);
    }
    fields.extend(schema.fields.iter());
}

fn bound_fields(fields: &[Field]) -> Vec<(String, GenType)> {
    fields
        .iter()
        .filter_map(|field| field.ty().map(|ty| (field.name.to_string(), ty.clone())))
        .collect()
}

impl Debug for NodeSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeSchema({})", self.name)
    }
}

/// The deepest class which is a base of every given class.
///
/// The base chains are walked root ward in parallel while they agree; [None] means the
/// classes only meet at the implicit AST root.
pub fn common_ancestor(classes: &[Rc<NodeSchema>]) -> Option<Rc<NodeSchema>> {
    let chains: Vec<Vec<Rc<NodeSchema>>> = classes.iter().map(|c| c.ancestry()).collect();
    let shortest = chains.iter().map(|chain| chain.len()).min()?;

    let mut ancestor = None;
    for depth in 0..shortest {
        let candidate = &chains[0][depth];
        if chains
            .iter()
            .all(|chain| Rc::ptr_eq(&chain[depth], candidate))
        {
            ancestor = Some(candidate.clone());
        } else {
            break;
        }
    }
    ancestor
}
