use crate::templates::{ITemplates, InteractiveMainEnv, MainBodyEnv, MainHeaderEnv};
use crate::types::{GenType, NodeSchema};
use crate::{CompileCtx, GrammarError, NameGenerator, TokenMap};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

impl CompileCtx {
    /// Create a fresh context for one generation run.
    pub fn new(token_map: Rc<TokenMap>, templates: Rc<dyn ITemplates>) -> Self {
        Self {
            names: NameGenerator::new(),
            token_map,
            templates,
            types: HashSet::new(),
            fns: HashSet::new(),
            shared: HashSet::new(),
            types_declarations: Vec::new(),
            types_definitions: Vec::new(),
            val_types_definitions: Vec::new(),
            fn_declarations: Vec::new(),
            body: Vec::new(),
            generic_vectors: BTreeSet::new(),
            diag_types: Vec::new(),
            rules_to_fn_names: Vec::new(),
        }
    }

    pub fn gen_name(&mut self, prefix: &str) -> String {
        self.names.gen(prefix)
    }

    pub fn names_mut(&mut self) -> &mut NameGenerator {
        &mut self.names
    }

    pub fn token_map(&self) -> &TokenMap {
        &self.token_map
    }

    pub fn templates(&self) -> Rc<dyn ITemplates> {
        self.templates.clone()
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Note `name` as processed; `false` means it was already registered.
    pub fn note_type(&mut self, name: &str) -> bool {
        self.types.insert(name.to_string())
    }

    pub fn has_fn(&self, name: &str) -> bool {
        self.fns.contains(name)
    }

    /// Note `name` as an emitted function; `false` means it was already emitted.
    pub fn note_fn(&mut self, name: &str) -> bool {
        self.fns.insert(name.to_string())
    }

    pub(crate) fn mark_shared(&mut self, key: usize) {
        self.shared.insert(key);
    }

    /// Whether the combinator behind `key` is referenced from more than one place of the
    /// grammar and must be compiled into its own function.
    pub fn is_shared(&self, key: usize) -> bool {
        self.shared.contains(&key)
    }

    pub fn push_type_decl(&mut self, declaration: String) {
        self.types_declarations.push(declaration);
    }

    pub fn push_type_def(&mut self, definition: String) {
        self.types_definitions.push(definition);
    }

    /// Row type definitions are prepended so they precede any type which embeds them.
    pub fn prepend_type_def(&mut self, definition: String) {
        self.types_definitions.insert(0, definition);
    }

    pub fn push_val_type_def(&mut self, definition: String) {
        self.val_types_definitions.push(definition);
    }

    pub fn push_fn(&mut self, declaration: String, definition: String) {
        self.fn_declarations.push(declaration);
        self.body.push(definition);
    }

    pub fn push_body(&mut self, definition: String) {
        self.body.push(definition);
    }

    pub fn add_generic_vector(&mut self, element: String) {
        self.generic_vectors.insert(element);
    }

    pub fn add_diag_type(&mut self, schema: Rc<NodeSchema>) {
        self.diag_types.push(schema);
    }

    /// Every AST class a transform combinator targets, in emission order.
    pub fn diag_types(&self) -> &[Rc<NodeSchema>] {
        &self.diag_types
    }

    pub(crate) fn map_rule(
        &mut self,
        rule: &'static str,
        fn_name: String,
        result_type: GenType,
    ) {
        self.rules_to_fn_names.push((rule, fn_name, result_type));
    }

    /// Generated function name of a compiled rule, the external entry point lookup.
    pub fn rule_fn_name(&self, rule: &str) -> Option<&str> {
        self.rules_to_fn_names
            .iter()
            .find(|(name, _, _)| *name == rule)
            .map(|(_, fn_name, _)| fn_name.as_str())
    }

    pub fn types_declarations(&self) -> &[String] {
        &self.types_declarations
    }

    pub fn types_definitions(&self) -> &[String] {
        &self.types_definitions
    }

    pub fn value_type_definitions(&self) -> &[String] {
        &self.val_types_definitions
    }

    pub fn fn_declarations(&self) -> &[String] {
        &self.fn_declarations
    }

    pub fn bodies(&self) -> &[String] {
        &self.body
    }

    /// Render the header artefact: every reachable type and function declaration.
    pub fn header(&self) -> String {
        let vector_elements: Vec<String> = self.generic_vectors.iter().cloned().collect();
        self.templates.main_header(&MainHeaderEnv {
            type_declarations: &self.types_declarations,
            value_type_definitions: &self.val_types_definitions,
            type_definitions: &self.types_definitions,
            fn_declarations: &self.fn_declarations,
            vector_elements: &vector_elements,
        })
    }

    /// Render the body artefact: the definitions behind the header.
    pub fn source(&self, header_name: &str) -> String {
        self.templates.main_body(&MainBodyEnv {
            header_name,
            bodies: &self.body,
        })
    }

    /// Render the interactive driver parsing standard input with the given root rule.
    pub fn interactive_main(
        &self,
        header_name: &str,
        rule: &str,
    ) -> Result<String, GrammarError> {
        let (fn_name, result_type) = self
            .rules_to_fn_names
            .iter()
            .find(|(name, _, _)| *name == rule)
            .map(|(_, fn_name, result_type)| (fn_name.as_str(), result_type))
            .ok_or_else(|| {
                GrammarError::new(
                    "MainRule".into(),
                    format!("Rule {:?} is not compiled in this context.", rule),
                )
            })?;
        Ok(self.templates.interactive_main(&InteractiveMainEnv {
            header_name,
            rule_name: rule,
            fn_name,
            result_type,
        }))
    }
}

pub(crate) type UseCounts = HashMap<usize, usize>;
