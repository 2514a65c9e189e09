//! Ada parser generator (ada_parsegen) is a library to compile a combinator grammar into
//! the source code of a recursive descent parser which builds a strongly typed Abstract Syntax Tree.
//!
//! # Overview
//! Hand writing a parser for a language of the size of Ada is a costly and error prone exercise.
//! This library instead lets the grammar be written as a tree of combinator utilities like
//! [Seq](crate::combinator::Seq), [Alt](crate::combinator::Alt), [Opt](crate::combinator::Opt),
//! and [ListOf](crate::combinator::ListOf) in the rust programming language.
//! The grammar tree is not interpreted at runtime.
//! Instead a [Grammar] is compiled once into three textual artefacts: a header with the
//! declarations of every reachable AST type and parse function, a body with their definitions,
//! and an optional interactive driver.
//! The AST shape is declared with [NodeSchema](crate::types::NodeSchema) and
//! [EnumSchema](crate::types::EnumSchema) records, and the
//! [Transform](crate::combinator::Transform) combinator wires a matched sequence to an AST
//! constructor.
//! Type inference over the combinator tree decides the exact struct, list, and enum types the
//! emitted parser needs, and a [template set](crate::templates::ITemplates) renders the final
//! source text for the target emission language.
//!
//! # Example
//!
//! Following is a grammar implementation for the Ada `with` clause.
//! ```
//! use ada_parsegen::combinator::{tok, tok_class, Discard, ListOf, Opt, Seq, Transform};
//! use ada_parsegen::templates::CppTemplates;
//! use ada_parsegen::types::{Field, NodeSchema};
//! use ada_parsegen::{CombRef, Grammar, TokenClass, TokenMap};
//! use std::rc::Rc;
//!
//! let name = NodeSchema::new("Name", None, vec![Field::new("tok")]);
//! let with_decl = NodeSchema::new(
//!     "WithDecl",
//!     None,
//!     vec![
//!         Field::new("is_limited"),
//!         Field::new("is_private"),
//!         Field::new("packages"),
//!     ],
//! );
//!
//! let grammar = Grammar::new();
//!
//! let static_name: CombRef = Rc::new(Transform::new(
//!     &tok_class(TokenClass::Identifier),
//!     &name,
//! ));
//!
//! let with_rule: CombRef = Rc::new(Transform::new(
//!     &(Rc::new(Seq::new(vec![
//!         Rc::new(Opt::new(&tok("limited")).as_bool()) as CombRef,
//!         Rc::new(Opt::new(&tok("private")).as_bool()) as CombRef,
//!         Rc::new(Discard::new(&tok("with"))) as CombRef,
//!         Rc::new(ListOf::new(&static_name, Some(&tok(",")), false)) as CombRef,
//!     ])) as CombRef),
//!     &with_decl,
//! ));
//!
//! grammar.add_rules(vec![("with_decl", with_rule)]).unwrap();
//!
//! let unit = grammar
//!     .generate(
//!         Rc::new(TokenMap::ada()),
//!         Rc::new(CppTemplates),
//!         "parse.hpp",
//!         Some("with_decl"),
//!     )
//!     .unwrap();
//!
//! assert!(unit.header.contains("class WithDecl"));
//! assert!(unit.body.contains("new WithDecl"));
//! ```

pub mod combinator;
mod comb_tree;
mod context;
mod error;
mod grammar;
mod name_gen;
pub mod templates;
mod token_map;
pub mod types;
pub mod util;

#[cfg(test)]
mod __tests__;

use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;
use std::rc::Rc;

pub use comb_tree::CombTree;

use combinator::{Alt, CombHelper, Seq};
use templates::{FnCallEnv, FnCodeEnv, ITemplates};
use types::{GenType, NodeSchema};
use util::Log;

/// A shared reference to a combinator node of the grammar tree.
pub type CombRef = Rc<dyn ICombinator>;

#[derive(Debug)]
/// An error raised while the grammar is validated and compiled into parser source code.
///
/// The first such error aborts code generation; the generated parser itself never raises
/// this kind of error since a parse failure is reported through the failure sentinel position.
pub struct GrammarError {
    message: String,
    what: String,
}

/// The lexical classes known to the token kind registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenClass {
    Identifier,
    Label,
    Number,
    Char,
    String,
    Termination,
}

/// The token kind registry which maps symbolic keyword, punctuation and class names
/// to the numeric kind identifiers used by the emitted parser.
pub struct TokenMap {
    literals: HashMap<&'static str, u16>,
    classes: HashMap<TokenClass, u16>,
}

/// A name generator producing unique identifiers for emitted variables, functions and
/// synthetic types. The counters are owned by the [CompileCtx] so that repeated
/// compilations of one grammar emit stable name sets.
pub struct NameGenerator {
    counters: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
/// A code fragment produced by lowering a single combinator.
///
/// `args` is the per-emission environment of a sequence: one entry per component in
/// declaration order, holding the component result variable, or [None] when the component
/// is discarded. [Extract](crate::combinator::Extract) and
/// [Transform](crate::combinator::Transform) read sub results from it instead of the
/// combinator node itself.
pub struct Emitted {
    pub pos_var: String,
    pub res_var: String,
    pub code: String,
    pub decls: Vec<(String, GenType)>,
    pub args: Vec<Option<String>>,
}

/// The compilation context which collects every artefact emitted for a grammar.
///
/// All bags are append only and the context enforces the emit once discipline for
/// types and functions. A fresh context is created per generation run.
pub struct CompileCtx {
    names: NameGenerator,
    token_map: Rc<TokenMap>,
    templates: Rc<dyn ITemplates>,
    types: HashSet<String>,
    fns: HashSet<String>,
    shared: HashSet<usize>,
    types_declarations: Vec<String>,
    types_definitions: Vec<String>,
    val_types_definitions: Vec<String>,
    fn_declarations: Vec<String>,
    body: Vec<String>,
    generic_vectors: BTreeSet<String>,
    diag_types: Vec<Rc<NodeSchema>>,
    rules_to_fn_names: Vec<(&'static str, String, GenType)>,
}

/// The textual artefacts produced for one grammar.
#[derive(Debug)]
pub struct GeneratedUnit {
    pub header: String,
    pub body: String,
    pub interactive: Option<String>,
}

/// A container of named grammar rules.
///
/// Rules are added in bulk with [add_rules](Grammar::add_rules) which marks the top of every
/// rule as a root combinator. Looking up a rule with [rule](Grammar::rule) before it is added
/// returns a [Defer](crate::combinator::Defer) so that mutually recursive rules can reference
/// each other in any declaration order.
pub struct Grammar {
    rules: Rc<RefCell<Vec<(&'static str, CombRef)>>>,
    debug: OnceCell<Log<&'static str>>,
}

/// A trait implemented by every combinator utility of the grammar tree.
///
/// A combinator exposes its statically inferred result type, whether its result takes part
/// in reference counting, and the contract to lower itself into a parser code fragment.
pub trait ICombinator: Display {
    /// Statically inferred result type of the combinator.
    ///
    /// [None] is only returned while a recursive self reference holds the inference lock;
    /// every combinator of a resolved grammar otherwise has exactly one result type.
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError>;

    /// Whether the emitted result participates in reference counting of the target runtime.
    fn needs_refcount(&self) -> bool;

    /// Direct children of this combinator node. [Defer](crate::combinator::Defer) reports no
    /// children so that the grammar graph minus deferred edges stays acyclic.
    fn children(&self) -> Vec<CombRef>;

    fn helper(&self) -> &CombHelper;

    /// Lower this combinator into a code fragment which matches tokens starting at
    /// `pos_name`, inline at the caller.
    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError>;

    fn is_discard(&self) -> bool {
        false
    }

    fn as_seq(&self) -> Option<&Seq> {
        None
    }

    fn as_alt(&self) -> Option<&Alt> {
        None
    }

    /// Inferred result type, failing when the combinator is locked in unresolved recursion.
    fn resolved_type(&self) -> Result<GenType, GrammarError> {
        self.infer_type()?.ok_or_else(|| {
            GrammarError::new(
                "TypeInference".into(),
                format!("Unresolved recursive result type for {}.", self),
            )
        })
    }

    /// Emit the fragment inline, or compile this combinator into its own parse function and
    /// emit a call to it.
    ///
    /// The function form is forced for root combinators, for combinators already compiled,
    /// for combinators referenced from more than one place of the grammar, and when the
    /// caller demands it (the deferred combinator must never inline through a grammar cycle).
    fn gen_code_or_fncall(
        &self,
        ctx: &mut CompileCtx,
        pos_name: &str,
        force_fncall: bool,
    ) -> Result<Emitted, GrammarError> {
        #[cfg(debug_assertions)]
        self.helper().log_emission(&format!("{}", self));

        let already_compiled = self
            .helper()
            .fn_name()
            .map_or(false, |name| ctx.has_fn(name));

        if self.helper().is_root()
            || force_fncall
            || already_compiled
            || ctx.is_shared(self.helper().key())
        {
            self.compile(ctx)?;
            let fn_name = self.helper().obtain_fn_name(ctx.names_mut());
            let result_type = self.resolved_type()?;
            let pos = ctx.gen_name("fncall_pos");
            let res = ctx.gen_name("fncall_res");
            let code = ctx.templates().combinator_fncall(&FnCallEnv {
                fn_name: &fn_name,
                pos_name,
                pos: &pos,
                res: &res,
            });
            Ok(Emitted {
                pos_var: pos.clone(),
                res_var: res.clone(),
                code,
                decls: vec![(pos, GenType::Pos), (res, result_type)],
                args: Vec::new(),
            })
        } else {
            self.emit(ctx, pos_name)
        }
    }

    /// Compile this combinator into its own parse function once per context.
    fn compile(&self, ctx: &mut CompileCtx) -> Result<(), GrammarError> {
        let fn_name = self.helper().obtain_fn_name(ctx.names_mut());
        if !ctx.note_fn(&fn_name) {
            return Ok(());
        }

        let emitted = self.emit(ctx, "pos")?;
        let result_type = self.resolved_type()?;
        let templates = ctx.templates();
        let profile = templates.combinator_fn_profile(&fn_name, &result_type);
        let code = templates.combinator_fn_code(&FnCodeEnv {
            fn_name: &fn_name,
            result_type: &result_type,
            decls: &emitted.decls,
            code: &emitted.code,
            pos_var: &emitted.pos_var,
            res_var: &emitted.res_var,
        });
        ctx.push_fn(profile, code);
        Ok(())
    }
}

impl Emitted {
    /// Result variables of the kept components, in declaration order.
    pub fn kept_args(&self) -> Vec<String> {
        self.args.iter().flatten().cloned().collect()
    }
}
