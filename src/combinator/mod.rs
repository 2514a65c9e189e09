//! A module consist of combinator utilities which are the building blocks of the grammar tree.
//!
//! Each combinator represents one matching operation of the emitted parser.
//! The terminal utilities [TokenLit] and [ClassLit] match a single token by kind id,
//! while [Seq], [Alt], [Opt] and [ListOf] compose child combinators into sequences,
//! ordered alternatives, optional matches and separated repetitions.
//! The wrapper utilities [Discard], [Extract], [Transform] and [TagEnum] shape the result
//! of a match, and [Defer] breaks grammar cycles by resolving a rule reference lazily.
//! None of the utilities parses anything at runtime; every one of them knows how to lower
//! itself into a fragment of recursive descent parser source code.

mod builder;
mod helper;
mod non_terminals;
mod terminals;
mod wrappers;


use crate::types::{EnumSchema, GenType, NodeSchema, RowId};
use crate::util::Log;
use crate::{CombRef, GrammarError, TokenClass};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::rc::Rc;

/// A terminal combinator which matches the token whose kind id is registered for a
/// symbolic keyword or punctuation string. Its result is the opaque token handle.
pub struct TokenLit {
    literal: &'static str,
    helper: CombHelper,
}

/// A terminal combinator which matches any token of a lexical class.
pub struct ClassLit {
    class: TokenClass,
    helper: CombHelper,
}

/// A combinator which matches its child combinators in series.
///
/// The sequence fails at the position of the first failing child. Its result is an
/// anonymous row tuple of the non discarded children results, unless an [Extract] or
/// [Transform] wrapper consumes the components and inhibits the tuple construction.
/// Every sequence occurrence owns a distinct row type.
///
/// # Example
/// ```
/// use ada_parsegen::combinator::{tok, Discard, Seq};
/// use ada_parsegen::CombRef;
/// use std::rc::Rc;
///
/// let use_clause = Seq::new(vec![
///     Rc::new(Discard::new(&tok("use"))) as CombRef,
///     tok("type"),
/// ]);
/// // One kept component: the row binds a single field when transformed.
/// assert_eq!(use_clause.kept_matchers().len(), 1);
/// ```
pub struct Seq {
    matchers: Vec<CombRef>,
    row: Rc<RowId>,
    helper: CombHelper,
}

/// A combinator which tries its child combinators in declaration order at the same
/// starting position and accepts the first success.
///
/// All branches must share a common ancestor type. Nested alternations are flattened at
/// construction, so `(a | b) | c` and `a | (b | c)` hold the same branch sequence.
///
/// # Example
/// ```
/// use ada_parsegen::combinator::{tok, Alt};
/// use ada_parsegen::CombRef;
/// use std::rc::Rc;
///
/// let a_or_b = Alt::new(vec![tok("limited"), tok("private")]);
/// let nested = Alt::new(vec![Rc::new(a_or_b) as CombRef, tok("with")]);
/// assert_eq!(nested.branches().len(), 3);
/// ```
pub struct Alt {
    matchers: Vec<CombRef>,
    cached_type: OnceCell<GenType>,
    lock: Cell<bool>,
    helper: CombHelper,
}

/// A combinator which tries its child and, on failure, succeeds at the original position
/// with the null expression of the child type.
///
/// The boolean variant created with [as_bool](Opt::as_bool) instead yields `true` on
/// success and `false` on failure.
pub struct Opt {
    matcher: CombRef,
    booleanize: bool,
    helper: CombHelper,
}

/// A combinator which matches repetitions of an element, optionally separated, into a
/// list value.
///
/// With `empty_valid` the list accepts the empty token prefix and yields an empty list;
/// without it at least one element is required. The
/// [fold_right](ListOf::fold_right) variant folds the elements through a binary AST
/// constructor instead of building a flat list, which is the sanctioned idiom for left
/// associative operator chains written right recursively.
pub struct ListOf {
    parser: CombRef,
    separator: Option<CombRef>,
    empty_valid: bool,
    fold: Option<Rc<NodeSchema>>,
    helper: CombHelper,
}

/// A wrapper which parses its child and drops the result, suppressing the component from
/// the enclosing row tuple.
pub struct Discard {
    parser: CombRef,
    helper: CombHelper,
}

/// A wrapper which parses a sequence and yields the result of one of its components,
/// counted over all components in declaration order. The underlying sequence builds no
/// row tuple.
pub struct Extract {
    seq: Rc<Seq>,
    index: usize,
    helper: CombHelper,
}

/// The semantic action combinator which parses its child and constructs an instance of an
/// AST node class from the kept components.
///
/// Registering the class in the compilation context binds the class fields to the
/// component types, in order; a component count differing from the declared field count
/// is a fatal grammar error.
pub struct Transform {
    combinator: CombRef,
    schema: Rc<NodeSchema>,
    helper: CombHelper,
}

/// A combinator which parses its child, or accepts empty input when no child is given,
/// and yields a fixed enum alternative. Used to encode presence or absence of syntactic
/// keywords as tagged values.
pub struct TagEnum {
    matcher: Option<CombRef>,
    schema: Rc<EnumSchema>,
    alternative: &'static str,
    helper: CombHelper,
}

impl std::fmt::Debug for TagEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagEnum")
            .field("alternative", &self.alternative)
            .finish()
    }
}

/// A combinator which always succeeds without consuming input and produces a default
/// constructed instance of its type.
pub struct SuccessProd {
    typ: GenType,
    helper: CombHelper,
}

/// A combinator which always succeeds without consuming input and produces the null
/// expression of its type.
pub struct NullProd {
    typ: GenType,
    helper: CombHelper,
}

/// A combinator holding a thunk which resolves to another combinator on first use.
///
/// This is the sole mechanism for cyclic and forward referencing grammars: the grammar
/// graph may be cyclic, but every cycle edge is a deferred reference, and emission
/// through a deferred reference always goes via a function call.
pub struct Defer {
    thunk: Box<dyn Fn() -> Result<CombRef, GrammarError>>,
    resolved: OnceCell<CombRef>,
    lock: Cell<bool>,
    helper: CombHelper,
}

/// Shared bookkeeping of every combinator: the combinator kind, the rule marking, the
/// lazily generated parse function name and the debug logger.
pub struct CombHelper {
    kind: &'static str,
    rule_name: OnceCell<&'static str>,
    root: Cell<bool>,
    fn_name: OnceCell<String>,
    debugger: OnceCell<Log<&'static str>>,
}

/// A builder utility trait implemented for every sized combinator.
pub trait CombinatorBuilder: crate::ICombinator {
    /// Alternation with `other`, flattened when either side is already an alternation.
    fn or(self, other: &CombRef) -> Alt
    where
        Self: Sized;

    /// Bind this combinator to an AST class constructor.
    fn into_transform(self, schema: &Rc<NodeSchema>) -> Transform
    where
        Self: Sized;

    fn into_discard(self) -> Discard
    where
        Self: Sized;

    fn into_opt(self) -> Opt
    where
        Self: Sized;

    fn into_list(self, empty_valid: bool) -> ListOf
    where
        Self: Sized;
}

/// Create a token literal combinator reference.
pub fn tok(literal: &'static str) -> CombRef {
    Rc::new(TokenLit::new(literal))
}

/// Create a token class combinator reference.
pub fn tok_class(class: TokenClass) -> CombRef {
    Rc::new(ClassLit::new(class))
}
