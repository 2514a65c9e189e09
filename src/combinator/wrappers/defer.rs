use crate::combinator::{CombHelper, Defer};
use crate::types::GenType;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::fmt::Display;

impl Defer {
    /// Create a new [Defer] resolving `thunk` to its target combinator on first use.
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> Result<CombRef, GrammarError> + 'static,
    {
        Self {
            thunk: Box::new(thunk),
            resolved: OnceCell::new(),
            lock: Cell::new(false),
            helper: CombHelper::new("defer"),
        }
    }

    /// Resolve and memoise the target combinator.
    pub fn resolve(&self) -> Result<&CombRef, GrammarError> {
        self.resolved.get_or_try_init(|| (self.thunk)())
    }
}

impl Display for Defer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resolved.get() {
            Some(combinator) => write!(f, "<{}>", combinator),
            None => write!(f, "<defer>"),
        }
    }
}

impl ICombinator for Defer {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        if self.lock.get() {
            return Ok(None);
        }
        self.lock.set(true);
        let inferred = self.resolve().and_then(|target| target.infer_type());
        self.lock.set(false);
        inferred
    }

    fn needs_refcount(&self) -> bool {
        self.resolve()
            .map(|target| target.needs_refcount())
            .unwrap_or(true)
    }

    fn children(&self) -> Vec<CombRef> {
        // The deferred edge is the only cycle edge of the grammar graph; reporting no
        // children keeps every graph walk finite.
        Vec::new()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let target = self.resolve()?.clone();
        target.gen_code_or_fncall(ctx, pos_name, true)
    }
}
