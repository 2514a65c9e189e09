use crate::combinator::{CombHelper, Discard};
use crate::types::GenType;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;

impl Discard {
    /// Create a new [Discard] suppressing the result of `parser` from the enclosing row.
    pub fn new(parser: &CombRef) -> Self {
        Self {
            parser: parser.clone(),
            helper: CombHelper::new("discard"),
        }
    }
}

impl Display for Discard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_({})", self.parser)
    }
}

impl ICombinator for Discard {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        self.parser.infer_type()
    }

    fn needs_refcount(&self) -> bool {
        self.parser.needs_refcount()
    }

    fn children(&self) -> Vec<CombRef> {
        vec![self.parser.clone()]
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        self.parser.gen_code_or_fncall(ctx, pos_name, false)
    }

    fn is_discard(&self) -> bool {
        true
    }
}
