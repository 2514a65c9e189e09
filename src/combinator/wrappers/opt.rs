use crate::combinator::{CombHelper, Extract, Opt, Seq};
use crate::templates::OptCodeEnv;
use crate::types::GenType;
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl Opt {
    /// Create a new [Opt] trying `matcher` and yielding the null expression of its type
    /// at the original position on failure.
    pub fn new(matcher: &CombRef) -> Self {
        Self {
            matcher: matcher.clone(),
            booleanize: false,
            helper: CombHelper::new("opt"),
        }
    }

    /// Create an [Opt] over a sequence of matchers.
    pub fn row(matchers: Vec<CombRef>) -> Self {
        Self {
            matcher: Rc::new(Seq::new(matchers)),
            booleanize: false,
            helper: CombHelper::new("opt"),
        }
    }

    /// Create an [Opt] yielding the `index`-th component of `seq`.
    pub fn extracting(seq: &Rc<Seq>, index: usize) -> Self {
        Self {
            matcher: Rc::new(Extract::new(seq, index)),
            booleanize: false,
            helper: CombHelper::new("opt"),
        }
    }

    /// Yield `true` on success and `false` on failure instead of the matcher result.
    pub fn as_bool(mut self) -> Self {
        self.booleanize = true;
        self
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }
}

impl Display for Opt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.helper.rule_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}?", self.matcher),
        }
    }
}

impl ICombinator for Opt {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        if self.booleanize {
            return Ok(Some(GenType::Bool));
        }
        self.matcher.infer_type()
    }

    fn needs_refcount(&self) -> bool {
        if self.booleanize {
            return false;
        }
        self.matcher.needs_refcount()
    }

    fn children(&self) -> Vec<CombRef> {
        vec![self.matcher.clone()]
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let emitted = self.matcher.gen_code_or_fncall(ctx, pos_name, false)?;
        let matcher_type = self.matcher.resolved_type()?;
        let null = ctx.templates().null_expr(&matcher_type);

        let mut decls = emitted.decls;
        let bool_res = if self.booleanize {
            let bool_res = ctx.gen_name("opt_bool_res");
            decls.push((bool_res.clone(), GenType::Bool));
            Some(bool_res)
        } else {
            None
        };

        let code = ctx.templates().opt_code(&OptCodeEnv {
            pos_name,
            code: &emitted.code,
            m_pos: &emitted.pos_var,
            m_res: &emitted.res_var,
            null: &null,
            bool_res: bool_res.as_deref(),
        });
        Ok(Emitted {
            pos_var: emitted.pos_var,
            res_var: bool_res.unwrap_or(emitted.res_var),
            code,
            decls,
            args: Vec::new(),
        })
    }
}
