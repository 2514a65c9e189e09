use crate::combinator::{ClassLit, CombHelper};
use crate::templates::TokCodeEnv;
use crate::types::GenType;
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator, TokenClass};
use std::fmt::Display;

impl ClassLit {
    /// Create a new [ClassLit] matching any token of the lexical `class`.
    pub fn new(class: TokenClass) -> Self {
        Self {
            class,
            helper: CombHelper::new("tok_class"),
        }
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }
}

impl Display for ClassLit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{:?}", self.class)
    }
}

impl ICombinator for ClassLit {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        Ok(Some(GenType::Token))
    }

    fn needs_refcount(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<CombRef> {
        Vec::new()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let kind_id = ctx.token_map().class_kind(self.class).ok_or_else(|| {
            GrammarError::new(
                "UnknownToken".into(),
                format!(
                    "Token class {:?} is not registered in the token kind registry.",
                    self.class
                ),
            )
        })?;

        let label = format!("{:?}", self.class);
        let pos = ctx.gen_name("tk_class_pos");
        let res = ctx.gen_name("tk_class_res");
        let code = ctx.templates().tokclass_code(&TokCodeEnv {
            pos_name,
            pos: &pos,
            res: &res,
            kind_id,
            label: &label,
        });
        Ok(Emitted {
            pos_var: pos.clone(),
            res_var: res.clone(),
            code,
            decls: vec![(pos, GenType::Pos), (res, GenType::Token)],
            args: Vec::new(),
        })
    }
}
