use crate::combinator::{CombHelper, TokenLit};
use crate::templates::TokCodeEnv;
use crate::types::GenType;
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;

impl TokenLit {
    /// Create a new [TokenLit] matching the token registered for `literal`.
    pub fn new(literal: &'static str) -> Self {
        Self {
            literal,
            helper: CombHelper::new("tok"),
        }
    }

    pub fn literal(&self) -> &'static str {
        self.literal
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }
}

impl Display for TokenLit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.literal)
    }
}

impl ICombinator for TokenLit {
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
        let kind_id = ctx.token_map().kind_of(self.literal).ok_or_else(|| {
            GrammarError::new(
                "UnknownToken".into(),
                format!(
                    "Token literal {:?} is not registered in the token kind registry.",
                    self.literal
                ),
            )
        })?;

        let pos = ctx.gen_name("tk_pos");
        let res = ctx.gen_name("tk_res");
        let code = ctx.templates().tok_code(&TokCodeEnv {
            pos_name,
            pos: &pos,
            res: &res,
            kind_id,
            label: self.literal,
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
