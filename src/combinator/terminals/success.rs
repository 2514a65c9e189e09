use crate::combinator::{CombHelper, SuccessProd};
use crate::templates::SuccessCodeEnv;
use crate::types::GenType;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;

impl SuccessProd {
    pub fn new(typ: GenType) -> Self {
        Self {
            typ,
            helper: CombHelper::new("success"),
        }
    }
}

impl Display for SuccessProd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Success({})", self.typ)
    }
}

impl ICombinator for SuccessProd {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        Ok(Some(self.typ.clone()))
    }

    fn needs_refcount(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<CombRef> {
        Vec::new()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        self.typ.add_to_context(ctx, None)?;
        let res = ctx.gen_name("success_res");
        let code = ctx.templates().success_code(&SuccessCodeEnv {
            res: &res,
            type_name: &self.typ.name(),
        });
        Ok(Emitted {
            pos_var: pos_name.to_string(),
            res_var: res.clone(),
            code,
            decls: vec![(res, self.typ.clone())],
            args: Vec::new(),
        })
    }
}
