use crate::combinator::{CombHelper, NullProd};
use crate::templates::NullCodeEnv;
use crate::types::GenType;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;

impl NullProd {
    pub fn new(typ: GenType) -> Self {
        Self {
            typ,
            helper: CombHelper::new("null"),
        }
    }
}

impl Display for NullProd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Null({})", self.typ)
    }
}

impl ICombinator for NullProd {
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
        if let GenType::Node(_) = &self.typ {
            self.typ.add_to_context(ctx, None)?;
        }
        let res = ctx.gen_name("null_res");
        let null = ctx.templates().null_expr(&self.typ);
        let code = ctx.templates().null_code(&NullCodeEnv {
            res: &res,
            null: &null,
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
