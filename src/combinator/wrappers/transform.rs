use crate::combinator::{CombHelper, Transform};
use crate::templates::TransformCodeEnv;
use crate::types::{GenType, NodeSchema};
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl Transform {
    /// Create a new [Transform] constructing an instance of `schema` from the kept
    /// components of `combinator`.
    pub fn new(combinator: &CombRef, schema: &Rc<NodeSchema>) -> Self {
        Self {
            combinator: combinator.clone(),
            schema: schema.clone(),
            helper: CombHelper::new("transform"),
        }
    }

    pub fn schema(&self) -> &Rc<NodeSchema> {
        &self.schema
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.helper.rule_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{} ^ {}", self.combinator, self.schema.name()),
        }
    }
}

impl ICombinator for Transform {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        Ok(Some(GenType::Node(self.schema.clone())))
    }

    fn needs_refcount(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<CombRef> {
        vec![self.combinator.clone()]
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        self.schema.add_to_context(ctx, Some(&self.combinator))?;

        let (inner, args) = match self.combinator.as_seq() {
            Some(seq) => {
                let emitted = seq.emit_components(ctx, pos_name, false)?;
                let args = emitted.kept_args();
                (emitted, args)
            }
            None => {
                let emitted = self.combinator.gen_code_or_fncall(ctx, pos_name, false)?;
                let args = vec![emitted.res_var.clone()];
                (emitted, args)
            }
        };

        let res = ctx.gen_name("transform_res");
        let node_type = GenType::Node(self.schema.clone());
        let templates = ctx.templates();
        let null = templates.null_expr(&node_type);
        let code = templates.transform_code(&TransformCodeEnv {
            code: &inner.code,
            c_pos: &inner.pos_var,
            res: &res,
            class_name: self.schema.name(),
            args: &args,
            null: &null,
        });
        ctx.add_diag_type(self.schema.clone());

        let mut decls = inner.decls;
        decls.push((res.clone(), node_type));
        Ok(Emitted {
            pos_var: inner.pos_var,
            res_var: res,
            code,
            decls,
            args: Vec::new(),
        })
    }
}
