use crate::combinator::{CombHelper, Extract, Seq};
use crate::templates::{RowCodeEnv, RowSubmatch, RowTupleEnv, RowTypeEnv};
use crate::types::{GenType, RowId};
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl Seq {
    /// Create a new [Seq] matching `matchers` in series.
    pub fn new(matchers: Vec<CombRef>) -> Self {
        Self {
            matchers,
            row: RowId::new(),
            helper: CombHelper::new("row"),
        }
    }

    pub fn matchers(&self) -> &[CombRef] {
        &self.matchers
    }

    /// The non discarded components, in declaration order.
    pub fn kept_matchers(&self) -> Vec<CombRef> {
        self.matchers
            .iter()
            .filter(|matcher| !matcher.is_discard())
            .cloned()
            .collect()
    }

    /// Shorthand building an [Extract] of the `index`-th component.
    pub fn extract(self, index: usize) -> Extract {
        Extract::new(&Rc::new(self), index)
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }

    /// Lower the sequence, building the row tuple only when `build_tuple` is set. The
    /// returned `args` environment carries one entry per component so that extract and
    /// transform wrappers can reference sub results directly.
    pub(crate) fn emit_components(
        &self,
        ctx: &mut CompileCtx,
        pos_name: &str,
        build_tuple: bool,
    ) -> Result<Emitted, GrammarError> {
        let pos = ctx.gen_name("row_pos");
        let did_fail = ctx.gen_name("row_did_fail");
        let exit_label = ctx.gen_name("exit_row");

        let mut decls = vec![
            (pos.clone(), GenType::Pos),
            (did_fail.clone(), GenType::Bool),
        ];
        let mut submatches = Vec::with_capacity(self.matchers.len());
        let mut args: Vec<Option<String>> = Vec::with_capacity(self.matchers.len());
        let mut tuple_args: Vec<(String, bool)> = Vec::new();

        for matcher in &self.matchers {
            let emitted = matcher.gen_code_or_fncall(ctx, &pos, false)?;
            decls.extend(emitted.decls);
            if matcher.is_discard() {
                args.push(None);
                submatches.push(RowSubmatch {
                    code: emitted.code,
                    m_pos: emitted.pos_var,
                    m_res: None,
                });
            } else {
                args.push(Some(emitted.res_var.clone()));
                tuple_args.push((emitted.res_var.clone(), matcher.needs_refcount()));
                submatches.push(RowSubmatch {
                    code: emitted.code,
                    m_pos: emitted.pos_var,
                    m_res: Some(emitted.res_var),
                });
            }
        }

        let mut res_var = String::new();
        let mut row_type_name = None;
        if build_tuple {
            self.register_row_type(ctx)?;
            res_var = ctx.gen_name("row_res");
            decls.push((res_var.clone(), GenType::Row(self.row.clone())));
            row_type_name = self.row.name().map(str::to_string);
        }

        let templates = ctx.templates();
        let tuple = row_type_name.as_ref().map(|row_type| RowTupleEnv {
            res: &res_var,
            row_type,
            args: &tuple_args,
        });
        let code = templates.row_code(&RowCodeEnv {
            pos_name,
            pos: &pos,
            did_fail: &did_fail,
            exit_label: &exit_label,
            submatches: &submatches,
            tuple,
        });

        Ok(Emitted {
            pos_var: pos,
            res_var,
            code,
            decls,
            args,
        })
    }

    fn register_row_type(&self, ctx: &mut CompileCtx) -> Result<(), GrammarError> {
        if self.row.name().is_none() {
            self.row.assign(ctx.gen_name("Row"));
        }
        let name = match self.row.name() {
            Some(assigned) => assigned.to_string(),
            None => panic!("Internal error"),
        };
        if !ctx.note_type(&name) {
            return Ok(());
        }

        let mut components = Vec::new();
        for matcher in self.kept_matchers() {
            components.push(matcher.resolved_type()?);
        }
        let templates = ctx.templates();
        let env = RowTypeEnv {
            name: &name,
            components: &components,
        };
        ctx.push_type_decl(templates.row_type_decl(&name));
        // Row definitions precede any type definition which embeds them.
        ctx.prepend_type_def(templates.row_type_def(&env));
        ctx.push_body(templates.row_type_impl(&env));
        Ok(())
    }
}

impl Display for Seq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.helper.rule_name() {
            Some(name) => write!(f, "{}", name),
            None => {
                write!(f, "(")?;
                for (index, matcher) in self.matchers.iter().enumerate() {
                    if index != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", matcher)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl ICombinator for Seq {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        Ok(Some(GenType::Row(self.row.clone())))
    }

    fn needs_refcount(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<CombRef> {
        self.matchers.clone()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        self.emit_components(ctx, pos_name, true)
    }

    fn as_seq(&self) -> Option<&Seq> {
        Some(self)
    }
}
