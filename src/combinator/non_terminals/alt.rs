use crate::combinator::{Alt, CombHelper};
use crate::templates::{OrBranch, OrCodeEnv};
use crate::types::{common_ancestor, GenType, NodeSchema};
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;

impl Alt {
    /// Create a new [Alt] trying `matchers` in declaration order.
    ///
    /// A matcher which is itself an alternation contributes its branches in place, so
    /// nesting order never changes the branch sequence.
    pub fn new(matchers: Vec<CombRef>) -> Self {
        let mut flattened = Vec::with_capacity(matchers.len());
        for matcher in matchers {
            match matcher.as_alt() {
                Some(alt) => flattened.extend(alt.matchers.iter().cloned()),
                None => flattened.push(matcher),
            }
        }
        Self {
            matchers: flattened,
            cached_type: OnceCell::new(),
            lock: Cell::new(false),
            helper: CombHelper::new("or"),
        }
    }

    pub fn branches(&self) -> &[CombRef] {
        &self.matchers
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }

    fn infer_branches(&self) -> Result<Option<GenType>, GrammarError> {
        let mut types: Vec<GenType> = Vec::new();
        for matcher in &self.matchers {
            // A branch locked in self recursion contributes no type.
            if let Some(ty) = matcher.infer_type()? {
                if !types.contains(&ty) {
                    types.push(ty);
                }
            }
        }

        if types.is_empty() {
            return Ok(None);
        }

        if types
            .iter()
            .all(|ty| matches!(ty, GenType::Node(_) | GenType::AstRoot))
        {
            if types.iter().any(|ty| matches!(ty, GenType::AstRoot)) {
                return Ok(Some(GenType::AstRoot));
            }
            let schemas: Vec<Rc<NodeSchema>> = types
                .iter()
                .filter_map(|ty| match ty {
                    GenType::Node(schema) => Some(schema.clone()),
                    _ => None,
                })
                .collect();
            return Ok(Some(match common_ancestor(&schemas) {
                Some(ancestor) => GenType::Node(ancestor),
                None => GenType::AstRoot,
            }));
        }

        if types.len() == 1 {
            return Ok(types.pop());
        }

        Err(GrammarError::new(
            "TypeInference".into(),
            format!(
                "Alternation branches of {} have incompatible types {:?}.",
                self, types
            ),
        ))
    }
}

impl Display for Alt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.helper.rule_name() {
            Some(name) => write!(f, "{}", name),
            None => {
                write!(f, "(")?;
                for (index, matcher) in self.matchers.iter().enumerate() {
                    if index != 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", matcher)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl ICombinator for Alt {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        if let Some(cached) = self.cached_type.get() {
            return Ok(Some(cached.clone()));
        }
        if self.lock.get() {
            return Ok(None);
        }
        self.lock.set(true);
        let inferred = self.infer_branches();
        self.lock.set(false);
        match inferred? {
            Some(ty) => {
                let _ = self.cached_type.set(ty.clone());
                Ok(Some(ty))
            }
            None => Ok(None),
        }
    }

    fn needs_refcount(&self) -> bool {
        debug_assert!(
            self.matchers
                .iter()
                .all(|m| m.needs_refcount() == self.matchers[0].needs_refcount()),
            "Alternation branches disagree on reference counting"
        );
        self.matchers
            .first()
            .map_or(false, |matcher| matcher.needs_refcount())
    }

    fn children(&self) -> Vec<CombRef> {
        self.matchers.clone()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let result_type = self.resolved_type()?;
        let pos = ctx.gen_name("or_pos");
        let res = ctx.gen_name("or_res");
        let exit_label = ctx.gen_name("exit_or");

        let mut decls = vec![
            (pos.clone(), GenType::Pos),
            (res.clone(), result_type.clone()),
        ];
        let mut branches = Vec::with_capacity(self.matchers.len());
        for matcher in &self.matchers {
            let emitted = matcher.gen_code_or_fncall(ctx, pos_name, false)?;
            decls.extend(emitted.decls);
            branches.push(OrBranch {
                code: emitted.code,
                b_pos: emitted.pos_var,
                b_res: emitted.res_var,
            });
        }

        let templates = ctx.templates();
        let null = templates.null_expr(&result_type);
        let code = templates.or_code(&OrCodeEnv {
            pos: &pos,
            res: &res,
            exit_label: &exit_label,
            null: &null,
            branches: &branches,
        });
        Ok(Emitted {
            pos_var: pos,
            res_var: res,
            code,
            decls,
            args: Vec::new(),
        })
    }

    fn as_alt(&self) -> Option<&Alt> {
        Some(self)
    }
}
