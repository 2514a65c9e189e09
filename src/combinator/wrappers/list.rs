use crate::combinator::{CombHelper, ListOf};
use crate::templates::{ListCodeEnv, ListFoldEnv};
use crate::types::{common_ancestor, GenType, NodeSchema};
use crate::util::Log;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl ListOf {
    /// Create a new [ListOf] matching repetitions of `parser`, optionally separated by
    /// `separator`. With `empty_valid` the empty token prefix yields an empty list.
    pub fn new(parser: &CombRef, separator: Option<&CombRef>, empty_valid: bool) -> Self {
        Self {
            parser: parser.clone(),
            separator: separator.cloned(),
            empty_valid,
            fold: None,
            helper: CombHelper::new("list"),
        }
    }

    /// Create a list which folds its elements through the binary constructor of `fold`
    /// from the right instead of building a flat list. At least one element is required.
    pub fn fold_right(
        parser: &CombRef,
        separator: Option<&CombRef>,
        fold: &Rc<NodeSchema>,
    ) -> Self {
        Self {
            parser: parser.clone(),
            separator: separator.cloned(),
            empty_valid: false,
            fold: Some(fold.clone()),
            helper: CombHelper::new("list"),
        }
    }

    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.helper.assign_debugger(debugger)
    }
}

impl Display for ListOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.helper.rule_name() {
            Some(name) => write!(f, "{}", name),
            None => match &self.separator {
                Some(separator) => write!(f, "List({}, {})", self.parser, separator),
                None => write!(f, "List({})", self.parser),
            },
        }
    }
}

impl ICombinator for ListOf {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        let element = match self.parser.infer_type()? {
            Some(ty) => ty,
            None => return Ok(None),
        };
        match &self.fold {
            None => Ok(Some(GenType::List(Box::new(element)))),
            Some(fold) => match element {
                GenType::Node(schema) => {
                    Ok(Some(match common_ancestor(&[schema, fold.clone()]) {
                        Some(ancestor) => GenType::Node(ancestor),
                        None => GenType::AstRoot,
                    }))
                }
                GenType::AstRoot => Ok(Some(GenType::AstRoot)),
                other => Err(GrammarError::new(
                    "TypeInference".into(),
                    format!(
                        "Right reducing list of {} needs an AST class element, found {}.",
                        self, other
                    ),
                )),
            },
        }
    }

    fn needs_refcount(&self) -> bool {
        self.parser.needs_refcount()
    }

    fn children(&self) -> Vec<CombRef> {
        let mut children = vec![self.parser.clone()];
        if let Some(separator) = &self.separator {
            children.push(separator.clone());
        }
        children
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let result_type = self.resolved_type()?;
        let element_type = self.parser.resolved_type()?;

        let pos = ctx.gen_name("lst_pos");
        let res = ctx.gen_name("lst_res");
        let cpos = ctx.gen_name("lst_cpos");

        let parser_emitted = self.parser.gen_code_or_fncall(ctx, &cpos, false)?;
        let separator_emitted = match &self.separator {
            Some(separator) => Some(separator.gen_code_or_fncall(ctx, &cpos, false)?),
            None => None,
        };

        let mut decls = vec![
            (pos.clone(), GenType::Pos),
            (res.clone(), result_type.clone()),
            (cpos.clone(), GenType::Pos),
        ];
        decls.extend(parser_emitted.decls);
        if let Some(separator) = &separator_emitted {
            decls.extend(separator.decls.clone());
        }

        let fold_vars = match &self.fold {
            Some(fold) => {
                fold.register_with_types(ctx, &[result_type.clone(), result_type.clone()])?;
                let vec_var = ctx.gen_name("lst_tmp");
                let idx_var = ctx.gen_name("lst_i");
                decls.push((
                    vec_var.clone(),
                    GenType::List(Box::new(element_type.clone())),
                ));
                Some((fold.name(), vec_var, idx_var))
            }
            None => None,
        };

        let templates = ctx.templates();
        ctx.add_generic_vector(templates.decl_type(&element_type));

        let code = templates.list_code(&ListCodeEnv {
            pos_name,
            pos: &pos,
            res: &res,
            cpos: &cpos,
            element_type: &element_type,
            parser_code: &parser_emitted.code,
            p_pos: &parser_emitted.pos_var,
            p_res: &parser_emitted.res_var,
            sep_code: separator_emitted.as_ref().map(|e| e.code.as_str()),
            sep_pos: separator_emitted.as_ref().map(|e| e.pos_var.as_str()),
            empty_valid: self.empty_valid,
            fold: fold_vars
                .as_ref()
                .map(|(class_name, vec_var, idx_var)| ListFoldEnv {
                    class_name,
                    vec_var,
                    idx_var,
                }),
        });
        Ok(Emitted {
            pos_var: pos,
            res_var: res,
            code,
            decls,
            args: Vec::new(),
        })
    }
}
