use crate::combinator::{CombHelper, TagEnum};
use crate::templates::EnumCodeEnv;
use crate::types::{EnumSchema, GenType};
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl TagEnum {
    /// Create a new [TagEnum] yielding `alternative` of `schema` when `matcher` succeeds.
    /// Without a matcher the alternative is produced on empty input.
    pub fn new(
        matcher: Option<&CombRef>,
        schema: &Rc<EnumSchema>,
        alternative: &'static str,
    ) -> Result<Self, GrammarError> {
        if !schema.has_alternative(alternative) {
            return Err(GrammarError::new(
                "EnumAlternative".into(),
                format!(
                    "{:?} is not an alternative of enum type {}.",
                    alternative,
                    schema.name()
                ),
            ));
        }
        Ok(Self {
            matcher: matcher.cloned(),
            schema: schema.clone(),
            alternative,
            helper: CombHelper::new("enum"),
        })
    }
}

impl Display for TagEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.matcher {
            Some(matcher) => write!(
                f,
                "Enum({}, {}.{})",
                matcher,
                self.schema.name(),
                self.alternative
            ),
            None => write!(f, "Enum({}.{})", self.schema.name(), self.alternative),
        }
    }
}

impl ICombinator for TagEnum {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        Ok(Some(GenType::Enum(self.schema.clone())))
    }

    fn needs_refcount(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<CombRef> {
        self.matcher.iter().cloned().collect()
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        self.schema.add_to_context(ctx)?;

        let res = ctx.gen_name("enum_res");
        let emitted_alt = self.schema.emitted_alt(self.alternative);
        let enum_type = GenType::Enum(self.schema.clone());

        match &self.matcher {
            Some(matcher) => {
                // The matched value itself is dropped; only the tag survives.
                let inner = match matcher.as_seq() {
                    Some(seq) => seq.emit_components(ctx, pos_name, false)?,
                    None => matcher.gen_code_or_fncall(ctx, pos_name, false)?,
                };
                let code = ctx.templates().enum_code(&EnumCodeEnv {
                    code: Some(&inner.code),
                    c_pos: &inner.pos_var,
                    res: &res,
                    enum_name: self.schema.name(),
                    alternative: &emitted_alt,
                });
                let mut decls = inner.decls;
                decls.push((res.clone(), enum_type));
                Ok(Emitted {
                    pos_var: inner.pos_var,
                    res_var: res,
                    code,
                    decls,
                    args: Vec::new(),
                })
            }
            None => {
                let code = ctx.templates().enum_code(&EnumCodeEnv {
                    code: None,
                    c_pos: pos_name,
                    res: &res,
                    enum_name: self.schema.name(),
                    alternative: &emitted_alt,
                });
                Ok(Emitted {
                    pos_var: pos_name.to_string(),
                    res_var: res.clone(),
                    code,
                    decls: vec![(res, enum_type)],
                    args: Vec::new(),
                })
            }
        }
    }
}
