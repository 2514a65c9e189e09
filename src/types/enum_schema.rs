use super::EnumSchema;
use crate::templates::EnumTypeEnv;
use crate::{CompileCtx, GrammarError};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl EnumSchema {
    /// Declare an enum type with the given ordered alternatives.
    pub fn new(name: &'static str, alternatives: Vec<&'static str>) -> Rc<Self> {
        Rc::new(Self {
            name,
            alternatives,
            suffix: None,
        })
    }

    /// Declare an enum type whose emitted alternative identifiers carry a suffix.
    pub fn with_suffix(
        name: &'static str,
        alternatives: Vec<&'static str>,
        suffix: &'static str,
    ) -> Rc<Self> {
        Rc::new(Self {
            name,
            alternatives,
            suffix: Some(suffix),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn alternatives(&self) -> &[&'static str] {
        &self.alternatives
    }

    pub fn has_alternative(&self, alternative: &str) -> bool {
        self.alternatives.iter().any(|alt| *alt == alternative)
    }

    /// Identifier of `alternative` in the emitted enum definition.
    ///
    /// The suffix keeps alternatives like `in` or `out` out of the target language keyword
    /// space; the display name stays suffix free.
    pub fn emitted_alt(&self, alternative: &str) -> String {
        match self.suffix {
            Some(suffix) => format!("{}_{}", alternative, suffix),
            None => alternative.to_string(),
        }
    }

    /// Emit the enum declaration and its display implementation once per context.
    pub fn add_to_context(&self, ctx: &mut CompileCtx) -> Result<(), GrammarError> {
        if !ctx.note_type(self.name) {
            return Ok(());
        }
        let templates = ctx.templates();
        let alternatives: Vec<(String, &'static str)> = self
            .alternatives
            .iter()
            .map(|alt| (self.emitted_alt(alt), *alt))
            .collect();
        let env = EnumTypeEnv {
            name: self.name,
            alternatives: &alternatives,
        };
        ctx.push_val_type_def(templates.enum_type_decl(&env));
        ctx.push_body(templates.enum_type_impl(&env));
        Ok(())
    }
}

impl Debug for EnumSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EnumSchema({})", self.name)
    }
}
