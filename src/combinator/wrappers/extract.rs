use crate::combinator::{CombHelper, Extract, Seq};
use crate::types::GenType;
use crate::{CombRef, CompileCtx, Emitted, GrammarError, ICombinator};
use std::fmt::Display;
use std::rc::Rc;

impl Extract {
    /// Create a new [Extract] yielding the `index`-th component of `seq`, counted over
    /// all components in declaration order.
    pub fn new(seq: &Rc<Seq>, index: usize) -> Self {
        Self {
            seq: seq.clone(),
            index,
            helper: CombHelper::new("extract"),
        }
    }
}

impl Display for Extract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} >> {}", self.seq, self.index)
    }
}

impl ICombinator for Extract {
    fn infer_type(&self) -> Result<Option<GenType>, GrammarError> {
        match self.seq.matchers().get(self.index) {
            Some(matcher) => matcher.infer_type(),
            None => Err(GrammarError::new(
                "ExtractIndex".into(),
                format!(
                    "Component index {} is out of bounds for a sequence of {} components.",
                    self.index,
                    self.seq.matchers().len()
                ),
            )),
        }
    }

    fn needs_refcount(&self) -> bool {
        self.seq.needs_refcount()
    }

    fn children(&self) -> Vec<CombRef> {
        vec![self.seq.clone()]
    }

    fn helper(&self) -> &CombHelper {
        &self.helper
    }

    fn emit(&self, ctx: &mut CompileCtx, pos_name: &str) -> Result<Emitted, GrammarError> {
        let emitted = self.seq.emit_components(ctx, pos_name, false)?;
        let res_var = match emitted.args.get(self.index) {
            Some(Some(component)) => component.clone(),
            Some(None) => {
                return Err(GrammarError::new(
                    "ExtractIndex".into(),
                    format!(
                        "Component {} of {} is discarded and cannot be extracted.",
                        self.index, self.seq
                    ),
                ))
            }
            None => {
                return Err(GrammarError::new(
                    "ExtractIndex".into(),
                    format!(
                        "Component index {} is out of bounds for a sequence of {} components.",
                        self.index,
                        self.seq.matchers().len()
                    ),
                ))
            }
        };
        Ok(Emitted {
            pos_var: emitted.pos_var,
            res_var,
            code: emitted.code,
            decls: emitted.decls,
            args: Vec::new(),
        })
    }
}
