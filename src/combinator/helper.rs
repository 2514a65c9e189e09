use super::CombHelper;
use crate::util::Log;
use crate::{GrammarError, NameGenerator};
use once_cell::unsync::OnceCell;
use std::cell::Cell;

impl CombHelper {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            rule_name: OnceCell::new(),
            root: Cell::new(false),
            fn_name: OnceCell::new(),
            debugger: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Stable identity of the combinator within one process, used by the reference count
    /// pre pass of the grammar.
    pub fn key(&self) -> usize {
        self as *const CombHelper as usize
    }

    pub fn rule_name(&self) -> Option<&'static str> {
        self.rule_name.get().copied()
    }

    pub fn is_root(&self) -> bool {
        self.root.get()
    }

    /// Assign the rule name and mark the combinator as a root of the grammar.
    pub(crate) fn mark_rule(&self, name: &'static str) -> Result<(), GrammarError> {
        self.rule_name.set(name).map_err(|rejected| {
            GrammarError::new(
                "DuplicateRule".into(),
                format!(
                    "Combinator of rule {:?} cannot be reassigned to rule {:?}.",
                    self.rule_name.get().copied().unwrap_or(""),
                    rejected
                ),
            )
        })?;
        self.root.set(true);
        Ok(())
    }

    pub fn fn_name(&self) -> Option<&str> {
        self.fn_name.get().map(|name| name.as_str())
    }

    /// Generated parse function name, created on first use from the context owned name
    /// generator. Rule combinators carry their rule name as prefix.
    pub fn obtain_fn_name(&self, names: &mut NameGenerator) -> String {
        if let Some(name) = self.fn_name.get() {
            return name.clone();
        }
        let prefix = match self.rule_name.get() {
            Some(rule) => format!("{}_{}_parse", rule, self.kind),
            None => format!("{}_parse", self.kind),
        };
        let name = names.gen(&prefix);
        let _ = self.fn_name.set(name.clone());
        name
    }

    /// Set a log label to debug the combinator based on the level of [Log].
    pub fn assign_debugger(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger
            .set(debugger)
            .map_err(|err| format!("Debugger {} is already set for this combinator.", err))
    }

    pub fn get_debugger(&self) -> Option<&Log<&'static str>> {
        self.debugger.get()
    }

    pub fn log_emission(&self, label: &str) {
        #[cfg(debug_assertions)]
        if let Some(log_label) = self.debugger.get() {
            if log_label.order() >= Log::Verbose(()).order() {
                println!("[{}] Emitting '{}'", log_label, label);
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = label;
    }
}
