use crate::combinator::Defer;
use crate::context::UseCounts;
use crate::templates::ITemplates;
use crate::util::Log;
use crate::{CombRef, CompileCtx, GeneratedUnit, Grammar, GrammarError, TokenMap};
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

impl Grammar {
    pub fn new() -> Self {
        Self {
            rules: Rc::new(RefCell::new(Vec::new())),
            debug: OnceCell::new(),
        }
    }

    /// Set a log label to report rule compilation based on the level of [Log].
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(debugger)
            .map_err(|err| format!("Debugger {} is already set for this grammar.", err))
    }

    /// Reference the rule `name`, resolving lazily so rules may be declared in any order
    /// and reference each other recursively.
    pub fn rule(&self, name: &'static str) -> CombRef {
        let rules = Rc::clone(&self.rules);
        Rc::new(Defer::new(move || {
            rules
                .borrow()
                .iter()
                .find(|(rule_name, _)| *rule_name == name)
                .map(|(_, combinator)| combinator.clone())
                .ok_or_else(|| {
                    GrammarError::new(
                        "UnresolvedRule".into(),
                        format!("Rule {:?} is not defined in the grammar.", name),
                    )
                })
        }))
    }

    /// Add named rules, marking the top of every rule as a root combinator.
    pub fn add_rules(&self, rules: Vec<(&'static str, CombRef)>) -> Result<(), GrammarError> {
        for (name, combinator) in rules {
            if self
                .rules
                .borrow()
                .iter()
                .any(|(rule_name, _)| *rule_name == name)
            {
                return Err(GrammarError::new(
                    "DuplicateRule".into(),
                    format!("Rule {:?} is already defined in the grammar.", name),
                ));
            }
            combinator.helper().mark_rule(name)?;
            self.rules.borrow_mut().push((name, combinator));
        }
        Ok(())
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.borrow().iter().map(|(name, _)| *name).collect()
    }

    /// Compile every rule of the grammar into `ctx`, in declaration order.
    pub fn compile_into(&self, ctx: &mut CompileCtx) -> Result<(), GrammarError> {
        self.mark_shared(ctx);
        let rules = self.rules.borrow();
        for (name, rule) in rules.iter() {
            rule.compile(ctx)?;
            let fn_name = rule.helper().obtain_fn_name(ctx.names_mut());
            let result_type = rule.resolved_type()?;

            #[cfg(debug_assertions)]
            if let Some(log_label) = self.debug.get() {
                if log_label.order() >= Log::Default(()).order() {
                    println!("[{}] Compiled rule '{}' into {}", log_label, name, fn_name);
                }
            }

            ctx.map_rule(*name, fn_name, result_type);
        }
        Ok(())
    }

    /// Compile the grammar in a fresh context and render the three artefacts.
    pub fn generate(
        &self,
        token_map: Rc<TokenMap>,
        templates: Rc<dyn ITemplates>,
        header_name: &str,
        main_rule: Option<&str>,
    ) -> Result<GeneratedUnit, GrammarError> {
        let mut ctx = CompileCtx::new(token_map, templates);
        self.compile_into(&mut ctx)?;
        let header = ctx.header();
        let body = ctx.source(header_name);
        let interactive = match main_rule {
            Some(rule) => Some(ctx.interactive_main(header_name, rule)?),
            None => None,
        };
        Ok(GeneratedUnit {
            header,
            body,
            interactive,
        })
    }

    /// Write a textual summary of the rule set.
    pub fn build_grammar(&self) -> Result<String, std::fmt::Error> {
        let mut writer = String::new();
        for (name, rule) in self.rules.borrow().iter() {
            writeln!(writer, "{}", name)?;
            writeln!(writer, "{:>6} {}", ":", RuleBody(rule))?;
            writeln!(writer, "{:>6}", ";")?;
            writeln!(writer)?;
        }
        Ok(writer)
    }

    /// Count how often each combinator is referenced from the rule set; combinators seen
    /// more than once are compiled into their own function instead of being inlined twice.
    fn mark_shared(&self, ctx: &mut CompileCtx) {
        fn count(combinator: &CombRef, counts: &mut UseCounts) {
            let key = combinator.helper().key();
            let seen = counts.entry(key).or_insert(0);
            *seen += 1;
            if *seen == 1 {
                for child in combinator.children() {
                    count(&child, counts);
                }
            }
        }

        let mut counts = UseCounts::new();
        for (_, rule) in self.rules.borrow().iter() {
            count(rule, &mut counts);
        }
        for (key, uses) in counts {
            if uses > 1 {
                ctx.mark_shared(key);
            }
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Displays a rule body through its children instead of the rule name itself.
struct RuleBody<'r>(&'r CombRef);

impl<'r> std::fmt::Display for RuleBody<'r> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children = self.0.children();
        if children.is_empty() {
            return write!(f, "{}", self.0);
        }
        let separator = if self.0.as_alt().is_some() { " | " } else { " " };
        for (index, child) in children.iter().enumerate() {
            if index != 0 {
                write!(f, "{}", separator)?;
            }
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}
