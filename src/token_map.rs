use crate::{GrammarError, TokenClass, TokenMap};
use std::collections::HashMap;

impl TokenMap {
    /// Create a registry from keyword or punctuation literals and lexical classes.
    /// ### Arguments
    /// * `literals` - Symbolic strings like `"with"` or `"=>"` with their kind ids.
    /// * `classes` - Lexical classes with their kind ids.
    pub fn new(
        literals: Vec<(&'static str, u16)>,
        classes: Vec<(TokenClass, u16)>,
    ) -> Result<Self, GrammarError> {
        let mut literal_map = HashMap::new();
        for (value, id) in literals {
            if literal_map.insert(value, id).is_some() {
                return Err(GrammarError::new(
                    "TokenRegistry".into(),
                    format!("Token literal {:?} is registered twice.", value),
                ));
            }
        }
        let mut class_map = HashMap::new();
        for (class, id) in classes {
            if class_map.insert(class, id).is_some() {
                return Err(GrammarError::new(
                    "TokenRegistry".into(),
                    format!("Token class {:?} is registered twice.", class),
                ));
            }
        }
        Ok(Self {
            literals: literal_map,
            classes: class_map,
        })
    }

    pub fn kind_of(&self, literal: &str) -> Option<u16> {
        self.literals.get(literal).copied()
    }

    pub fn class_kind(&self, class: TokenClass) -> Option<u16> {
        self.classes.get(&class).copied()
    }

    /// The default Ada registry covering the keywords and punctuation of the Ada 2012
    /// declaration grammar.
    pub fn ada() -> Self {
        const KEYWORDS: &[&str] = &[
            "abort", "abs", "abstract", "accept", "access", "aliased", "all", "and", "array",
            "at", "begin", "body", "case", "constant", "declare", "delay", "delta", "digits",
            "do", "else", "elsif", "end", "entry", "exception", "exit", "for", "function",
            "generic", "goto", "if", "in", "interface", "is", "limited", "loop", "mod", "new",
            "not", "null", "of", "or", "others", "out", "overriding", "package", "pragma",
            "private", "procedure", "protected", "raise", "range", "record", "rem", "renames",
            "requeue", "return", "reverse", "select", "separate", "some", "subtype",
            "synchronized", "tagged", "task", "terminate", "then", "type", "until", "use",
            "when", "while", "with", "xor",
        ];
        const PUNCTUATION: &[&str] = &[
            "=>", "..", "**", ":=", "/=", ">=", "<=", "<<", ">>", "<>", "(", ")", "+", "-",
            "*", "/", ".", ",", ";", ":", "'", "&", "|", "=", "<", ">",
        ];

        let mut literals = Vec::new();
        let mut next_id: u16 = 1;
        for value in KEYWORDS.iter().chain(PUNCTUATION.iter()) {
            literals.push((*value, next_id));
            next_id += 1;
        }
        let classes = vec![
            (TokenClass::Identifier, next_id),
            (TokenClass::Label, next_id + 1),
            (TokenClass::Number, next_id + 2),
            (TokenClass::Char, next_id + 3),
            (TokenClass::String, next_id + 4),
            (TokenClass::Termination, next_id + 5),
        ];

        match Self::new(literals, classes) {
            Ok(map) => map,
            Err(_) => panic!("Internal error"),
        }
    }
}
