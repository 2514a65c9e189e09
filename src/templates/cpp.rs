use super::{
    AstNodeDefEnv, AstNodeImplEnv, EnumCodeEnv, EnumTypeEnv, FnCallEnv, FnCodeEnv, ITemplates,
    InteractiveMainEnv, ListCodeEnv, MainBodyEnv, MainHeaderEnv, NullCodeEnv, OptCodeEnv,
    OrCodeEnv, RowCodeEnv, RowTypeEnv, SuccessCodeEnv, TokCodeEnv, TransformCodeEnv,
};
use crate::types::GenType;
use crate::util::{c_repr, indent};
use std::fmt::Write;

/// The C++ template set of the reference emission backend.
///
/// Emitted parse functions have the shape
/// `long f(Lexer* lex, long pos, T* out_res)` returning the new token index, with `-1` as
/// the failure sentinel. The runtime contract (`Lexer`, `Token`, `kind_at`, `inc_ref`,
/// `note_failure`, the `ASTNode` root) is expected from the embedding runtime header.
pub struct CppTemplates;

impl ITemplates for CppTemplates {
    fn decl_type(&self, ty: &GenType) -> String {
        match ty {
            GenType::Pos => "long".into(),
            GenType::Bool => "bool".into(),
            GenType::Token => "Token".into(),
            GenType::AstRoot => "ASTNode*".into(),
            GenType::Node(schema) => format!("{}*", schema.name()),
            GenType::Enum(schema) => schema.name().into(),
            GenType::Row(row) => format!("{}*", row.name().unwrap_or("Row")),
            GenType::List(element) => format!("{}*", self.list_type(element)),
        }
    }

    fn null_expr(&self, ty: &GenType) -> String {
        match ty {
            GenType::Pos => "-1".into(),
            GenType::Bool => "false".into(),
            GenType::Token => "no_token()".into(),
            GenType::AstRoot | GenType::Node(_) | GenType::Row(_) | GenType::List(_) => {
                "nullptr".into()
            }
            GenType::Enum(schema) => format!("{}::uninitialized", schema.name()),
        }
    }

    fn tok_code(&self, env: &TokCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(
            code,
            "// token {}\nif (kind_at(lex, {}) == {}) {{",
            c_repr(env.label),
            env.pos_name,
            env.kind_id
        );
        let _ = writeln!(code, "    {} = token_at(lex, {});", env.res, env.pos_name);
        let _ = writeln!(code, "    {} = {} + 1;", env.pos, env.pos_name);
        let _ = writeln!(code, "}} else {{");
        let _ = writeln!(code, "    note_failure(lex, {});", env.pos_name);
        let _ = writeln!(code, "    {} = -1;", env.pos);
        let _ = writeln!(code, "    {} = no_token();", env.res);
        code.push_str("}");
        code
    }

    fn tokclass_code(&self, env: &TokCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(
            code,
            "// token class {}\nif (kind_at(lex, {}) == {}) {{",
            env.label, env.pos_name, env.kind_id
        );
        let _ = writeln!(code, "    {} = token_at(lex, {});", env.res, env.pos_name);
        let _ = writeln!(code, "    {} = {} + 1;", env.pos, env.pos_name);
        let _ = writeln!(code, "}} else {{");
        let _ = writeln!(code, "    note_failure(lex, {});", env.pos_name);
        let _ = writeln!(code, "    {} = -1;", env.pos);
        let _ = writeln!(code, "    {} = no_token();", env.res);
        code.push_str("}");
        code
    }

    fn row_code(&self, env: &RowCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(code, "{} = {};", env.pos, env.pos_name);
        let _ = writeln!(code, "{} = false;", env.did_fail);
        for submatch in env.submatches {
            let _ = writeln!(code, "{}", submatch.code);
            let _ = writeln!(code, "if ({} == -1) {{", submatch.m_pos);
            let _ = writeln!(code, "    {} = true;", env.did_fail);
            let _ = writeln!(code, "    {} = -1;", env.pos);
            let _ = writeln!(code, "    goto {};", env.exit_label);
            let _ = writeln!(code, "}}");
            let _ = writeln!(code, "{} = {};", env.pos, submatch.m_pos);
        }
        if let Some(tuple) = &env.tuple {
            for (arg, needs_ref) in tuple.args {
                if *needs_ref {
                    let _ = writeln!(code, "inc_ref({});", arg);
                }
            }
            let args: Vec<&str> = tuple.args.iter().map(|(arg, _)| arg.as_str()).collect();
            let _ = writeln!(
                code,
                "{} = new {}({});",
                tuple.res,
                tuple.row_type,
                args.join(", ")
            );
        }
        let _ = write!(code, "{}:;", env.exit_label);
        code
    }

    fn or_code(&self, env: &OrCodeEnv) -> String {
        let mut code = String::new();
        for branch in env.branches {
            let _ = writeln!(code, "{}", branch.code);
            let _ = writeln!(code, "if ({} != -1) {{", branch.b_pos);
            let _ = writeln!(code, "    {} = {};", env.pos, branch.b_pos);
            let _ = writeln!(code, "    {} = {};", env.res, branch.b_res);
            let _ = writeln!(code, "    goto {};", env.exit_label);
            let _ = writeln!(code, "}}");
        }
        let _ = writeln!(code, "{} = -1;", env.pos);
        let _ = writeln!(code, "{} = {};", env.res, env.null);
        let _ = write!(code, "{}:;", env.exit_label);
        code
    }

    fn opt_code(&self, env: &OptCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(code, "{}", env.code);
        let _ = writeln!(code, "if ({} == -1) {{", env.m_pos);
        if let Some(bool_res) = env.bool_res {
            let _ = writeln!(code, "    {} = false;", bool_res);
        }
        let _ = writeln!(code, "    {} = {};", env.m_res, env.null);
        let _ = writeln!(code, "    {} = {};", env.m_pos, env.pos_name);
        if let Some(bool_res) = env.bool_res {
            let _ = writeln!(code, "}} else {{");
            let _ = writeln!(code, "    {} = true;", bool_res);
        }
        code.push_str("}");
        code
    }

    fn list_code(&self, env: &ListCodeEnv) -> String {
        let element = self.decl_type(env.element_type);
        let collector = match &env.fold {
            Some(fold) => fold.vec_var,
            None => env.res,
        };
        let mut code = String::new();
        let _ = writeln!(
            code,
            "{} = new std::vector<{}>();",
            collector, element
        );
        let _ = writeln!(code, "{} = {};", env.cpos, env.pos_name);
        let _ = writeln!(code, "while (true) {{");
        let _ = writeln!(code, "{}", indent(env.parser_code, 4));
        let _ = writeln!(code, "    if ({} == -1) break;", env.p_pos);
        let _ = writeln!(code, "    {} = {};", env.cpos, env.p_pos);
        let _ = writeln!(code, "    {}->push_back({});", collector, env.p_res);
        if let (Some(sep_code), Some(sep_pos)) = (env.sep_code, env.sep_pos) {
            let _ = writeln!(code, "{}", indent(sep_code, 4));
            let _ = writeln!(code, "    if ({} == -1) break;", sep_pos);
            let _ = writeln!(code, "    {} = {};", env.cpos, sep_pos);
        }
        let _ = writeln!(code, "}}");
        match &env.fold {
            Some(fold) => {
                // Right reducing fold through the binary constructor.
                let _ = writeln!(code, "if ({}->empty()) {{", fold.vec_var);
                let _ = writeln!(code, "    {} = -1;", env.pos);
                let _ = writeln!(code, "    {} = nullptr;", env.res);
                let _ = writeln!(code, "}} else {{");
                let _ = writeln!(
                    code,
                    "    {} = (*{})[{}->size() - 1];",
                    env.res, fold.vec_var, fold.vec_var
                );
                let _ = writeln!(
                    code,
                    "    for (long {i} = (long){v}->size() - 2; {i} >= 0; {i}--) {{",
                    i = fold.idx_var,
                    v = fold.vec_var
                );
                let _ = writeln!(
                    code,
                    "        {} = new {}((*{})[{}], {});",
                    env.res, fold.class_name, fold.vec_var, fold.idx_var, env.res
                );
                let _ = writeln!(code, "    }}");
                let _ = writeln!(code, "    {} = {};", env.pos, env.cpos);
                code.push_str("}");
            }
            None => {
                if env.empty_valid {
                    let _ = write!(code, "{} = {};", env.pos, env.cpos);
                } else {
                    let _ = writeln!(code, "if ({}->empty()) {{", env.res);
                    let _ = writeln!(code, "    {} = -1;", env.pos);
                    let _ = writeln!(code, "}} else {{");
                    let _ = writeln!(code, "    {} = {};", env.pos, env.cpos);
                    code.push_str("}");
                }
            }
        }
        code
    }

    fn transform_code(&self, env: &TransformCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(code, "{}", env.code);
        let _ = writeln!(code, "if ({} != -1) {{", env.c_pos);
        let _ = writeln!(
            code,
            "    {} = new {}({});",
            env.res,
            env.class_name,
            env.args.join(", ")
        );
        let _ = writeln!(code, "}} else {{");
        let _ = writeln!(code, "    {} = {};", env.res, env.null);
        code.push_str("}");
        code
    }

    fn enum_code(&self, env: &EnumCodeEnv) -> String {
        match env.code {
            Some(inner) => {
                let mut code = String::new();
                let _ = writeln!(code, "{}", inner);
                let _ = writeln!(code, "if ({} != -1) {{", env.c_pos);
                let _ = writeln!(
                    code,
                    "    {} = {}::{};",
                    env.res, env.enum_name, env.alternative
                );
                let _ = writeln!(code, "}} else {{");
                let _ = writeln!(
                    code,
                    "    {} = {}::uninitialized;",
                    env.res, env.enum_name
                );
                code.push_str("}");
                code
            }
            None => format!("{} = {}::{};", env.res, env.enum_name, env.alternative),
        }
    }

    fn success_code(&self, env: &SuccessCodeEnv) -> String {
        format!("{} = new {}();", env.res, env.type_name)
    }

    fn null_code(&self, env: &NullCodeEnv) -> String {
        format!("{} = {};", env.res, env.null)
    }

    fn astnode_type_decl(&self, name: &str) -> String {
        format!("class {};", name)
    }

    fn astnode_type_def(&self, env: &AstNodeDefEnv) -> String {
        let mut def = String::new();
        let _ = writeln!(def, "class {} : public {} {{", env.name, env.base_name);
        let _ = writeln!(def, "public:");
        for (field, ty) in env.fields {
            let _ = writeln!(def, "    {} {};", self.decl_type(ty), field);
        }
        let _ = writeln!(def, "    {}() = default;", env.name);
        if !env.is_abstract && (!env.fields.is_empty() || !env.inherited.is_empty()) {
            let params: Vec<String> = env
                .inherited
                .iter()
                .chain(env.fields.iter())
                .map(|(field, ty)| format!("{} {}", self.decl_type(ty), field))
                .collect();
            let base_args: Vec<&str> = env
                .inherited
                .iter()
                .map(|(field, _)| field.as_str())
                .collect();
            let mut inits: Vec<String> = vec![format!("{}({})", env.base_name, base_args.join(", "))];
            inits.extend(
                env.fields
                    .iter()
                    .map(|(field, _)| format!("{}({})", field, field)),
            );
            let _ = writeln!(
                def,
                "    {}({}) : {} {{}}",
                env.name,
                params.join(", "),
                inits.join(", ")
            );
        }
        let _ = writeln!(def, "    std::string repr() const override;");
        def.push_str("};");
        def
    }

    fn astnode_type_impl(&self, env: &AstNodeImplEnv) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "std::string {}::repr() const {{", env.name);
        let _ = writeln!(body, "    std::string s = \"{}(\";", env.repr_name);
        for (index, field) in env.repr_fields.iter().enumerate() {
            if index != 0 {
                let _ = writeln!(body, "    s += \", \";");
            }
            if field.suppress_if_null {
                let _ = writeln!(body, "    if ({} != nullptr) {{", field.name);
            }
            if field.keyword {
                let _ = writeln!(body, "    s += \"{}=\";", field.name);
            }
            if field.pointer_like {
                let _ = writeln!(
                    body,
                    "    s += {f} ? {f}->repr() : \"null\";",
                    f = field.name
                );
            } else {
                let _ = writeln!(body, "    s += repr_of({});", field.name);
            }
            if field.suppress_if_null {
                let _ = writeln!(body, "    }}");
            }
        }
        let _ = writeln!(body, "    s += \")\";");
        let _ = writeln!(body, "    return s;");
        body.push_str("}");
        body
    }

    fn row_type_decl(&self, name: &str) -> String {
        format!("class {};", name)
    }

    fn row_type_def(&self, env: &RowTypeEnv) -> String {
        let mut def = String::new();
        let _ = writeln!(def, "class {} : public ASTNode {{", env.name);
        let _ = writeln!(def, "public:");
        for (index, component) in env.components.iter().enumerate() {
            let _ = writeln!(def, "    {} field_{};", self.decl_type(component), index);
        }
        if env.components.is_empty() {
            let _ = writeln!(def, "    {}() = default;", env.name);
        } else {
            let params: Vec<String> = env
                .components
                .iter()
                .enumerate()
                .map(|(index, component)| format!("{} field_{}", self.decl_type(component), index))
                .collect();
            let inits: Vec<String> = (0..env.components.len())
                .map(|index| format!("field_{i}(field_{i})", i = index))
                .collect();
            let _ = writeln!(
                def,
                "    {}({}) : {} {{}}",
                env.name,
                params.join(", "),
                inits.join(", ")
            );
        }
        let _ = writeln!(def, "    std::string repr() const override;");
        def.push_str("};");
        def
    }

    fn row_type_impl(&self, env: &RowTypeEnv) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "std::string {}::repr() const {{", env.name);
        let _ = writeln!(body, "    std::string s = \"<\";");
        for (index, component) in env.components.iter().enumerate() {
            if index != 0 {
                let _ = writeln!(body, "    s += \", \";");
            }
            if component.is_pointer_like() {
                let _ = writeln!(
                    body,
                    "    s += field_{i} ? field_{i}->repr() : \"null\";",
                    i = index
                );
            } else {
                let _ = writeln!(body, "    s += repr_of(field_{});", index);
            }
        }
        let _ = writeln!(body, "    s += \">\";");
        let _ = writeln!(body, "    return s;");
        body.push_str("}");
        body
    }

    fn list_type(&self, element: &GenType) -> String {
        format!("std::vector<{}>", self.decl_type(element))
    }

    fn enum_type_decl(&self, env: &EnumTypeEnv) -> String {
        let mut alternatives: Vec<&str> = vec!["uninitialized"];
        alternatives.extend(env.alternatives.iter().map(|(emitted, _)| emitted.as_str()));
        format!(
            "enum class {} {{ {} }};",
            env.name,
            alternatives.join(", ")
        )
    }

    fn enum_type_impl(&self, env: &EnumTypeEnv) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "const char* name({} value) {{", env.name);
        let _ = writeln!(body, "    switch (value) {{");
        for (emitted, display) in env.alternatives {
            let _ = writeln!(
                body,
                "    case {}::{}: return {};",
                env.name,
                emitted,
                c_repr(display)
            );
        }
        let _ = writeln!(
            body,
            "    default: return \"uninitialized\";"
        );
        let _ = writeln!(body, "    }}");
        body.push_str("}");
        body
    }

    fn combinator_fn_profile(&self, fn_name: &str, result_type: &GenType) -> String {
        format!(
            "long {}(Lexer* lex, long pos, {}* out_res);",
            fn_name,
            self.decl_type(result_type)
        )
    }

    fn combinator_fn_code(&self, env: &FnCodeEnv) -> String {
        let mut code = String::new();
        let _ = writeln!(
            code,
            "long {}(Lexer* lex, long pos, {}* out_res) {{",
            env.fn_name,
            self.decl_type(env.result_type)
        );
        for (name, ty) in env.decls {
            let _ = writeln!(
                code,
                "    {} {} = {};",
                self.decl_type(ty),
                name,
                self.null_expr(ty)
            );
        }
        let _ = writeln!(code, "{}", indent(env.code, 4));
        let _ = writeln!(code, "    *out_res = {};", env.res_var);
        let _ = writeln!(code, "    return {};", env.pos_var);
        code.push_str("}");
        code
    }

    fn combinator_fncall(&self, env: &FnCallEnv) -> String {
        format!(
            "{} = {}(lex, {}, &{});",
            env.pos, env.fn_name, env.pos_name, env.res
        )
    }

    fn main_header(&self, env: &MainHeaderEnv) -> String {
        let mut header = String::new();
        let _ = writeln!(header, "#pragma once");
        let _ = writeln!(header, "#include <string>");
        let _ = writeln!(header, "#include <vector>");
        let _ = writeln!(header, "#include \"parse_runtime.hpp\"");
        let _ = writeln!(header, "");
        let _ = writeln!(header, "// Type declarations");
        for decl in env.type_declarations {
            let _ = writeln!(header, "{}", decl);
        }
        let _ = writeln!(header, "");
        let _ = writeln!(header, "// Value type definitions");
        for def in env.value_type_definitions {
            let _ = writeln!(header, "{}", def);
        }
        let _ = writeln!(header, "");
        let _ = writeln!(header, "// Type definitions");
        for def in env.type_definitions {
            let _ = writeln!(header, "{}", def);
        }
        if !env.vector_elements.is_empty() {
            let _ = writeln!(header, "");
            let _ = writeln!(header, "// Vector instantiations required by the parser");
            for element in env.vector_elements {
                let _ = writeln!(header, "// std::vector<{}>", element);
            }
        }
        let _ = writeln!(header, "");
        let _ = writeln!(header, "// Parse function declarations");
        for decl in env.fn_declarations {
            let _ = writeln!(header, "{}", decl);
        }
        header
    }

    fn main_body(&self, env: &MainBodyEnv) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "#include \"{}\"", env.header_name);
        let _ = writeln!(body, "");
        for item in env.bodies {
            let _ = writeln!(body, "{}", item);
            let _ = writeln!(body, "");
        }
        body
    }

    fn interactive_main(&self, env: &InteractiveMainEnv) -> String {
        let mut main = String::new();
        let _ = writeln!(main, "#include <iostream>");
        let _ = writeln!(main, "#include \"{}\"", env.header_name);
        let _ = writeln!(main, "");
        let _ = writeln!(main, "// Interactive driver for rule {}", env.rule_name);
        let _ = writeln!(main, "int main() {{");
        let _ = writeln!(main, "    std::string line;");
        let _ = writeln!(main, "    while (std::getline(std::cin, line)) {{");
        let _ = writeln!(main, "        Lexer* lex = make_lexer(line);");
        let _ = writeln!(
            main,
            "        {} result = {};",
            self.decl_type(env.result_type),
            self.null_expr(env.result_type)
        );
        let _ = writeln!(
            main,
            "        long new_pos = {}(lex, 0, &result);",
            env.fn_name
        );
        let _ = writeln!(
            main,
            "        if (new_pos == -1 || new_pos != token_count(lex)) {{"
        );
        let _ = writeln!(
            main,
            "            std::cout << \"Parse failed at token \" << furthest_failure(lex) << std::endl;"
        );
        let _ = writeln!(main, "        }} else {{");
        if env.result_type.is_pointer_like() {
            let _ = writeln!(
                main,
                "            std::cout << (result ? result->repr() : \"null\") << std::endl;"
            );
        } else {
            let _ = writeln!(
                main,
                "            std::cout << repr_of(result) << std::endl;"
            );
        }
        let _ = writeln!(main, "        }}");
        let _ = writeln!(main, "        free_lexer(lex);");
        let _ = writeln!(main, "    }}");
        let _ = writeln!(main, "    return 0;");
        main.push_str("}");
        main
    }
}
