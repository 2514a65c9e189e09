//! Scenario coverage over a subset of the Ada declaration grammar.

use crate::combinator::{
    tok, tok_class, Alt, Discard, ListOf, Opt, Seq, TagEnum, Transform,
};
use crate::templates::CppTemplates;
use crate::types::{EnumSchema, Field, GenType, NodeSchema};
use crate::{CombRef, CompileCtx, GeneratedUnit, Grammar, TokenClass, TokenMap};
use std::rc::Rc;

pub struct AdaFixture {
    pub grammar: Grammar,
    pub name: Rc<NodeSchema>,
    pub with_decl: Rc<NodeSchema>,
    pub use_decl: Rc<NodeSchema>,
    pub use_pkg_decl: Rc<NodeSchema>,
    pub use_typ_decl: Rc<NodeSchema>,
    pub object_decl: Rc<NodeSchema>,
    pub package_decl: Rc<NodeSchema>,
    pub parameter_profile: Rc<NodeSchema>,
    pub overriding: Rc<EnumSchema>,
    pub in_out: Rc<EnumSchema>,
}

pub fn ada_fixture() -> AdaFixture {
    let name = NodeSchema::new("Name", None, vec![Field::new("tok")]);
    let num_lit = NodeSchema::new("NumLit", None, vec![Field::new("tok")]);
    let with_decl = NodeSchema::new(
        "WithDecl",
        None,
        vec![
            Field::new("is_limited"),
            Field::new("is_private"),
            Field::new("packages"),
        ],
    );
    let use_decl = NodeSchema::abstract_node("UseDecl", None);
    let use_pkg_decl =
        NodeSchema::new("UsePkgDecl", Some(&use_decl), vec![Field::new("packages")]);
    let use_typ_decl = NodeSchema::new(
        "UseTypDecl",
        Some(&use_decl),
        vec![Field::new("all"), Field::new("types")],
    );
    let object_decl = NodeSchema::new(
        "ObjectDecl",
        None,
        vec![Field::new("ids"), Field::new("type_expr")],
    );
    let package_decl = NodeSchema::new(
        "PackageDecl",
        None,
        vec![
            Field::new("name"),
            Field::new("decls"),
            Field::new("private_decls"),
            Field::new("end_id"),
        ],
    );
    let parameter_profile = NodeSchema::new(
        "ParameterProfile",
        None,
        vec![
            Field::new("ids"),
            Field::hidden("is_aliased"),
            Field::new("mode"),
            Field::new("type_expr"),
            Field::new("default"),
        ],
    );
    let overriding = EnumSchema::with_suffix(
        "Overriding",
        vec!["overriding", "not_overriding", "unspecified"],
        "kind",
    );
    let in_out = EnumSchema::with_suffix("InOut", vec!["in", "out", "inout"], "way");

    let grammar = Grammar::new();

    let static_name: CombRef = Rc::new(Transform::new(&tok_class(TokenClass::Identifier), &name));
    let number: CombRef = Rc::new(Transform::new(&tok_class(TokenClass::Number), &num_lit));
    let expression: CombRef = Rc::new(Alt::new(vec![number, grammar.rule("static_name")]));

    let with_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(Opt::new(&tok("limited")).as_bool()) as CombRef,
            Rc::new(Opt::new(&tok("private")).as_bool()) as CombRef,
            Rc::new(Discard::new(&tok("with"))) as CombRef,
            Rc::new(ListOf::new(
                &grammar.rule("static_name"),
                Some(&tok(",")),
                false,
            )) as CombRef,
        ])) as CombRef),
        &with_decl,
    ));

    let use_pkg_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(Discard::new(&tok("use"))) as CombRef,
            Rc::new(ListOf::new(
                &grammar.rule("static_name"),
                Some(&tok(",")),
                false,
            )) as CombRef,
        ])) as CombRef),
        &use_pkg_decl,
    ));

    let use_typ_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(Discard::new(&tok("use"))) as CombRef,
            Rc::new(Opt::new(&tok("all")).as_bool()) as CombRef,
            Rc::new(Discard::new(&tok("type"))) as CombRef,
            Rc::new(ListOf::new(
                &grammar.rule("static_name"),
                Some(&tok(",")),
                false,
            )) as CombRef,
        ])) as CombRef),
        &use_typ_decl,
    ));

    let use_rule: CombRef = Rc::new(Alt::new(vec![
        grammar.rule("use_type_decl"),
        grammar.rule("use_package_decl"),
    ]));

    let overriding_rule: CombRef = Rc::new(Alt::new(vec![
        Rc::new(TagEnum::new(Some(&tok("overriding")), &overriding, "overriding").unwrap())
            as CombRef,
        Rc::new(
            TagEnum::new(
                Some(&(Rc::new(Seq::new(vec![tok("not"), tok("overriding")])) as CombRef)),
                &overriding,
                "not_overriding",
            )
            .unwrap(),
        ) as CombRef,
        Rc::new(TagEnum::new(None, &overriding, "unspecified").unwrap()) as CombRef,
    ]));

    let in_out_rule: CombRef = Rc::new(Alt::new(vec![
        Rc::new(
            TagEnum::new(
                Some(&(Rc::new(Seq::new(vec![tok("in"), tok("out")])) as CombRef)),
                &in_out,
                "inout",
            )
            .unwrap(),
        ) as CombRef,
        Rc::new(TagEnum::new(Some(&tok("in")), &in_out, "in").unwrap()) as CombRef,
        Rc::new(TagEnum::new(Some(&tok("out")), &in_out, "out").unwrap()) as CombRef,
        Rc::new(TagEnum::new(None, &in_out, "in").unwrap()) as CombRef,
    ]));

    let default_value: CombRef = Rc::new(Opt::extracting(
        &Rc::new(Seq::new(vec![tok(":="), grammar.rule("expression")])),
        1,
    ));
    let parameter_profile_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(ListOf::new(
                &grammar.rule("static_name"),
                Some(&tok(",")),
                false,
            )) as CombRef,
            Rc::new(Discard::new(&tok(":"))) as CombRef,
            Rc::new(Opt::new(&tok("aliased")).as_bool()) as CombRef,
            grammar.rule("in_out"),
            grammar.rule("static_name"),
            default_value,
        ])) as CombRef),
        &parameter_profile,
    ));

    let parameter_profiles_rule: CombRef = Rc::new(
        Seq::new(vec![
            Rc::new(Discard::new(&tok("("))) as CombRef,
            Rc::new(ListOf::new(
                &grammar.rule("parameter_profile"),
                Some(&tok(";")),
                false,
            )) as CombRef,
            Rc::new(Discard::new(&tok(")"))) as CombRef,
        ])
        .extract(1),
    );

    let object_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(ListOf::new(
                &grammar.rule("static_name"),
                Some(&tok(",")),
                false,
            )) as CombRef,
            Rc::new(Discard::new(&tok(":"))) as CombRef,
            grammar.rule("static_name"),
            Rc::new(Discard::new(&tok(";"))) as CombRef,
        ])) as CombRef),
        &object_decl,
    ));

    let basic_decls_rule: CombRef =
        Rc::new(ListOf::new(&grammar.rule("object_decl"), None, true));

    let private_part: CombRef = Rc::new(Opt::extracting(
        &Rc::new(Seq::new(vec![tok("private"), grammar.rule("basic_decls")])),
        1,
    ));
    let package_rule: CombRef = Rc::new(Transform::new(
        &(Rc::new(Seq::new(vec![
            Rc::new(Discard::new(&tok("package"))) as CombRef,
            grammar.rule("static_name"),
            Rc::new(Discard::new(&tok("is"))) as CombRef,
            grammar.rule("basic_decls"),
            private_part,
            Rc::new(Discard::new(&tok("end"))) as CombRef,
            Rc::new(Opt::new(&grammar.rule("static_name"))) as CombRef,
        ])) as CombRef),
        &package_decl,
    ));

    let context_pair: CombRef = Rc::new(Seq::new(vec![
        grammar.rule("with_decl"),
        grammar.rule("use_decl"),
    ]));

    grammar
        .add_rules(vec![
            ("static_name", static_name),
            ("expression", expression),
            ("with_decl", with_rule),
            ("use_package_decl", use_pkg_rule),
            ("use_type_decl", use_typ_rule),
            ("use_decl", use_rule),
            ("overriding_indicator", overriding_rule),
            ("in_out", in_out_rule),
            ("parameter_profile", parameter_profile_rule),
            ("parameter_profiles", parameter_profiles_rule),
            ("object_decl", object_rule),
            ("basic_decls", basic_decls_rule),
            ("package_decl", package_rule),
            ("context_pair", context_pair),
        ])
        .unwrap();

    AdaFixture {
        grammar,
        name,
        with_decl,
        use_decl,
        use_pkg_decl,
        use_typ_decl,
        object_decl,
        package_decl,
        parameter_profile,
        overriding,
        in_out,
    }
}

pub fn generate_fixture(fixture: &AdaFixture) -> GeneratedUnit {
    fixture
        .grammar
        .generate(
            Rc::new(TokenMap::ada()),
            Rc::new(CppTemplates),
            "parse.hpp",
            Some("package_decl"),
        )
        .unwrap()
}

#[test]
fn with_clause_shapes_the_with_decl_class() {
    let fixture = ada_fixture();
    let unit = generate_fixture(&fixture);

    let fields = fixture.with_decl.fields();
    assert_eq!(fields[0].ty().unwrap(), &GenType::Bool);
    assert_eq!(fields[1].ty().unwrap(), &GenType::Bool);
    assert_eq!(
        fields[2].ty().unwrap(),
        &GenType::List(Box::new(GenType::Node(fixture.name.clone())))
    );

    assert!(unit.header.contains("class WithDecl;"));
    assert!(unit.header.contains("class WithDecl : public ASTNode {"));
    assert!(unit.header.contains("std::vector<Name*>* packages;"));
    assert!(unit.body.contains("new WithDecl"));
}

#[test]
fn use_clause_alternation_types_to_the_abstract_base() {
    let fixture = ada_fixture();
    let mut ctx = CompileCtx::new(Rc::new(TokenMap::ada()), Rc::new(CppTemplates));
    fixture.grammar.compile_into(&mut ctx).unwrap();

    let use_pkg_fields = fixture.use_pkg_decl.fields();
    assert_eq!(
        use_pkg_fields[0].ty().unwrap(),
        &GenType::List(Box::new(GenType::Node(fixture.name.clone())))
    );

    let use_typ_fields = fixture.use_typ_decl.fields();
    assert_eq!(use_typ_fields[0].ty().unwrap(), &GenType::Bool);
    assert_eq!(
        use_typ_fields[1].ty().unwrap(),
        &GenType::List(Box::new(GenType::Node(fixture.name.clone())))
    );

    // Both branches derive UseDecl, so the alternation types to the common base.
    assert!(fixture.use_decl.is_abstract());
    let header = ctx.header();
    assert!(header.contains("class UseDecl;"));
    assert!(header.contains("class UsePkgDecl : public UseDecl {"));
    assert!(header.contains("class UseTypDecl : public UseDecl {"));
}

#[test]
fn overriding_indicator_emits_a_suffixed_enum() {
    let fixture = ada_fixture();
    let unit = generate_fixture(&fixture);

    assert_eq!(fixture.overriding.alternatives().len(), 3);
    assert!(unit.header.contains(
        "enum class Overriding { uninitialized, overriding_kind, not_overriding_kind, unspecified_kind };"
    ));
    assert!(unit.body.contains("Overriding::overriding_kind"));
    assert!(unit.body.contains("Overriding::uninitialized"));
    // The empty alternative accepts the empty prefix and only yields the tag.
    assert!(unit.body.contains("Overriding::unspecified_kind;"));
}

#[test]
fn parameter_profile_binds_mode_type_and_default() {
    let fixture = ada_fixture();
    generate_fixture(&fixture);

    let fields = fixture.parameter_profile.fields();
    assert_eq!(
        fields[0].ty().unwrap(),
        &GenType::List(Box::new(GenType::Node(fixture.name.clone())))
    );
    assert_eq!(fields[1].ty().unwrap(), &GenType::Bool);
    assert_eq!(
        fields[2].ty().unwrap(),
        &GenType::Enum(fixture.in_out.clone())
    );
    assert_eq!(
        fields[3].ty().unwrap(),
        &GenType::Node(fixture.name.clone())
    );
    // The default expression alternation only meets at the implicit AST root.
    assert_eq!(fields[4].ty().unwrap(), &GenType::AstRoot);
}

#[test]
fn package_decl_binds_private_part_and_end_id() {
    let fixture = ada_fixture();
    generate_fixture(&fixture);

    let object_list = GenType::List(Box::new(GenType::Node(fixture.object_decl.clone())));
    let fields = fixture.package_decl.fields();
    assert_eq!(fields[0].ty().unwrap(), &GenType::Node(fixture.name.clone()));
    assert_eq!(fields[1].ty().unwrap(), &object_list);
    assert_eq!(fields[2].ty().unwrap(), &object_list);
    assert_eq!(fields[3].ty().unwrap(), &GenType::Node(fixture.name.clone()));
}

#[test]
fn failure_reporting_uses_the_furthest_position() {
    let fixture = ada_fixture();
    let unit = generate_fixture(&fixture);

    // Every token mismatch notes its position so the driver can report the furthest one.
    assert!(unit.body.contains("note_failure(lex,"));
    let interactive = unit.interactive.unwrap();
    assert!(interactive.contains("furthest_failure(lex)"));
    assert!(interactive.contains("package_decl"));
}

#[test]
fn every_rule_maps_to_a_unique_parse_function() {
    let fixture = ada_fixture();
    let mut ctx = CompileCtx::new(Rc::new(TokenMap::ada()), Rc::new(CppTemplates));
    fixture.grammar.compile_into(&mut ctx).unwrap();

    let mut fn_names = Vec::new();
    for rule in fixture.grammar.rule_names() {
        let fn_name = ctx.rule_fn_name(rule).unwrap().to_string();
        assert!(
            fn_name.starts_with(rule),
            "{} should prefix {}",
            rule,
            fn_name
        );
        fn_names.push(fn_name);
    }
    let unique: std::collections::HashSet<&String> = fn_names.iter().collect();
    assert_eq!(unique.len(), fn_names.len());
}

#[test]
fn grammar_dump_lists_every_rule() {
    let fixture = ada_fixture();
    let dump = fixture.grammar.build_grammar().unwrap();
    for rule in fixture.grammar.rule_names() {
        assert!(dump.contains(rule));
    }
}
