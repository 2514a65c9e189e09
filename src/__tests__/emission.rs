//! Law level checks over the emitted artefacts.

use super::ada_decl::{ada_fixture, generate_fixture};
use crate::combinator::{tok, tok_class, Discard, ListOf, NullProd, Seq, SuccessProd, Transform};
use crate::templates::CppTemplates;
use crate::types::{Field, GenType, NodeSchema};
use crate::{CombRef, CompileCtx, Grammar, TokenClass, TokenMap};
use std::rc::Rc;

fn fresh_ctx() -> CompileCtx {
    CompileCtx::new(Rc::new(TokenMap::ada()), Rc::new(CppTemplates))
}

fn sorted(strings: &[String]) -> Vec<String> {
    let mut sorted = strings.to_vec();
    sorted.sort();
    sorted
}

#[test]
fn emit_once_across_fresh_contexts() {
    let fixture = ada_fixture();

    let mut first = fresh_ctx();
    fixture.grammar.compile_into(&mut first).unwrap();
    let mut second = fresh_ctx();
    fixture.grammar.compile_into(&mut second).unwrap();

    assert_eq!(
        sorted(first.fn_declarations()),
        sorted(second.fn_declarations())
    );
    assert_eq!(
        sorted(first.types_declarations()),
        sorted(second.types_declarations())
    );
    assert_eq!(
        sorted(first.types_definitions()),
        sorted(second.types_definitions())
    );

    // Emit once inside a single context as well: no duplicated declarations.
    let decls = sorted(first.fn_declarations());
    let mut deduped = decls.clone();
    deduped.dedup();
    assert_eq!(decls, deduped);
}

#[test]
fn extract_inhibits_row_tuple_construction() {
    let grammar = Grammar::new();
    let extracted: CombRef = Rc::new(Seq::new(vec![tok("("), tok("with"), tok(")")]).extract(1));
    grammar.add_rules(vec![("inner", extracted)]).unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();
    assert!(!ctx.bodies().iter().any(|body| body.contains("new Row")));
    assert!(ctx.types_declarations().is_empty());
}

#[test]
fn plain_sequence_rules_build_their_row_tuple() {
    let fixture = ada_fixture();
    let mut ctx = fresh_ctx();
    fixture.grammar.compile_into(&mut ctx).unwrap();

    // The context_pair rule is a bare sequence, so a row type must exist and its
    // definition is prepended before the classes which embed it.
    assert!(ctx.bodies().iter().any(|body| body.contains("new Row_")));
    assert!(ctx.types_definitions()[0].starts_with("class Row_"));
}

#[test]
fn value_type_definitions_precede_pointer_types_in_the_header() {
    let fixture = ada_fixture();
    let unit = generate_fixture(&fixture);

    let enum_at = unit.header.find("enum class Overriding").unwrap();
    let class_at = unit.header.find("class WithDecl : public ASTNode").unwrap();
    assert!(enum_at < class_at);
}

#[test]
fn success_and_null_produce_default_and_null_results() {
    let marker = NodeSchema::new("PragmaMarker", None, vec![]);
    let absent = NodeSchema::new("AbsentDecl", None, vec![]);

    let grammar = Grammar::new();
    grammar
        .add_rules(vec![
            (
                "pragma_marker",
                Rc::new(SuccessProd::new(GenType::Node(marker))) as CombRef,
            ),
            (
                "absent_decl",
                Rc::new(NullProd::new(GenType::Node(absent))) as CombRef,
            ),
        ])
        .unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();

    let bodies = ctx.bodies().join("\n");
    assert!(bodies.contains("= new PragmaMarker();"));
    assert!(bodies.contains("= nullptr;"));
    assert!(ctx
        .types_declarations()
        .iter()
        .any(|decl| decl.contains("AbsentDecl")));
}

#[test]
fn recursive_grammar_compiles_through_deferred_function_calls() {
    let num_lit = NodeSchema::new("NumLit", None, vec![Field::new("tok")]);

    let grammar = Grammar::new();
    let number: CombRef = Rc::new(Transform::new(&tok_class(TokenClass::Number), &num_lit));
    let parenthesised: CombRef = Rc::new(
        Seq::new(vec![
            Rc::new(Discard::new(&tok("("))) as CombRef,
            grammar.rule("expression"),
            Rc::new(Discard::new(&tok(")"))) as CombRef,
        ])
        .extract(1),
    );
    grammar
        .add_rules(vec![(
            "expression",
            Rc::new(crate::combinator::Alt::new(vec![number, parenthesised])) as CombRef,
        )])
        .unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();

    let fn_name = ctx.rule_fn_name("expression").unwrap().to_string();
    let bodies = ctx.bodies().join("\n");
    // Definition plus at least one recursive call through the deferred edge.
    assert!(bodies.matches(&fn_name).count() >= 2);
    assert_eq!(ctx.fn_declarations().len(), 1);
}

#[test]
fn shared_combinators_are_promoted_to_functions() {
    let comma = tok(",");
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![
            (
                "id_list",
                Rc::new(ListOf::new(
                    &tok_class(TokenClass::Identifier),
                    Some(&comma),
                    false,
                )) as CombRef,
            ),
            (
                "number_list",
                Rc::new(ListOf::new(
                    &tok_class(TokenClass::Number),
                    Some(&comma),
                    false,
                )) as CombRef,
            ),
        ])
        .unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();

    assert!(ctx
        .fn_declarations()
        .iter()
        .any(|decl| decl.contains("tok_parse")));
}

#[test]
fn discard_wrappers_do_not_change_bound_field_types() {
    let bare_pair = NodeSchema::new(
        "RangeSpec",
        None,
        vec![Field::new("low"), Field::new("high")],
    );
    let wrapped_pair = NodeSchema::new(
        "WrappedRangeSpec",
        None,
        vec![Field::new("low"), Field::new("high")],
    );

    let bare = Grammar::new();
    bare.add_rules(vec![(
        "range_spec",
        Rc::new(Transform::new(
            &(Rc::new(Seq::new(vec![
                tok_class(TokenClass::Number),
                tok_class(TokenClass::Number),
            ])) as CombRef),
            &bare_pair,
        )) as CombRef,
    )])
    .unwrap();

    let wrapped = Grammar::new();
    wrapped
        .add_rules(vec![(
            "range_spec",
            Rc::new(Transform::new(
                &(Rc::new(Seq::new(vec![
                    Rc::new(Discard::new(&tok("range"))) as CombRef,
                    tok_class(TokenClass::Number),
                    Rc::new(Discard::new(&tok(".."))) as CombRef,
                    tok_class(TokenClass::Number),
                ])) as CombRef),
                &wrapped_pair,
            )) as CombRef,
        )])
        .unwrap();

    let mut bare_ctx = fresh_ctx();
    bare.compile_into(&mut bare_ctx).unwrap();
    let mut wrapped_ctx = fresh_ctx();
    wrapped.compile_into(&mut wrapped_ctx).unwrap();

    for (bare_field, wrapped_field) in bare_pair.fields().iter().zip(wrapped_pair.fields()) {
        assert_eq!(bare_field.ty().unwrap(), wrapped_field.ty().unwrap());
    }
}

#[test]
fn list_emptiness_contract_shows_in_the_emitted_loop() {
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![
            (
                "maybe_empty",
                Rc::new(ListOf::new(&tok_class(TokenClass::Identifier), None, true)) as CombRef,
            ),
            (
                "at_least_one",
                Rc::new(ListOf::new(&tok_class(TokenClass::Number), None, false)) as CombRef,
            ),
        ])
        .unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();

    let maybe_empty = ctx.rule_fn_name("maybe_empty").unwrap().to_string();
    let at_least_one = ctx.rule_fn_name("at_least_one").unwrap().to_string();
    let body_of = |name: &str| {
        ctx.bodies()
            .iter()
            .find(|body| body.starts_with(&format!("long {}", name)))
            .unwrap()
            .clone()
    };

    assert!(!body_of(&maybe_empty).contains("empty()"));
    assert!(body_of(&at_least_one).contains("empty()"));
}

#[test]
fn fold_list_emits_a_right_reducing_loop() {
    let expr = NodeSchema::abstract_node("Expr", None);
    let atom = NodeSchema::new("Atom", Some(&expr), vec![Field::new("tok")]);
    let concat = NodeSchema::new(
        "ConcatOp",
        Some(&expr),
        vec![Field::new("left"), Field::new("right")],
    );

    let grammar = Grammar::new();
    let element: CombRef = Rc::new(Transform::new(&tok_class(TokenClass::String), &atom));
    grammar
        .add_rules(vec![(
            "concatenation",
            Rc::new(ListOf::fold_right(&element, Some(&tok("&")), &concat)) as CombRef,
        )])
        .unwrap();

    let mut ctx = fresh_ctx();
    grammar.compile_into(&mut ctx).unwrap();

    let bodies = ctx.bodies().join("\n");
    assert!(bodies.contains("size() - 2"));
    assert!(bodies.contains("new ConcatOp("));

    // The binary constructor takes the folded ancestor type on both sides.
    assert_eq!(
        concat.fields()[0].ty().unwrap(),
        &GenType::Node(expr.clone())
    );
    assert_eq!(concat.fields()[1].ty().unwrap(), &GenType::Node(expr));
}

#[test]
fn unknown_token_literal_aborts_generation() {
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![("broken", tok("no_such_keyword"))])
        .unwrap();

    let mut ctx = fresh_ctx();
    let err = grammar.compile_into(&mut ctx).unwrap_err();
    assert_eq!(err.what(), "UnknownToken");
}

#[test]
fn unresolved_rule_reference_aborts_generation() {
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![(
            "dangling",
            Rc::new(Seq::new(vec![tok("with"), grammar.rule("missing")])) as CombRef,
        )])
        .unwrap();

    let mut ctx = fresh_ctx();
    let err = grammar.compile_into(&mut ctx).unwrap_err();
    assert_eq!(err.what(), "UnresolvedRule");
}

#[test]
fn field_count_mismatch_aborts_generation() {
    let lopsided = NodeSchema::new(
        "Pragma",
        None,
        vec![Field::new("id"), Field::new("args")],
    );
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![(
            "pragma",
            Rc::new(Transform::new(
                &(Rc::new(Seq::new(vec![
                    tok_class(TokenClass::Identifier),
                    tok_class(TokenClass::Identifier),
                    tok_class(TokenClass::Identifier),
                ])) as CombRef),
                &lopsided,
            )) as CombRef,
        )])
        .unwrap();

    let mut ctx = fresh_ctx();
    let err = grammar.compile_into(&mut ctx).unwrap_err();
    assert_eq!(err.what(), "FieldBinding");
}

#[test]
fn interactive_main_requires_a_compiled_rule() {
    let fixture = ada_fixture();
    let err = fixture
        .grammar
        .generate(
            Rc::new(TokenMap::ada()),
            Rc::new(CppTemplates),
            "parse.hpp",
            Some("no_such_rule"),
        )
        .unwrap_err();
    assert_eq!(err.what(), "MainRule");
}

#[test]
fn duplicate_rule_names_are_rejected() {
    let grammar = Grammar::new();
    grammar
        .add_rules(vec![("with_decl", tok("with"))])
        .unwrap();
    let err = grammar
        .add_rules(vec![("with_decl", tok("with"))])
        .unwrap_err();
    assert_eq!(err.what(), "DuplicateRule");
}
