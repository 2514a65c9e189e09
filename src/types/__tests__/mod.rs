use crate::types::{common_ancestor, EnumSchema, Field, GenType, NodeSchema};

#[test]
fn ancestor_of_siblings_is_their_base() {
    let parent = NodeSchema::abstract_node("Decl", None);
    let with_decl = NodeSchema::new("WithDecl", Some(&parent), vec![Field::new("packages")]);
    let use_decl = NodeSchema::new("UseDecl", Some(&parent), vec![Field::new("packages")]);

    let ancestor = common_ancestor(&[with_decl, use_decl]).unwrap();
    assert_eq!(ancestor.name(), "Decl");
}

#[test]
fn ancestor_of_class_and_its_base_is_the_base() {
    let base = NodeSchema::abstract_node("AccessExpression", None);
    let derived = NodeSchema::new(
        "TypeAccessExpression",
        Some(&base),
        vec![Field::new("subtype_name")],
    );

    let ancestor = common_ancestor(&[derived, base.clone()]).unwrap();
    assert_eq!(ancestor.name(), "AccessExpression");
}

#[test]
fn ancestor_is_commutative_and_associative() {
    let root = NodeSchema::abstract_node("Expr", None);
    let a = NodeSchema::new("BinExpr", Some(&root), vec![]);
    let b = NodeSchema::new("UnExpr", Some(&root), vec![]);
    let c = NodeSchema::new("CallExpr", Some(&root), vec![]);

    let left = common_ancestor(&[a.clone(), b.clone(), c.clone()]).unwrap();
    let right = common_ancestor(&[c, b, a]).unwrap();
    assert_eq!(left.name(), right.name());
    assert_eq!(left.name(), "Expr");
}

#[test]
fn unrelated_classes_meet_at_the_implicit_root() {
    let a = NodeSchema::new("ObjectDecl", None, vec![]);
    let b = NodeSchema::new("PackageDecl", None, vec![]);
    assert!(common_ancestor(&[a, b]).is_none());
}

#[test]
fn fields_concatenate_parent_first() {
    let base = NodeSchema::abstract_node("TypeExprVariant", None);
    let mid = NodeSchema::new("TypeRef", Some(&base), vec![Field::new("name")]);
    let leaf = NodeSchema::new(
        "ConstrainedTypeRef",
        Some(&mid),
        vec![Field::new("constraint")],
    );

    let names: Vec<&str> = leaf.all_fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "constraint"]);
}

#[test]
fn enum_alternatives_carry_their_suffix_in_emitted_names() {
    let in_out = EnumSchema::with_suffix("InOut", vec!["in", "out", "inout"], "way");
    assert_eq!(in_out.emitted_alt("in"), "in_way");
    assert_eq!(in_out.emitted_alt("inout"), "inout_way");
    assert!(in_out.has_alternative("out"));
    assert!(!in_out.has_alternative("in_way"));

    let plain = EnumSchema::new("Overriding", vec!["overriding"]);
    assert_eq!(plain.emitted_alt("overriding"), "overriding");
}

#[test]
fn pointer_semantics_split_matches_the_type_universe() {
    let schema = NodeSchema::new("Name", None, vec![Field::new("tok")]);
    assert!(GenType::Node(schema.clone()).is_pointer_like());
    assert!(GenType::List(Box::new(GenType::Token)).is_pointer_like());
    assert!(GenType::AstRoot.is_pointer_like());
    assert!(!GenType::Bool.is_pointer_like());
    assert!(!GenType::Token.is_pointer_like());
    assert!(!GenType::Enum(EnumSchema::new("E", vec!["a"])).is_pointer_like());
}

#[test]
fn list_types_compare_structurally() {
    let schema = NodeSchema::new("Name", None, vec![Field::new("tok")]);
    let a = GenType::List(Box::new(GenType::Node(schema.clone())));
    let b = GenType::List(Box::new(GenType::Node(schema)));
    assert_eq!(a, b);
    assert_ne!(a, GenType::List(Box::new(GenType::Token)));
}

#[test]
fn repr_name_defaults_to_the_class_name() {
    let plain = NodeSchema::new("WithDecl", None, vec![]);
    assert_eq!(plain.repr_name(), "WithDecl");

    let renamed = NodeSchema::repr_named("UsePkgDecl", "UsePackage", None, vec![]);
    assert_eq!(renamed.repr_name(), "UsePackage");
}
