//! A module consist of the textual templates binding generated fragments to a target
//! emission language.
//!
//! The code generator is language agnostic: every combinator and type renders itself
//! through the [ITemplates] trait, one named template per construct, each receiving a
//! small typed environment. Swapping the template set handed to the
//! [CompileCtx](crate::CompileCtx) targets a different emission language.
//! The library ships [CppTemplates] which emits the C++ flavoured output of the reference
//! backend.

mod cpp;

pub use cpp::CppTemplates;

use crate::types::GenType;

/// Environment of a token literal or token class match fragment.
pub struct TokCodeEnv<'e> {
    pub pos_name: &'e str,
    pub pos: &'e str,
    pub res: &'e str,
    pub kind_id: u16,
    pub label: &'e str,
}

/// One component match inside a sequence fragment. `m_res` is [None] for a discarded
/// component.
pub struct RowSubmatch {
    pub code: String,
    pub m_pos: String,
    pub m_res: Option<String>,
}

/// Row tuple construction of a sequence fragment; absent when the caller extracts or
/// transforms the components away. `args` carries the kept component result variables with
/// their reference counting flag.
pub struct RowTupleEnv<'e> {
    pub res: &'e str,
    pub row_type: &'e str,
    pub args: &'e [(String, bool)],
}

pub struct RowCodeEnv<'e> {
    pub pos_name: &'e str,
    pub pos: &'e str,
    pub did_fail: &'e str,
    pub exit_label: &'e str,
    pub submatches: &'e [RowSubmatch],
    pub tuple: Option<RowTupleEnv<'e>>,
}

pub struct OrBranch {
    pub code: String,
    pub b_pos: String,
    pub b_res: String,
}

pub struct OrCodeEnv<'e> {
    pub pos: &'e str,
    pub res: &'e str,
    pub exit_label: &'e str,
    pub null: &'e str,
    pub branches: &'e [OrBranch],
}

/// Environment of an optional match; `bool_res` is set for the boolean variant.
pub struct OptCodeEnv<'e> {
    pub pos_name: &'e str,
    pub code: &'e str,
    pub m_pos: &'e str,
    pub m_res: &'e str,
    pub null: &'e str,
    pub bool_res: Option<&'e str>,
}

/// Right reducing fold of a list fragment through a binary AST constructor.
pub struct ListFoldEnv<'e> {
    pub class_name: &'e str,
    pub vec_var: &'e str,
    pub idx_var: &'e str,
}

pub struct ListCodeEnv<'e> {
    pub pos_name: &'e str,
    pub pos: &'e str,
    pub res: &'e str,
    pub cpos: &'e str,
    pub element_type: &'e GenType,
    pub parser_code: &'e str,
    pub p_pos: &'e str,
    pub p_res: &'e str,
    pub sep_code: Option<&'e str>,
    pub sep_pos: Option<&'e str>,
    pub empty_valid: bool,
    pub fold: Option<ListFoldEnv<'e>>,
}

pub struct TransformCodeEnv<'e> {
    pub code: &'e str,
    pub c_pos: &'e str,
    pub res: &'e str,
    pub class_name: &'e str,
    pub args: &'e [String],
    pub null: &'e str,
}

/// Environment of an enum tag fragment; `code` is absent when the alternative accepts
/// empty input.
pub struct EnumCodeEnv<'e> {
    pub code: Option<&'e str>,
    pub c_pos: &'e str,
    pub res: &'e str,
    pub enum_name: &'e str,
    pub alternative: &'e str,
}

pub struct SuccessCodeEnv<'e> {
    pub res: &'e str,
    pub type_name: &'e str,
}

pub struct NullCodeEnv<'e> {
    pub res: &'e str,
    pub null: &'e str,
}

/// Environment of an AST node class definition. `fields` are the class own fields and
/// `inherited` the base chain fields, both restricted to fields with a bound type.
pub struct AstNodeDefEnv<'e> {
    pub name: &'e str,
    pub base_name: &'e str,
    pub is_abstract: bool,
    pub fields: &'e [(String, GenType)],
    pub inherited: &'e [(String, GenType)],
}

/// One field of the emitted pretty printer.
pub struct ReprField {
    pub name: String,
    pub keyword: bool,
    pub suppress_if_null: bool,
    pub pointer_like: bool,
}

pub struct AstNodeImplEnv<'e> {
    pub name: &'e str,
    pub repr_name: &'e str,
    pub repr_fields: &'e [ReprField],
}

pub struct RowTypeEnv<'e> {
    pub name: &'e str,
    pub components: &'e [GenType],
}

/// Environment of an enum type; alternatives are (emitted identifier, display name) pairs.
pub struct EnumTypeEnv<'e> {
    pub name: &'e str,
    pub alternatives: &'e [(String, &'static str)],
}

pub struct FnCodeEnv<'e> {
    pub fn_name: &'e str,
    pub result_type: &'e GenType,
    pub decls: &'e [(String, GenType)],
    pub code: &'e str,
    pub pos_var: &'e str,
    pub res_var: &'e str,
}

pub struct FnCallEnv<'e> {
    pub fn_name: &'e str,
    pub pos_name: &'e str,
    pub pos: &'e str,
    pub res: &'e str,
}

pub struct MainHeaderEnv<'e> {
    pub type_declarations: &'e [String],
    pub value_type_definitions: &'e [String],
    pub type_definitions: &'e [String],
    pub fn_declarations: &'e [String],
    pub vector_elements: &'e [String],
}

pub struct MainBodyEnv<'e> {
    pub header_name: &'e str,
    pub bodies: &'e [String],
}

pub struct InteractiveMainEnv<'e> {
    pub header_name: &'e str,
    pub rule_name: &'e str,
    pub fn_name: &'e str,
    pub result_type: &'e GenType,
}

/// The template set of one target emission language.
pub trait ITemplates {
    /// Declaration syntax of `ty`, pointer marked for reference semantics types.
    fn decl_type(&self, ty: &GenType) -> String;

    /// The expression filling a result slot of type `ty` when a match failed.
    fn null_expr(&self, ty: &GenType) -> String;

    fn tok_code(&self, env: &TokCodeEnv) -> String;
    fn tokclass_code(&self, env: &TokCodeEnv) -> String;
    fn row_code(&self, env: &RowCodeEnv) -> String;
    fn or_code(&self, env: &OrCodeEnv) -> String;
    fn opt_code(&self, env: &OptCodeEnv) -> String;
    fn list_code(&self, env: &ListCodeEnv) -> String;
    fn transform_code(&self, env: &TransformCodeEnv) -> String;
    fn enum_code(&self, env: &EnumCodeEnv) -> String;
    fn success_code(&self, env: &SuccessCodeEnv) -> String;
    fn null_code(&self, env: &NullCodeEnv) -> String;

    fn astnode_type_decl(&self, name: &str) -> String;
    fn astnode_type_def(&self, env: &AstNodeDefEnv) -> String;
    fn astnode_type_impl(&self, env: &AstNodeImplEnv) -> String;
    fn row_type_decl(&self, name: &str) -> String;
    fn row_type_def(&self, env: &RowTypeEnv) -> String;
    fn row_type_impl(&self, env: &RowTypeEnv) -> String;
    fn list_type(&self, element: &GenType) -> String;
    fn enum_type_decl(&self, env: &EnumTypeEnv) -> String;
    fn enum_type_impl(&self, env: &EnumTypeEnv) -> String;

    fn combinator_fn_profile(&self, fn_name: &str, result_type: &GenType) -> String;
    fn combinator_fn_code(&self, env: &FnCodeEnv) -> String;
    fn combinator_fncall(&self, env: &FnCallEnv) -> String;

    fn main_header(&self, env: &MainHeaderEnv) -> String;
    fn main_body(&self, env: &MainBodyEnv) -> String;
    fn interactive_main(&self, env: &InteractiveMainEnv) -> String;
}
