use crate::ast::types::ExprType;

use super::{
    context::{Contexts, FunctionBinding, VarInfo, VarKind},
    literals::{parse_string_literal, LiteralPool},
};

#[test]
fn test_boolean_literals_seeded() {
    let contexts = Contexts::new("global").unwrap();
    let literals = contexts.literals();

    assert_eq!(literals.intc(), &["0".to_string(), "1".to_string()]);
    assert!(literals.bytec().is_empty());
    assert_eq!(literals.get("0").unwrap().offset, 0);
    assert_eq!(literals.get("1").unwrap().offset, 1);
}

#[test]
fn test_literal_interning_is_idempotent() {
    let mut contexts = Contexts::new("global").unwrap();

    let first = contexts.add_literal("42", ExprType::UInt64).unwrap();
    let second = contexts.add_literal("42", ExprType::UInt64).unwrap();
    assert_eq!(first, 2);
    assert_eq!(first, second);
    assert_eq!(contexts.literals().intc().len(), 3);

    let text = contexts.add_literal("\"abc\"", ExprType::Bytes).unwrap();
    let again = contexts.add_literal("\"abc\"", ExprType::Bytes).unwrap();
    assert_eq!(text, 0);
    assert_eq!(again, 0);
    assert_eq!(contexts.literals().bytec(), &[b"abc".to_vec()]);
}

#[test]
fn test_user_true_literal_shares_offset() {
    let mut contexts = Contexts::new("global").unwrap();
    assert_eq!(contexts.add_literal("1", ExprType::UInt64).unwrap(), 1);
    assert_eq!(contexts.literals().len(), 2);
}

#[test]
fn test_unknown_literal_type() {
    let mut pool = LiteralPool::new();
    let error = pool.add("7", ExprType::Unknown).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownLiteralType");
    assert!(pool.is_empty());
}

#[test]
fn test_bad_byte_literal_leaves_pool_untouched() {
    let mut pool = LiteralPool::new();
    let error = pool.add("0x123", ExprType::Bytes).unwrap_err();
    assert_eq!(error.get_error_name(), "LiteralFormatError");
    assert!(pool.is_empty());
    assert!(pool.bytec().is_empty());
}

#[test]
fn test_parse_string_literal() {
    assert_eq!(parse_string_literal("\"abc\"").unwrap(), b"abc".to_vec());
    assert_eq!(
        parse_string_literal(r#""a\n\t\\\"b""#).unwrap(),
        b"a\n\t\\\"b".to_vec()
    );
    assert_eq!(parse_string_literal(r#""\x41\x7a""#).unwrap(), b"Az".to_vec());
    assert_eq!(parse_string_literal("0x0aFF").unwrap(), vec![0x0a, 0xff]);
    assert_eq!(parse_string_literal("0x").unwrap(), Vec::<u8>::new());
    assert_eq!(parse_string_literal("\"\"").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_parse_string_literal_errors() {
    for literal in ["abc", "0xabc", "0xzz", "\"a\"b\"", r#""\q""#, r#""\x4""#, "\"abc"] {
        let error = parse_string_literal(literal).unwrap_err();
        assert_eq!(error.get_error_name(), "LiteralFormatError", "{}", literal);
    }
}

#[test]
fn test_address_contiguity() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    contexts.new_var(root, "g", ExprType::UInt64).unwrap();
    let main = contexts.new_context("main", root);
    assert_eq!(contexts.get(main).entry_address(), 1);

    let addresses: Vec<usize> = ["a", "b", "c"]
        .iter()
        .map(|name| contexts.new_var(main, name, ExprType::UInt64).unwrap())
        .collect();
    assert_eq!(addresses, vec![1, 2, 3]);
    assert_eq!(contexts.get(main).last_address(), 4);
    assert_eq!(contexts.get(main).name, "main");
    assert_eq!(contexts.get(main).parent(), Some(root));
}

#[test]
fn test_shadowing_and_sibling_lookup() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    contexts.new_var(root, "x", ExprType::UInt64).unwrap();
    let child = contexts.new_context("child", root);
    let sibling = contexts.new_context("sibling", root);
    contexts.new_var(child, "x", ExprType::Bytes).unwrap();
    contexts.new_var(child, "y", ExprType::UInt64).unwrap();

    assert_eq!(contexts.lookup(child, "x").unwrap().expr_type, ExprType::Bytes);
    assert_eq!(contexts.lookup(sibling, "x").unwrap().expr_type, ExprType::UInt64);
    assert_eq!(contexts.lookup(root, "x").unwrap().expr_type, ExprType::UInt64);

    let error = contexts.lookup(sibling, "y").unwrap_err();
    assert_eq!(error.get_error_name(), "IdentNotDefined");
    assert_eq!(error.to_string(), "ident 'y' not defined");
}

#[test]
fn test_duplicate_declarations() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    contexts.new_var(root, "x", ExprType::UInt64).unwrap();
    contexts.new_func(root, "f", ExprType::Unknown).unwrap();

    let error = contexts.new_var(root, "x", ExprType::Bytes).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
    let error = contexts.new_const(root, "x", ExprType::UInt64, "5").unwrap_err();
    assert_eq!(error.get_error_name(), "ConstantAlreadyDeclared");
    let error = contexts.new_func(root, "f", ExprType::Unknown).unwrap_err();
    assert_eq!(error.get_error_name(), "FunctionAlreadyDeclared");

    // A rejected constant does not pool its literal.
    assert!(contexts.literals().get("5").is_none());
    assert_eq!(contexts.get(root).last_address(), 1);
}

#[test]
fn test_constants_use_pool_offsets() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    let offset = contexts
        .new_const(root, "NAME", ExprType::Bytes, "\"name\"")
        .unwrap();
    let limit = contexts.new_const(root, "LIMIT", ExprType::UInt64, "100").unwrap();

    assert_eq!(offset, 0);
    assert_eq!(limit, 2);
    let info = contexts.lookup(root, "LIMIT").unwrap();
    assert!(info.constant());
    assert_eq!(info.address(), Some(2));
    assert_eq!(contexts.get(root).last_address(), 0);
}

#[test]
fn test_update_back_patches_declaring_scope() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    contexts.new_var(root, "x", ExprType::Unknown).unwrap();
    let child = contexts.new_context("child", root);

    let mut info = contexts.lookup(child, "x").unwrap().clone();
    info.expr_type = ExprType::Bytes;
    contexts.update(child, "x", info).unwrap();

    assert_eq!(contexts.lookup(root, "x").unwrap().expr_type, ExprType::Bytes);
    assert!(contexts.get(child).get("x").is_none());
}

#[test]
fn test_update_failures() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    contexts.new_var(root, "x", ExprType::UInt64).unwrap();

    let function = VarInfo {
        name: String::from("x"),
        expr_type: ExprType::UInt64,
        kind: VarKind::Function {
            binding: FunctionBinding::Unresolved,
        },
    };
    let error = contexts.update(root, "x", function.clone()).unwrap_err();
    assert_eq!(error.get_error_name(), "DescriptorKindChanged");
    assert!(!contexts.lookup(root, "x").unwrap().function());

    let error = contexts.update(root, "missing", function).unwrap_err();
    assert_eq!(error.get_error_name(), "UpdateFailed");
}

#[test]
fn test_remap_preserves_order() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    let main = contexts.new_context("inlined", root);
    contexts.new_var(main, "a", ExprType::UInt64).unwrap();
    contexts.new_var(main, "b", ExprType::Bytes).unwrap();
    contexts.new_const(main, "C", ExprType::UInt64, "9").unwrap();

    contexts.remap_to(main, 10);

    assert_eq!(contexts.lookup(main, "a").unwrap().address(), Some(10));
    assert_eq!(contexts.lookup(main, "b").unwrap().address(), Some(11));
    assert_eq!(contexts.lookup(main, "C").unwrap().address(), Some(2));
    assert_eq!(contexts.get(main).entry_address(), 10);
    assert_eq!(contexts.get(main).last_address(), 12);
}

#[test]
fn test_scope_chain() {
    let mut contexts = Contexts::new("global").unwrap();
    let root = contexts.root();
    let outer = contexts.new_context("outer", root);
    let inner = contexts.new_context("inner", outer);

    assert_eq!(contexts.chain(inner).collect::<Vec<_>>(), vec![inner, outer, root]);
    assert_eq!(contexts.chain(root).collect::<Vec<_>>(), vec![root]);
    contexts.print(inner);
}
