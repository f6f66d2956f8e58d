//! Unit tests for the node arena and rendering.

use super::{
    ast::{Ast, NodeKind},
    statements::{FunArg, Targets},
    types::ExprType,
};

#[test]
fn test_expr_type_display() {
    assert_eq!(ExprType::UInt64.to_string(), "uint64");
    assert_eq!(ExprType::Bytes.to_string(), "byte[]");
    assert_eq!(ExprType::Invalid.to_string(), "invalid");
    assert_eq!(ExprType::Unknown.to_string(), "unknown");
    assert_eq!(ExprType::default(), ExprType::Unknown);
}

#[test]
fn test_render_expressions() {
    let mut ast = Ast::new().unwrap();
    let scope = ast.root_scope();

    let one = ast.new_literal(scope, ExprType::UInt64, "1");
    let two = ast.new_literal(scope, ExprType::UInt64, "2");
    let sum = ast.new_bin_op(scope, "+", one, two);
    assert_eq!(ast.render(sum), "1 + 2");

    let group = ast.new_group(scope, sum);
    let not = ast.new_un_op(scope, "!", group);
    assert_eq!(ast.render(not), "! (1 + 2)");

    let cond = ast.new_ident(scope, "c");
    let a = ast.new_ident(scope, "a");
    let b = ast.new_ident(scope, "b");
    let if_expr = ast.new_if_expr(scope, cond, a, b);
    assert_eq!(ast.render(if_expr), "if ident c { ident a } else { ident b }");

    let text = ast.new_literal(scope, ExprType::Bytes, "\"abc\"");
    let cast = ast.new_type_cast(scope, ExprType::UInt64, text);
    assert_eq!(ast.render(cast), "uint64(\"abc\")");

    let x = ast.new_ident(scope, "x");
    let y = ast.new_literal(scope, ExprType::UInt64, "3");
    let call = ast.new_call(scope, "concat", &[x, y]);
    assert_eq!(ast.render(call), "concat(ident x, 3)");

    let arg = ast.new_runtime_arg(scope, "arg", "0");
    assert_eq!(ast.render(arg), "arg 0");
}

#[test]
fn test_render_runtime_fields() {
    let mut ast = Ast::new().unwrap();
    let scope = ast.root_scope();

    let cases = [
        ("txn", "Sender", vec![], "txn.Sender"),
        ("gtxn", "Amount", vec!["0"], "gtxn[0].Amount"),
        ("gtxna", "ApplicationArgs", vec!["1", "2"], "gtxna[1].ApplicationArgs[2]"),
        ("txna", "Accounts", vec!["1"], "txna.Accounts[1]"),
        ("txnas", "ApplicationArgs", vec![], "txnas.ApplicationArgs[var]"),
        ("global", "GroupSize", vec![], "global.GroupSize"),
    ];
    for (op, field, indices, expected) in cases {
        let node = ast.new_runtime_field(scope, op, field, &indices);
        assert_eq!(ast.render(node), expected);
    }
}

#[test]
fn test_render_statements() {
    let mut ast = Ast::new().unwrap();
    let scope = ast.root_scope();

    let one = ast.new_literal(scope, ExprType::UInt64, "1");
    let decl = ast.new_var_decl(scope, Targets::Single(String::from("x")), one);
    assert_eq!(ast.render(decl), "var (unknown) x = 1");
    assert_eq!(ast.kind(decl).name(), "var");

    let a = ast.new_literal(scope, ExprType::UInt64, "6");
    let b = ast.new_literal(scope, ExprType::UInt64, "7");
    let mulw = ast.new_call(scope, "mulw", &[a, b]);
    let tuple = ast.new_assign(
        scope,
        Targets::Tuple {
            high: String::from("h"),
            low: String::from("l"),
        },
        mulw,
    );
    assert_eq!(ast.render(tuple), "h, l = mulw(6, 7)");
    assert_eq!(ast.kind(tuple).name(), "assign tuple");

    let constant = ast.new_const(scope, "LIMIT", ExprType::UInt64, "100");
    assert_eq!(ast.render(constant), "const (uint64) LIMIT = 100");

    let value = ast.new_literal(scope, ExprType::UInt64, "5");
    let field = ast.new_assign_inner_txn(scope, "Amount", value);
    assert_eq!(ast.render(field), "itxn.Amount = 5");

    let begin = ast.new_inner_txn_begin(scope);
    let end = ast.new_inner_txn_end(scope);
    assert_eq!(ast.render(begin), "itxn_begin");
    assert_eq!(ast.render(end), "itxn_submit");

    let bare = ast.new_return(scope, None, None);
    assert_eq!(ast.render(bare), "return");
    let brk = ast.new_break(scope, None);
    assert_eq!(ast.render(brk), "break");
}

#[test]
fn test_print_tree() {
    let mut ast = Ast::new().unwrap();
    let root = ast.root_scope();
    let program = ast.new_program(root);
    let scope = ast.contexts.new_context("f", root);
    let definition = ast.new_fun_def(scope, "f", vec![], false);
    ast.add_function(program, definition);

    let cond = ast.new_ident(scope, "c");
    let then_block = ast.new_block(scope);
    let one = ast.new_literal(scope, ExprType::UInt64, "1");
    let ret = ast.new_return(scope, Some(one), Some(definition));
    ast.append(then_block, ret);
    let if_stmt = ast.new_if_stmt(scope, cond, then_block, None);
    ast.append(definition, if_stmt);

    assert_eq!(
        ast.print_tree(program),
        "program\n    function f\n        if ident c\n            block\n                return 1\n"
    );
}

#[test]
fn test_parent_links() {
    let mut ast = Ast::new().unwrap();
    let scope = ast.root_scope();
    let lhs = ast.new_literal(scope, ExprType::UInt64, "1");
    let rhs = ast.new_literal(scope, ExprType::UInt64, "2");
    let sum = ast.new_bin_op(scope, "-", lhs, rhs);
    let call = ast.new_call(scope, "itob", &[sum]);

    assert_eq!(ast.parent(lhs), Some(sum));
    assert_eq!(ast.parent(rhs), Some(sum));
    assert_eq!(ast.parent(sum), Some(call));
    assert_eq!(ast.parent(call), None);
    assert_eq!(ast.children(call), &[sum]);
    assert!(ast.children(sum).is_empty());
    assert_eq!(ast.scope(call), scope);
    assert_eq!(ast.len(), 4);
}

#[test]
fn test_inline_functions_are_not_listed() {
    let mut ast = Ast::new().unwrap();
    let root = ast.root_scope();
    let program = ast.new_program(root);
    let args = vec![FunArg {
        name: String::from("value"),
        arg_type: ExprType::UInt64,
    }];
    let called = ast.new_fun_def(root, "called", args, false);
    let inlined = ast.new_fun_def(root, "inlined", vec![], true);
    ast.add_function(program, called);
    ast.add_function(program, inlined);

    assert_eq!(ast.children(program), &[called, inlined]);
    match ast.kind(program) {
        NodeKind::Program(node) => assert_eq!(node.non_inline_funcs, vec![called]),
        _ => panic!("Expected a program"),
    }
}

#[test]
fn test_expression_kinds() {
    let mut ast = Ast::new().unwrap();
    let scope = ast.root_scope();
    let literal = ast.new_literal(scope, ExprType::UInt64, "1");
    let block = ast.new_block(scope);

    assert!(ast.kind(literal).is_expression());
    assert!(!ast.kind(block).is_expression());
    assert_eq!(ast.kind(block).name(), "block");
}
