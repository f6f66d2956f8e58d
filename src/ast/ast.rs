use crate::{
    context::context::{Contexts, ScopeId},
    errors::errors::Error,
    Position,
};

use super::{
    expressions::{
        BinOpNode, CallNode, GroupNode, IdentNode, IfExprNode, LiteralNode, RuntimeArgNode,
        RuntimeFieldNode, TypeCastNode, UnOpNode,
    },
    statements::{
        AssignInnerTxnNode, AssignNode, BreakNode, ConstNode, ForNode, FunDefNode, IfStmtNode,
        ProgramNode, ReturnNode,
    },
};

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Node Kinds
///
/// The closed set of node kinds. Every pass over the tree matches on this.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(ProgramNode),
    FunctionDef(FunDefNode),
    Block,
    Return(ReturnNode),
    Error,
    InnerTxnBegin,
    InnerTxnEnd,
    AssignInnerTxn(AssignInnerTxnNode),
    Break(BreakNode),
    Assign(AssignNode),
    VarDecl(AssignNode),
    Const(ConstNode),
    Ident(IdentNode),
    Literal(LiteralNode),
    BinOp(BinOpNode),
    Group(GroupNode),
    UnOp(UnOpNode),
    IfExpr(IfExprNode),
    IfStatement(IfStmtNode),
    For(ForNode),
    TypeCast(TypeCastNode),
    Call(CallNode),
    RuntimeField(RuntimeFieldNode),
    RuntimeArg(RuntimeArgNode),
}

impl NodeKind {
    /// Human readable label of the node kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "program",
            NodeKind::FunctionDef(_) => "func",
            NodeKind::Block => "block",
            NodeKind::Return(_) => "ret",
            NodeKind::Error => "error",
            NodeKind::InnerTxnBegin => "begin",
            NodeKind::InnerTxnEnd => "end",
            NodeKind::AssignInnerTxn(_) => "assignItxn",
            NodeKind::Break(_) => "break",
            NodeKind::Assign(assign) => match assign.targets.arity() {
                1 => "assign",
                2 => "assign tuple",
                _ => "assign quadruple",
            },
            NodeKind::VarDecl(decl) => match decl.targets.arity() {
                1 => "var",
                2 => "var, var",
                _ => "divmodw",
            },
            NodeKind::Const(_) => "const",
            NodeKind::Ident(_) => "expr ident",
            NodeKind::Literal(_) => "expr liter",
            NodeKind::BinOp(_) => "expr OP expr",
            NodeKind::Group(_) => "(expr)",
            NodeKind::UnOp(_) => "OP expr",
            NodeKind::IfExpr(_) => "if expr",
            NodeKind::IfStatement(_) => "if stmt",
            NodeKind::For(_) => "for stmt",
            NodeKind::TypeCast(_) => "type cast",
            NodeKind::Call(_) => "fun call",
            NodeKind::RuntimeField(_) => "runtime field",
            NodeKind::RuntimeArg(_) => "runtime arg",
        }
    }

    /// Returns whether nodes of this kind can be typed.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Const(_)
                | NodeKind::Ident(_)
                | NodeKind::Literal(_)
                | NodeKind::BinOp(_)
                | NodeKind::Group(_)
                | NodeKind::UnOp(_)
                | NodeKind::IfExpr(_)
                | NodeKind::TypeCast(_)
                | NodeKind::Call(_)
                | NodeKind::RuntimeField(_)
                | NodeKind::RuntimeArg(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Position,
    scope: ScopeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena holding every node and scope of one compilation unit.
///
/// Nodes are created bottom-up by the parser and never move. Parent, scope and
/// definition links are plain indices into this arena.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    pub contexts: Contexts,
}

impl Ast {
    pub fn new() -> Result<Self, Error> {
        Ok(Ast {
            nodes: vec![],
            contexts: Contexts::new("global")?,
        })
    }

    pub fn root_scope(&self) -> ScopeId {
        self.contexts.root()
    }

    pub fn add(&mut self, scope: ScopeId, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            position: Position::null(),
            scope,
            parent: None,
            children: vec![],
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Makes `child` the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Links an operand held in a node field back to the node owning it.
    pub(crate) fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn with_position(&mut self, id: NodeId, position: Position) -> NodeId {
        self.nodes[id.0].position = position;
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn scope(&self, id: NodeId) -> ScopeId {
        self.nodes[id.0].scope
    }

    pub fn position(&self, id: NodeId) -> &Position {
        &self.nodes[id.0].position
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders a node the way it would read in source.
    pub fn render(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Program(_) | NodeKind::Block | NodeKind::Error => {
                node.kind.name().to_string()
            }
            NodeKind::InnerTxnBegin => String::from("itxn_begin"),
            NodeKind::InnerTxnEnd => String::from("itxn_submit"),
            NodeKind::FunctionDef(def) => format!("function {}", def.name),
            NodeKind::Return(ret) => match ret.value {
                Some(value) => format!("return {}", self.render(value)),
                None => String::from("return"),
            },
            NodeKind::AssignInnerTxn(assign) => {
                format!("itxn.{} = {}", assign.name, self.render(assign.value))
            }
            NodeKind::Break(brk) => match brk.value {
                Some(value) => format!("break {}", self.render(value)),
                None => String::from("break"),
            },
            NodeKind::Assign(assign) => format!(
                "{} = {}",
                assign.targets.names().join(", "),
                self.render(assign.value)
            ),
            NodeKind::VarDecl(decl) => format!(
                "var ({}) {} = {}",
                decl.expr_types
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<String>>()
                    .join(", "),
                decl.targets.names().join(", "),
                self.render(decl.value)
            ),
            NodeKind::Const(constant) => format!(
                "const ({}) {} = {}",
                constant.expr_type, constant.name, constant.value
            ),
            NodeKind::Ident(ident) => format!("ident {}", ident.name),
            NodeKind::Literal(literal) => literal.value.clone(),
            NodeKind::BinOp(binop) => format!(
                "{} {} {}",
                self.render(binop.lhs),
                binop.op,
                self.render(binop.rhs)
            ),
            NodeKind::Group(group) => format!("({})", self.render(group.value)),
            NodeKind::UnOp(unop) => format!("{} {}", unop.op, self.render(unop.value)),
            NodeKind::IfExpr(if_expr) => format!(
                "if {} {{ {} }} else {{ {} }}",
                self.render(if_expr.cond),
                self.render(if_expr.if_true),
                self.render(if_expr.if_false)
            ),
            NodeKind::IfStatement(if_stmt) => format!("if {}", self.render(if_stmt.cond)),
            NodeKind::For(for_stmt) => format!("for {}", self.render(for_stmt.cond)),
            NodeKind::TypeCast(cast) => format!("{}({})", cast.target, self.render(cast.expr)),
            NodeKind::Call(call) => {
                let args = node
                    .children
                    .iter()
                    .map(|arg| self.render(*arg))
                    .collect::<Vec<String>>()
                    .join(", ");
                match &call.field {
                    Some(field) => format!("{}({}).{}", call.name, args, field),
                    None => format!("{}({})", call.name, args),
                }
            }
            NodeKind::RuntimeField(field) => field.to_string(),
            NodeKind::RuntimeArg(arg) => format!("{} {}", arg.op, arg.number),
        }
    }

    /// Renders the subtree rooted at `id`, one node per line.
    pub fn print_tree(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.print_impl(id, 0, &mut result);
        result
    }

    fn print_impl(&self, id: NodeId, offset: usize, result: &mut String) {
        result.push_str(&" ".repeat(offset));
        result.push_str(&self.render(id));
        result.push('\n');
        for child in self.nodes[id.0].children.iter() {
            self.print_impl(*child, offset + 4, result);
        }
    }
}
