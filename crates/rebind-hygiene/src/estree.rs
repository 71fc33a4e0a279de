//! ESTree JSON → AST.
//!
//! Accepts the node shape emitted by acorn, esprima and similar front
//! ends. Only the fields the engine needs are read; location data beyond
//! `start`/`end` is ignored.
//!
//! A node whose `type` has no counterpart in [`crate::ast`] is not an
//! error here: it is kept as `Unsupported(type)` so the transform can
//! report it.

use crate::ast::*;
use crate::error::LoadError;
use crate::span::Span;
use serde_json::Value;

type Result<T> = std::result::Result<T, LoadError>;

/// Load a program from ESTree JSON text.
pub fn program_from_str(json: &str) -> Result<Program> {
    let value: Value = serde_json::from_str(json)?;
    program_from_value(&value)
}

/// Load a program from an already-parsed ESTree `Program` node.
pub fn program_from_value(value: &Value) -> Result<Program> {
    let node = Node::new(value)?;
    if node.kind != "Program" {
        return Err(LoadError::InvalidField {
            kind: node.kind.to_string(),
            field: "type",
            expected: "\"Program\"",
        });
    }
    Ok(Program {
        body: stmt_list(node.array("body")?)?,
        span: node.span(),
    })
}

/// A JSON object known to carry a string `type`.
struct Node<'a> {
    kind: &'a str,
    value: &'a Value,
}

impl<'a> Node<'a> {
    fn new(value: &'a Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| LoadError::MissingField {
                kind: "node".to_string(),
                field: "type",
            })?;
        Ok(Self { kind, value })
    }

    fn span(&self) -> Span {
        let offset = |key: &str| {
            self.value
                .get(key)
                .and_then(Value::as_u64)
                .map_or(0, |n| n as u32)
        };
        Span::new(offset("start"), offset("end"))
    }

    /// A field that may be absent or `null`.
    fn opt(&self, field: &'static str) -> Option<&'a Value> {
        self.value.get(field).filter(|v| !v.is_null())
    }

    fn get(&self, field: &'static str) -> Result<&'a Value> {
        self.opt(field).ok_or_else(|| self.missing(field))
    }

    fn node(&self, field: &'static str) -> Result<Node<'a>> {
        Node::new(self.get(field)?)
    }

    fn str(&self, field: &'static str) -> Result<&'a str> {
        self.get(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn bool(&self, field: &'static str) -> bool {
        self.opt(field).and_then(Value::as_bool).unwrap_or(false)
    }

    fn array(&self, field: &'static str) -> Result<&'a [Value]> {
        self.get(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(field, "an array"))
    }

    fn missing(&self, field: &'static str) -> LoadError {
        LoadError::MissingField {
            kind: self.kind.to_string(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> LoadError {
        LoadError::InvalidField {
            kind: self.kind.to_string(),
            field,
            expected,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

fn stmt_list(values: &[Value]) -> Result<Vec<Stmt>> {
    values.iter().map(stmt).collect()
}

fn stmt(value: &Value) -> Result<Stmt> {
    let node = Node::new(value)?;
    let kind = match node.kind {
        "VariableDeclaration" => StmtKind::Var(var_decl(&node)?),
        "FunctionDeclaration" => match function_flavor(&node) {
            Some(flavor) => StmtKind::Unsupported(flavor.to_string()),
            None => StmtKind::Function(Box::new(function(&node)?)),
        },
        "BlockStatement" => StmtKind::Block(stmt_list(node.array("body")?)?),
        "IfStatement" => StmtKind::If {
            test: expr(node.get("test")?)?,
            consequent: Box::new(stmt(node.get("consequent")?)?),
            alternate: node.opt("alternate").map(stmt).transpose()?.map(Box::new),
        },
        "ForStatement" => StmtKind::For {
            init: node.opt("init").map(loop_init).transpose()?,
            test: node.opt("test").map(expr).transpose()?,
            update: node.opt("update").map(expr).transpose()?,
            body: Box::new(stmt(node.get("body")?)?),
        },
        "WhileStatement" => StmtKind::While {
            test: expr(node.get("test")?)?,
            body: Box::new(stmt(node.get("body")?)?),
        },
        "DoWhileStatement" => StmtKind::DoWhile {
            body: Box::new(stmt(node.get("body")?)?),
            test: expr(node.get("test")?)?,
        },
        // Labels are not supported, so a labelled jump cannot be rendered.
        "BreakStatement" if node.opt("label").is_none() => StmtKind::Break,
        "ContinueStatement" if node.opt("label").is_none() => StmtKind::Continue,
        "ReturnStatement" => StmtKind::Return {
            arg: node.opt("argument").map(expr).transpose()?,
        },
        "ThrowStatement" => StmtKind::Throw {
            arg: expr(node.get("argument")?)?,
        },
        // Directive prologues (`"use strict"`) are plain expression statements.
        "ExpressionStatement" => StmtKind::Expr(expr(node.get("expression")?)?),
        "EmptyStatement" => StmtKind::Empty,
        other => StmtKind::Unsupported(other.to_string()),
    };
    Ok(Stmt::new(kind, node.span()))
}

fn var_decl(node: &Node<'_>) -> Result<VarDecl> {
    let kind = match node.str("kind")? {
        "var" => VarKind::Var,
        "let" => VarKind::Let,
        "const" => VarKind::Const,
        _ => return Err(node.invalid("kind", "\"var\", \"let\" or \"const\"")),
    };
    let decls = node
        .array("declarations")?
        .iter()
        .map(|value| {
            let declarator = Node::new(value)?;
            Ok(VarDeclarator {
                name: binding_name(&declarator.node("id")?)?,
                init: declarator.opt("init").map(expr).transpose()?,
                span: declarator.span(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if decls.is_empty() {
        return Err(node.invalid("declarations", "at least one declarator"));
    }
    Ok(VarDecl { kind, decls })
}

fn loop_init(value: &Value) -> Result<LoopInit> {
    let node = Node::new(value)?;
    if node.kind == "VariableDeclaration" {
        Ok(LoopInit::Declaration(var_decl(&node)?))
    } else {
        Ok(LoopInit::Expression(expr(value)?))
    }
}

/// The name bound by a pattern; only plain identifiers are supported.
fn binding_name(node: &Node<'_>) -> Result<String> {
    if node.kind == "Identifier" {
        Ok(node.str("name")?.to_string())
    } else {
        Err(LoadError::UnsupportedPattern {
            kind: node.kind.to_string(),
            span: node.span(),
        })
    }
}

fn params(node: &Node<'_>) -> Result<Vec<Param>> {
    node.array("params")?
        .iter()
        .map(|value| {
            let param = Node::new(value)?;
            Ok(Param {
                name: binding_name(&param)?,
                span: param.span(),
            })
        })
        .collect()
}

/// `async` and generator functions have no plain-function rendering.
fn function_flavor(node: &Node<'_>) -> Option<&'static str> {
    if !matches!(
        node.kind,
        "FunctionDeclaration" | "FunctionExpression" | "ArrowFunctionExpression"
    ) {
        None
    } else if node.bool("async") {
        Some("AsyncFunction")
    } else if node.bool("generator") {
        Some("GeneratorFunction")
    } else {
        None
    }
}

fn function(node: &Node<'_>) -> Result<Function> {
    let name = match node.opt("id") {
        Some(id) => Some(binding_name(&Node::new(id)?)?),
        None => None,
    };
    Ok(Function {
        name,
        params: params(node)?,
        body: stmt_list(node.node("body")?.array("body")?)?,
        span: node.span(),
    })
}

// =============================================================================
// Expressions
// =============================================================================

fn expr_list(values: &[Value]) -> Result<Vec<Expr>> {
    values.iter().map(expr).collect()
}

fn boxed(value: &Value) -> Result<Box<Expr>> {
    expr(value).map(Box::new)
}

fn expr(value: &Value) -> Result<Expr> {
    let node = Node::new(value)?;
    if let Some(flavor) = function_flavor(&node) {
        return Ok(Expr::new(ExprKind::Unsupported(flavor.to_string()), node.span()));
    }
    let kind = match node.kind {
        "Identifier" => ExprKind::Ident(node.str("name")?.to_string()),
        "Literal" => literal(&node)?,
        "ArrayExpression" => ExprKind::Array(
            node.array("elements")?
                .iter()
                .map(|el| if el.is_null() { Ok(None) } else { expr(el).map(Some) })
                .collect::<Result<_>>()?,
        ),
        "ObjectExpression" => object(&node)?,
        "FunctionExpression" => ExprKind::Function(Box::new(function(&node)?)),
        "ArrowFunctionExpression" => {
            let body = node.node("body")?;
            let body = if body.kind == "BlockStatement" {
                ArrowBody::Block(stmt_list(body.array("body")?)?)
            } else {
                ArrowBody::Expr(boxed(body.value)?)
            };
            ExprKind::Arrow(Box::new(ArrowFunction {
                params: params(&node)?,
                body,
                span: node.span(),
            }))
        }
        "UnaryExpression" => {
            let op = node.str("operator")?;
            let op = UnaryOp::from_token(op).ok_or_else(|| node.invalid("operator", "a unary operator"))?;
            ExprKind::Unary {
                op,
                arg: boxed(node.get("argument")?)?,
            }
        }
        "BinaryExpression" | "LogicalExpression" => {
            let op = BinaryOp::from_token(node.str("operator")?)
                .ok_or_else(|| node.invalid("operator", "a binary operator"))?;
            ExprKind::Binary {
                op,
                left: boxed(node.get("left")?)?,
                right: boxed(node.get("right")?)?,
            }
        }
        "AssignmentExpression" => {
            let op = AssignOp::from_token(node.str("operator")?)
                .ok_or_else(|| node.invalid("operator", "an assignment operator"))?;
            let target = node.node("left")?;
            if !matches!(target.kind, "Identifier" | "MemberExpression") {
                return Err(LoadError::UnsupportedPattern {
                    kind: target.kind.to_string(),
                    span: target.span(),
                });
            }
            ExprKind::Assign {
                op,
                target: boxed(target.value)?,
                value: boxed(node.get("right")?)?,
            }
        }
        "UpdateExpression" => {
            let op = match node.str("operator")? {
                "++" => UpdateOp::Increment,
                "--" => UpdateOp::Decrement,
                _ => return Err(node.invalid("operator", "\"++\" or \"--\"")),
            };
            ExprKind::Update {
                op,
                prefix: node.bool("prefix"),
                arg: boxed(node.get("argument")?)?,
            }
        }
        "ConditionalExpression" => ExprKind::Conditional {
            test: boxed(node.get("test")?)?,
            consequent: boxed(node.get("consequent")?)?,
            alternate: boxed(node.get("alternate")?)?,
        },
        "SequenceExpression" => ExprKind::Sequence(expr_list(node.array("expressions")?)?),
        "MemberExpression" => {
            let property = if node.bool("computed") {
                MemberProperty::Computed(boxed(node.get("property")?)?)
            } else {
                let prop = node.node("property")?;
                if prop.kind != "Identifier" {
                    // `a.#private` and friends
                    return Ok(Expr::new(ExprKind::Unsupported(prop.kind.to_string()), prop.span()));
                }
                MemberProperty::Named(prop.str("name")?.to_string())
            };
            ExprKind::Member {
                object: boxed(node.get("object")?)?,
                property,
            }
        }
        "CallExpression" if !node.bool("optional") => ExprKind::Call {
            callee: boxed(node.get("callee")?)?,
            args: expr_list(node.array("arguments")?)?,
        },
        "NewExpression" => ExprKind::New {
            callee: boxed(node.get("callee")?)?,
            args: expr_list(node.array("arguments")?)?,
        },
        other => ExprKind::Unsupported(other.to_string()),
    };
    Ok(Expr::new(kind, node.span()))
}

fn literal(node: &Node<'_>) -> Result<ExprKind> {
    if let Some(regex) = node.opt("regex") {
        let field = |name: &'static str| {
            regex
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| node.invalid("regex", "an object with `pattern` and `flags`"))
        };
        return Ok(ExprKind::Regex {
            pattern: field("pattern")?,
            flags: field("flags")?,
        });
    }
    if node.opt("bigint").is_some() {
        return Ok(ExprKind::Unsupported("BigIntLiteral".to_string()));
    }
    Ok(match node.value.get("value") {
        None | Some(Value::Null) => ExprKind::Null,
        Some(Value::Bool(b)) => ExprKind::Bool(*b),
        Some(Value::Number(n)) => ExprKind::Number(
            n.as_f64()
                .ok_or_else(|| node.invalid("value", "a finite number"))?,
        ),
        Some(Value::String(s)) => ExprKind::String(s.clone()),
        Some(_) => return Err(node.invalid("value", "a literal value")),
    })
}

fn object(node: &Node<'_>) -> Result<ExprKind> {
    let mut properties = Vec::new();
    for value in node.array("properties")? {
        let prop = Node::new(value)?;
        // Spread elements, getters/setters and methods have no rendering rule.
        if prop.kind != "Property" || prop.str("kind")? != "init" || prop.bool("method") {
            let kind = if prop.kind == "Property" { "MethodDefinition" } else { prop.kind };
            return Ok(ExprKind::Unsupported(kind.to_string()));
        }
        let key = if prop.bool("computed") {
            PropertyKey::Computed(boxed(prop.get("key")?)?)
        } else {
            let key = prop.node("key")?;
            match key.kind {
                "Identifier" => PropertyKey::Ident(key.str("name")?.to_string()),
                "Literal" => match literal(&key)? {
                    ExprKind::String(s) => PropertyKey::String(s),
                    ExprKind::Number(n) => PropertyKey::Number(n),
                    _ => return Err(key.invalid("value", "a string or number key")),
                },
                other => return Ok(ExprKind::Unsupported(other.to_string())),
            }
        };
        properties.push(Property {
            key,
            value: expr(prop.get("value")?)?,
            shorthand: prop.bool("shorthand"),
        });
    }
    Ok(ExprKind::Object(properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str) -> Value {
        json!({"type": "Identifier", "name": name})
    }

    fn program(body: Vec<Value>) -> Value {
        json!({"type": "Program", "sourceType": "script", "body": body})
    }

    #[test]
    fn test_loads_declaration_with_span() {
        let ast = program(vec![json!({
            "type": "VariableDeclaration",
            "start": 0,
            "end": 12,
            "kind": "const",
            "declarations": [{
                "type": "VariableDeclarator",
                "id": ident("a"),
                "init": {"type": "Literal", "value": 1, "raw": "1"}
            }]
        })]);
        let program = program_from_value(&ast).unwrap();
        assert_eq!(program.body.len(), 1);
        assert_eq!(program.body[0].span, Span::new(0, 12));
        let StmtKind::Var(decl) = &program.body[0].kind else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.kind, VarKind::Const);
        assert_eq!(decl.decls[0].name, "a");
        assert_eq!(decl.decls[0].init.as_ref().map(|e| &e.kind), Some(&ExprKind::Number(1.0)));
    }

    #[test]
    fn test_unknown_statement_becomes_unsupported() {
        let ast = program(vec![json!({
            "type": "ClassDeclaration",
            "id": ident("A"),
            "superClass": null,
            "body": {"type": "ClassBody", "body": []}
        })]);
        let program = program_from_value(&ast).unwrap();
        assert_eq!(program.body[0].kind, StmtKind::Unsupported("ClassDeclaration".into()));
    }

    #[test]
    fn test_if_without_alternate() {
        let ast = program(vec![json!({
            "type": "IfStatement",
            "test": ident("x"),
            "consequent": {"type": "EmptyStatement"},
            "alternate": null
        })]);
        let program = program_from_value(&ast).unwrap();
        let StmtKind::If { alternate, .. } = &program.body[0].kind else {
            panic!("expected an if statement");
        };
        assert!(alternate.is_none());
    }

    #[test]
    fn test_for_loop_init_variants() {
        let with_decl = json!({
            "type": "ForStatement",
            "init": {
                "type": "VariableDeclaration",
                "kind": "let",
                "declarations": [{"type": "VariableDeclarator", "id": ident("i"), "init": null}]
            },
            "test": null,
            "update": null,
            "body": {"type": "EmptyStatement"}
        });
        let with_expr = json!({
            "type": "ForStatement",
            "init": {"type": "AssignmentExpression", "operator": "=", "left": ident("i"), "right": {"type": "Literal", "value": 0}},
            "test": null,
            "update": null,
            "body": {"type": "EmptyStatement"}
        });
        let program = program_from_value(&program(vec![with_decl, with_expr])).unwrap();
        assert!(matches!(
            &program.body[0].kind,
            StmtKind::For { init: Some(LoopInit::Declaration(_)), .. }
        ));
        assert!(matches!(
            &program.body[1].kind,
            StmtKind::For { init: Some(LoopInit::Expression(_)), .. }
        ));
    }

    #[test]
    fn test_arrow_concise_and_block_bodies() {
        let concise = json!({
            "type": "ArrowFunctionExpression",
            "expression": true,
            "params": [ident("x")],
            "body": ident("x")
        });
        let block = json!({
            "type": "ArrowFunctionExpression",
            "expression": false,
            "params": [],
            "body": {"type": "BlockStatement", "body": []}
        });
        let ExprKind::Arrow(arrow) = expr(&concise).unwrap().kind else {
            panic!("expected an arrow");
        };
        assert!(matches!(arrow.body, ArrowBody::Expr(_)));
        assert_eq!(arrow.params[0].name, "x");
        let ExprKind::Arrow(arrow) = expr(&block).unwrap().kind else {
            panic!("expected an arrow");
        };
        assert!(matches!(arrow.body, ArrowBody::Block(_)));
    }

    #[test]
    fn test_logical_maps_to_binary() {
        let value = json!({"type": "LogicalExpression", "operator": "&&", "left": ident("a"), "right": ident("b")});
        let ExprKind::Binary { op, .. } = expr(&value).unwrap().kind else {
            panic!("expected a binary expression");
        };
        assert!(op.is_logical());
    }

    #[test]
    fn test_literals() {
        let string = json!({"type": "Literal", "value": "hi", "raw": "'hi'"});
        let null = json!({"type": "Literal", "value": null, "raw": "null"});
        let regex = json!({"type": "Literal", "value": {}, "raw": "/a+/g", "regex": {"pattern": "a+", "flags": "g"}});
        assert_eq!(expr(&string).unwrap().kind, ExprKind::String("hi".into()));
        assert_eq!(expr(&null).unwrap().kind, ExprKind::Null);
        assert_eq!(
            expr(&regex).unwrap().kind,
            ExprKind::Regex {
                pattern: "a+".into(),
                flags: "g".into()
            }
        );
    }

    #[test]
    fn test_destructuring_is_rejected() {
        let ast = program(vec![json!({
            "type": "VariableDeclaration",
            "kind": "let",
            "declarations": [{
                "type": "VariableDeclarator",
                "id": {"type": "ArrayPattern", "start": 4, "end": 10, "elements": []},
                "init": null
            }]
        })]);
        let err = program_from_value(&ast).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnsupportedPattern { ref kind, span } if kind == "ArrayPattern" && span == Span::new(4, 10)
        ));
    }

    #[test]
    fn test_missing_field_is_reported() {
        let ast = program(vec![json!({"type": "WhileStatement", "body": {"type": "EmptyStatement"}})]);
        let err = program_from_value(&ast).unwrap_err();
        assert_eq!(err.to_string(), "WhileStatement node is missing required field `test`");
    }

    #[test]
    fn test_root_must_be_program() {
        let err = program_from_value(&ident("x")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "type", .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(program_from_str("{not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_labelled_break_is_unsupported() {
        let ast = program(vec![json!({"type": "BreakStatement", "label": ident("outer")})]);
        let program = program_from_value(&ast).unwrap();
        assert_eq!(program.body[0].kind, StmtKind::Unsupported("BreakStatement".into()));
    }

    #[test]
    fn test_async_and_generator_functions_are_unsupported() {
        let async_arrow = json!({
            "type": "ArrowFunctionExpression",
            "async": true,
            "generator": false,
            "expression": true,
            "params": [ident("x")],
            "body": ident("x")
        });
        let generator_expr = json!({
            "type": "FunctionExpression",
            "id": null,
            "async": false,
            "generator": true,
            "params": [],
            "body": {"type": "BlockStatement", "body": []}
        });
        assert_eq!(
            expr(&async_arrow).unwrap().kind,
            ExprKind::Unsupported("AsyncFunction".into())
        );
        assert_eq!(
            expr(&generator_expr).unwrap().kind,
            ExprKind::Unsupported("GeneratorFunction".into())
        );

        let ast = program(vec![json!({
            "type": "FunctionDeclaration",
            "id": ident("g"),
            "async": false,
            "generator": true,
            "params": [],
            "body": {"type": "BlockStatement", "body": []}
        })]);
        let program = program_from_value(&ast).unwrap();
        assert_eq!(
            program.body[0].kind,
            StmtKind::Unsupported("GeneratorFunction".into())
        );
    }

    #[test]
    fn test_plain_function_flags_are_accepted() {
        let value = json!({
            "type": "FunctionExpression",
            "id": null,
            "async": false,
            "generator": false,
            "params": [],
            "body": {"type": "BlockStatement", "body": []}
        });
        assert!(matches!(expr(&value).unwrap().kind, ExprKind::Function(_)));
    }

    #[test]
    fn test_object_with_method_is_unsupported() {
        let value = json!({
            "type": "ObjectExpression",
            "properties": [{
                "type": "Property",
                "kind": "get",
                "method": false,
                "computed": false,
                "shorthand": false,
                "key": ident("x"),
                "value": {"type": "FunctionExpression", "id": null, "params": [], "body": {"type": "BlockStatement", "body": []}}
            }]
        });
        assert_eq!(
            expr(&value).unwrap().kind,
            ExprKind::Unsupported("MethodDefinition".into())
        );
    }
}
