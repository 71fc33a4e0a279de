//! Transform benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rebind_hygiene::{program_from_str, transform, BinaryOp, Expr, Program, Stmt, VarKind};

const SAMPLE_ESTREE: &str = r#"{
  "type": "Program",
  "body": [
    {
      "type": "FunctionDeclaration",
      "id": {"type": "Identifier", "name": "fibonacci"},
      "params": [{"type": "Identifier", "name": "n"}],
      "body": {"type": "BlockStatement", "body": [
        {
          "type": "IfStatement",
          "test": {"type": "BinaryExpression", "operator": "<=",
                   "left": {"type": "Identifier", "name": "n"},
                   "right": {"type": "Literal", "value": 1}},
          "consequent": {"type": "ReturnStatement", "argument": {"type": "Identifier", "name": "n"}},
          "alternate": null
        },
        {
          "type": "ReturnStatement",
          "argument": {
            "type": "BinaryExpression", "operator": "+",
            "left": {"type": "CallExpression", "optional": false,
                     "callee": {"type": "Identifier", "name": "fibonacci"},
                     "arguments": [{"type": "BinaryExpression", "operator": "-",
                                    "left": {"type": "Identifier", "name": "n"},
                                    "right": {"type": "Literal", "value": 1}}]},
            "right": {"type": "CallExpression", "optional": false,
                      "callee": {"type": "Identifier", "name": "fibonacci"},
                      "arguments": [{"type": "BinaryExpression", "operator": "-",
                                     "left": {"type": "Identifier", "name": "n"},
                                     "right": {"type": "Literal", "value": 2}}]}
          }
        }
      ]}
    },
    {
      "type": "VariableDeclaration", "kind": "const",
      "declarations": [{
        "type": "VariableDeclarator",
        "id": {"type": "Identifier", "name": "doubled"},
        "init": {
          "type": "CallExpression", "optional": false,
          "callee": {"type": "MemberExpression", "computed": false,
                     "object": {"type": "ArrayExpression", "elements": [
                       {"type": "Literal", "value": 1},
                       {"type": "Literal", "value": 2},
                       {"type": "Literal", "value": 3}]},
                     "property": {"type": "Identifier", "name": "map"}},
          "arguments": [{
            "type": "ArrowFunctionExpression", "expression": true,
            "params": [{"type": "Identifier", "name": "n"}],
            "body": {"type": "BinaryExpression", "operator": "*",
                     "left": {"type": "Identifier", "name": "n"},
                     "right": {"type": "Literal", "value": 2}}
          }]
        }
      }]
    }
  ]
}"#;

/// `depth` nested blocks, each shadowing the same names.
fn nested_program(depth: usize) -> Program {
    let mut body = vec![Stmt::expr(Expr::binary(
        BinaryOp::Add,
        Expr::ident("a"),
        Expr::ident("b"),
    ))];
    for _ in 0..depth {
        body = vec![
            Stmt::var(VarKind::Let, "a", Some(Expr::number(1.0))),
            Stmt::var(VarKind::Let, "b", Some(Expr::ident("a"))),
            Stmt::block(body),
        ];
    }
    Program::new(body)
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Bytes(SAMPLE_ESTREE.len() as u64));

    group.bench_function("sample", |b| {
        b.iter(|| program_from_str(black_box(SAMPLE_ESTREE)).unwrap())
    });

    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    let sample = program_from_str(SAMPLE_ESTREE).unwrap();
    group.bench_function("sample", |b| b.iter(|| transform(black_box(&sample)).unwrap()));

    let nested = nested_program(64);
    group.throughput(Throughput::Elements(64));
    group.bench_function("nested_64", |b| {
        b.iter(|| transform(black_box(&nested)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_transform);
criterion_main!(benches);
