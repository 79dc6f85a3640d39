//! Mutation passes must leave the tree exactly as they found it

use pretty_assertions::assert_eq;
use repair_seq::mutation::{mutant_sequences, Mutant, MutationGenerator};
use repair_seq::{generate_sequence, Node, NodeType};
use serde_json::{json, Value};

fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

fn stmt(name: &str) -> Value {
    json!({ "type": "ExpressionStatement", "expression": ident(name) })
}

fn block(body: Vec<Value>) -> Value {
    json!({ "type": "BlockStatement", "body": body })
}

fn inserted_try(body: Vec<Value>) -> Value {
    json!({
        "type": "TryStatement",
        "change-noprop": "INSERTED",
        "block": block(body),
        "handler": {
            "type": "CatchClause",
            "param": ident("e"),
            "body": block(vec![stmt("report")])
        },
        "finalizer": null
    })
}

fn parse(value: Value) -> Node {
    Node::from_value(value).expect("valid tree")
}

fn sequence_of(value: Value) -> Vec<String> {
    generate_sequence(&parse(value)).unwrap().into_inner()
}

#[test]
fn test_try_in_function_body_is_flattened_and_restored() {
    let mut ast = parse(json!({
        "type": "FunctionDeclaration",
        "id": ident("run"),
        "params": [],
        "body": block(vec![stmt("a"), inserted_try(vec![stmt("b")]), stmt("c")])
    }));
    let before = ast.clone();

    let mutants: Vec<Mutant> = MutationGenerator::new(&mut ast)
        .collect::<Result<_, _>>()
        .unwrap();

    let expected = sequence_of(json!({
        "type": "FunctionDeclaration",
        "id": ident("run"),
        "params": [],
        "body": block(vec![stmt("a"), stmt("b"), stmt("c")])
    }));
    assert_eq!(mutants.len(), 1);
    assert_eq!(mutants[0].sequence().unwrap().as_slice(), expected.as_slice());
    assert_eq!(ast, before);
}

#[test]
fn test_every_candidate_is_visited_in_order() {
    let mut ast = parse(json!({
        "type": "Program",
        "body": [
            inserted_try(vec![stmt("first")]),
            {
                "type": "IfStatement",
                "test": ident("ok"),
                "consequent": inserted_try(vec![stmt("second"), stmt("third")]),
                "alternate": null
            },
            {
                "type": "WhileStatement",
                "test": ident("more"),
                "body": inserted_try(vec![stmt("fourth")])
            }
        ]
    }));
    let before = ast.clone();

    let sequences = mutant_sequences(&mut ast).unwrap();
    let rendered: Vec<String> = sequences.iter().map(ToString::to_string).collect();

    assert_eq!(rendered.len(), 3);
    assert!(rendered[0].starts_with("first ; if ( ok ) ~INSERTED_START~ try"));
    assert!(rendered[1].contains("if ( ok ) { second ; third ; } while"));
    assert!(rendered[2].ends_with("while ( more ) fourth ;"));
    assert_eq!(ast, before);
}

#[test]
fn test_unsupported_owner_is_skipped_and_consumed() {
    let mut ast = parse(json!({
        "type": "Program",
        "body": [{
            "type": "SwitchStatement",
            "discriminant": ident("k"),
            "cases": [{
                "type": "SwitchCase",
                "test": null,
                "consequent": [inserted_try(vec![stmt("x")])]
            }]
        }, inserted_try(vec![stmt("y")])]
    }));
    let before = ast.clone();

    let mut generator = MutationGenerator::new(&mut ast);
    assert_eq!(generator.len(), 2);

    let first = generator.next().unwrap().unwrap();
    assert_eq!(
        first,
        Mutant::Skipped {
            owner: NodeType::SwitchCase
        }
    );
    assert_eq!(generator.remaining(), 1);

    let second = generator.next().unwrap().unwrap();
    assert!(second.sequence().is_some());
    assert!(generator.next().is_none());
    drop(generator);

    assert_eq!(ast, before);
}

#[test]
fn test_trees_without_inserted_try_have_no_mutants() {
    let mut ast = parse(json!({
        "type": "Program",
        "body": [{
            "type": "TryStatement",
            "change-noprop": "UNCHANGED",
            "block": block(vec![stmt("x")]),
            "handler": null,
            "finalizer": block(vec![])
        }]
    }));

    assert!(mutant_sequences(&mut ast).unwrap().is_empty());
}

fn guarded_text(body: &str) -> String {
    format!(
        "~INSERTED_START~ try {{ {} }} catch ( e ) {{ report ; }} ~INSERTED_END~",
        body
    )
}

#[test]
fn test_loop_bodies_promote_or_keep_the_block() {
    let mut ast = parse(json!({
        "type": "Program",
        "body": [
            {
                "type": "ForStatement",
                "init": null,
                "test": ident("t"),
                "update": null,
                "body": inserted_try(vec![stmt("a")])
            },
            {
                "type": "ForInStatement",
                "left": ident("k"),
                "right": ident("o"),
                "body": inserted_try(vec![stmt("b"), stmt("c")])
            }
        ]
    }));
    let before = ast.clone();

    let rendered: Vec<String> = mutant_sequences(&mut ast)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        rendered,
        [
            format!("for ( ; t ; ) a ; for ( k in o ) {}", guarded_text("b ; c ;")),
            format!("for ( ; t ; ) {} for ( k in o ) {{ b ; c ; }}", guarded_text("a ;")),
        ]
    );
    assert_eq!(ast, before);
}

#[test]
fn test_nested_inserted_tries_are_unwrapped_one_at_a_time() {
    let mut ast = parse(json!({
        "type": "Program",
        "body": [inserted_try(vec![inserted_try(vec![stmt("d")])])]
    }));
    let before = ast.clone();

    let rendered: Vec<String> = mutant_sequences(&mut ast)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    // outer removed, then inner removed; both leave a single try around `d`
    let single = guarded_text("d ;");
    assert_eq!(rendered, [single.clone(), single]);
    assert_eq!(ast, before);
}
