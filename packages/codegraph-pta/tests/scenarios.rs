//! End-to-end scenarios: assignments, fields, containers and virtual dispatch

mod common;

use codegraph_pta::features::ir::{LValue, RValue, Stmt};
use codegraph_pta::features::points_to::domain::AllocationSite;
use codegraph_pta::{ClassSignature, FieldSignature, MethodSignature, Program, PtaConfig};
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_copy_shares_single_allocation() {
    let pta = solve(scenario_a(), PtaConfig::default());
    let main = main_sig();

    let a = pta.points_to_by_name(&main, "a");
    let b = pta.points_to_by_name(&main, "b");
    assert_eq!(a.len(), 1);
    assert_eq!(a, b);

    // Keyed by the `new Foo()` statement, the first statement of main
    let stmt = pta.allocation_stmt(a[0]).unwrap();
    assert_eq!(stmt.index, 0);
    assert_eq!(Some(stmt.method), pta.program().method_id(&main));
}

#[test]
fn test_field_load_sees_stored_object() {
    let pta = solve(scenario_b(), PtaConfig::default());
    assert_points_to_classes(&pta, &main_sig(), "x", &["D"]);

    let c = pta.points_to_by_name(&main_sig(), "c");
    let stored = pta.field_points_to(c[0], &FieldSignature::new("C", "f"));
    assert_eq!(class_names(&pta, &stored), vec!["D".to_string()]);
}

#[test]
fn test_fields_are_per_object() {
    let pta = solve(scenario_c(), PtaConfig::default());
    assert_points_to_classes(&pta, &main_sig(), "x1", &["D1"]);
    assert_points_to_classes(&pta, &main_sig(), "x2", &["D2"]);
}

#[test]
fn test_container_merges_elements() {
    let pta = solve(scenario_d(), PtaConfig::default());
    let s = pta.points_to_by_name(&main_sig(), "s");
    assert_eq!(s.len(), 1);

    let elements = pta.container_points_to(s[0]);
    assert_eq!(
        class_names(&pta, &elements),
        vec!["E".to_string(), "F".to_string()]
    );
}

#[test]
fn test_foreach_callback_receives_elements() {
    let pta = solve(scenario_d(), PtaConfig::default());
    let visit = MethodSignature::function("visit");
    assert_points_to_classes(&pta, &visit, "elem", &["E", "F"]);
    assert_points_to_classes(&pta, &visit, "seen", &["E", "F"]);
    assert!(pta
        .call_graph()
        .is_reachable(pta.program().method_id(&visit).unwrap()));
}

#[test]
fn test_virtual_dispatch_follows_receiver_classes() {
    let pta = solve(scenario_e(), PtaConfig::default());
    let main = main_sig();

    assert_calls(&pta, &main, &MethodSignature::new("Dog", "speak"));
    assert_calls(&pta, &main, &MethodSignature::new("Cat", "speak"));
    assert_not_calls(&pta, &main, &MethodSignature::new("Fish", "speak"));
    assert_not_calls(&pta, &main, &MethodSignature::new("Animal", "speak"));

    // Each override sees only its own receiver
    assert_points_to_classes(&pta, &MethodSignature::new("Dog", "speak"), "this", &["Dog"]);
    assert_points_to_classes(&pta, &MethodSignature::new("Cat", "speak"), "this", &["Cat"]);
    assert_points_to_classes(&pta, &main, "r", &["Cat", "Dog"]);
}

#[test]
fn test_virtual_dispatch_under_every_policy() {
    for config in [
        PtaConfig::default(),
        PtaConfig::from_preset(codegraph_pta::Preset::Fast),
        PtaConfig::from_preset(codegraph_pta::Preset::Thorough),
    ] {
        let pta = solve(scenario_e(), config);
        let main = main_sig();
        assert_calls(&pta, &main, &MethodSignature::new("Dog", "speak"));
        assert_calls(&pta, &main, &MethodSignature::new("Cat", "speak"));
        assert_not_calls(&pta, &main, &MethodSignature::new("Fish", "speak"));
    }
}

#[test]
fn test_demo_program_loads_and_solves() {
    let json = include_str!("../../../demos/sample.json");
    let program = codegraph_pta::Program::from_json_str(json).unwrap();
    let pta = solve(program, PtaConfig::default());

    let main = main_sig();
    assert_points_to_classes(&pta, &main, "x", &["A"]);
    assert_points_to_classes(&pta, &main, "y", &["B"]);
    assert_points_to_classes(&pta, &MethodSignature::function("visit"), "e", &["A"]);
}

#[test]
fn test_field_meets_across_base_and_subclass_signatures() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("B", None, &["f"]);
    pb.class("S", Some("B"), &[]);
    pb.class("D", None, &[]);
    pb.class("E", None, &[]);
    let main = pb.function("main", |b| {
        b.new_object("s", "S")
            .new_object("d", "D")
            .new_object("e", "E")
            .store("s", FieldSignature::new("B", "f"), "d")
            .load("x", "s", FieldSignature::new("S", "f"))
            // `g` is declared nowhere; the property still belongs to the object
            .store("s", FieldSignature::new("S", "g"), "e")
            .load("y", "s", FieldSignature::new("B", "g"));
    });
    pb.entry(main.clone());
    let pta = solve(pb.build().unwrap(), PtaConfig::default());

    assert_points_to_classes(&pta, &main, "x", &["D"]);
    assert_points_to_classes(&pta, &main, "y", &["E"]);
    let s = pta.points_to_by_name(&main, "s");
    for spelled in [FieldSignature::new("S", "f"), FieldSignature::new("B", "f")] {
        assert_eq!(class_names(&pta, &pta.field_points_to(s[0], &spelled)), vec!["D".to_string()]);
    }
}

#[test]
fn test_heap_store_of_allocation_keeps_object() {
    let json = r#"{
        "classes": [{ "signature": "C", "fields": [{ "name": "f" }] }, { "signature": "D" }],
        "methods": [{
            "signature": { "class": "%dflt", "name": "main" },
            "is_static": true,
            "body": {
                "locals": [{ "name": "c" }, { "name": "x" }],
                "stmts": [
                    { "assign": { "lhs": { "local": 0 }, "rhs": { "new": "C" } } },
                    { "assign": {
                        "lhs": { "instance_field": { "base": 0, "field": { "class": "C", "name": "f" } } },
                        "rhs": { "new": "D" }
                    } },
                    { "assign": {
                        "lhs": { "local": 1 },
                        "rhs": { "instance_field": { "base": 0, "field": { "class": "C", "name": "f" } } }
                    } }
                ]
            }
        }],
        "entry_points": [{ "class": "%dflt", "name": "main" }]
    }"#;
    let pta = solve(Program::from_json_str(json).unwrap(), PtaConfig::default());

    assert_points_to_classes(&pta, &main_sig(), "x", &["D"]);
    // Allocated at the store itself
    let x = pta.points_to_by_name(&main_sig(), "x");
    assert_eq!(pta.allocation_stmt(x[0]).map(|s| s.index), Some(1));
}

// ========== EDGE CASES ==========

#[test]
fn test_nested_heap_writes_and_unknown_function_value() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("C", None, &["f", "g"]);
    pb.class("D", None, &[]);
    pb.class("E", None, &[]);
    pb.class("G", None, &["slot"]);
    let (f, g) = (FieldSignature::new("C", "f"), FieldSignature::new("C", "g"));
    let slot = FieldSignature::new("G", "slot");
    let main = pb.function("main", |b| {
        b.new_object("c", "C").new_object("d", "D").new_array("arr");
        let c = b.local("c");
        let arr = b.local("arr");
        b.stmt(Stmt::Assign {
            lhs: LValue::InstanceField {
                base: c,
                field: f.clone(),
            },
            rhs: RValue::New(ClassSignature::new("E")),
        })
        // c.g = c.f
        .stmt(Stmt::Assign {
            lhs: LValue::InstanceField {
                base: c,
                field: g.clone(),
            },
            rhs: RValue::InstanceField {
                base: c,
                field: f.clone(),
            },
        })
        // arr[*] = c.g
        .stmt(Stmt::Assign {
            lhs: LValue::ArrayElem { base: arr },
            rhs: RValue::InstanceField {
                base: c,
                field: g.clone(),
            },
        })
        // G.slot = <function value of an undeclared method>
        .stmt(Stmt::Assign {
            lhs: LValue::StaticField(slot.clone()),
            rhs: RValue::MethodRef(MethodSignature::function("missing")),
        })
        .func_ref("fp", MethodSignature::function("missing"))
        .call_ptr(Some("r"), "fp", &["d"])
        .load("x", "c", f.clone())
        .load("y", "c", g.clone())
        .load_elem("z", "arr")
        .load_static("w", slot.clone());
    });
    pb.entry(main.clone());

    let mut pta = codegraph_pta::PointerAnalysis::new(pb.build().unwrap(), PtaConfig::default()).unwrap();
    assert!(pta.solve().unwrap().reached_fixpoint);

    assert_points_to_classes(&pta, &main, "x", &["E"]);
    assert_points_to_classes(&pta, &main, "y", &["E"]);
    assert_points_to_classes(&pta, &main, "z", &["E"]);
    assert_points_to_classes(&pta, &main, "d", &["D"]);
    assert!(pta.points_to_by_name(&main, "fp").is_empty());
    assert!(pta.points_to_by_name(&main, "r").is_empty());
    assert!(pta.points_to_by_name(&main, "w").is_empty());
    assert!(pta.static_field_points_to(&slot).is_empty());
}

#[test]
fn test_load_from_unwritten_field_is_empty() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("C", None, &["f", "g"]);
    let main = pb.function("main", |b| {
        b.new_object("c", "C")
            .new_object("d", "C")
            .store("c", FieldSignature::new("C", "f"), "d")
            .load("x", "c", FieldSignature::new("C", "g"));
    });
    pb.entry(main.clone());
    let pta = solve(pb.build().unwrap(), PtaConfig::default());
    assert!(pta.points_to_by_name(&main, "x").is_empty());
}

#[test]
fn test_static_fields_are_global() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("G", None, &[]);
    pb.class("T", None, &[]);
    let field = FieldSignature::new("G", "instance");
    let writer = pb.function("writer", |b| {
        b.new_object("t", "T").store_static(field.clone(), "t");
    });
    let reader = pb.function("reader", |b| {
        b.load_static("seen", field.clone());
    });
    let main = pb.function("main", |b| {
        b.call_static(None, writer.clone(), &[])
            .call_static(None, reader.clone(), &[]);
    });
    pb.entry(main);
    let pta = solve(pb.build().unwrap(), PtaConfig::default());

    assert_points_to_classes(&pta, &reader, "seen", &["T"]);
    assert_eq!(class_names(&pta, &pta.static_field_points_to(&field)), vec!["T".to_string()]);
}

#[test]
fn test_array_elements_merge() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("A", None, &[]);
    pb.class("B", None, &[]);
    let main = pb.function("main", |b| {
        b.new_array("arr")
            .new_object("a", "A")
            .new_object("b", "B")
            .store_elem("arr", "a")
            .store_elem("arr", "b")
            .load_elem("x", "arr");
    });
    pb.entry(main.clone());
    let pta = solve(pb.build().unwrap(), PtaConfig::default());

    assert_points_to_classes(&pta, &main, "x", &["A", "B"]);
    let arr = pta.points_to_by_name(&main, "arr");
    assert!(matches!(
        pta.allocation_site(arr[0]),
        Some(AllocationSite::NewArray { .. })
    ));
}

#[test]
fn test_load_registered_before_store_still_sees_value() {
    let mut pb = codegraph_pta::ProgramBuilder::new();
    pb.class("C", None, &["f"]);
    pb.class("D", None, &[]);
    let f = FieldSignature::new("C", "f");
    let main = pb.function("main", |b| {
        b.load("x", "c", f.clone())
            .store("c", f.clone(), "d")
            .new_object("d", "D")
            .new_object("c", "C");
    });
    pb.entry(main.clone());
    let pta = solve(pb.build().unwrap(), PtaConfig::default());
    assert_points_to_classes(&pta, &main, "x", &["D"]);
}
