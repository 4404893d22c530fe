//! Fixture programs
//!
//! Small programs built with `ProgramBuilder`. Every fixture's entry point is
//! the top-level function `main`.

use codegraph_pta::features::ir::{Param, Type};
use codegraph_pta::{FieldSignature, MethodSignature, Program, ProgramBuilder};

pub fn main_sig() -> MethodSignature {
    MethodSignature::function("main")
}

/// `a = new Foo(); b = a;`
pub fn scenario_a() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Foo", None, &[]);
    let main = pb.function("main", |b| {
        b.new_object("a", "Foo").assign("b", "a");
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `c = new C(); d = new D(); c.f = d; x = c.f;`
pub fn scenario_b() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("C", None, &["f"]);
    pb.class("D", None, &[]);
    let f = FieldSignature::new("C", "f");
    let main = pb.function("main", |b| {
        b.new_object("c", "C")
            .new_object("d", "D")
            .store("c", f.clone(), "d")
            .load("x", "c", f.clone());
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// Two `C` instances holding different objects in `f`
pub fn scenario_c() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("C", None, &["f"]);
    pb.class("D1", None, &[]);
    pb.class("D2", None, &[]);
    let f = FieldSignature::new("C", "f");
    let main = pb.function("main", |b| {
        b.new_object("c1", "C")
            .new_object("c2", "C")
            .new_object("d1", "D1")
            .new_object("d2", "D2")
            .store("c1", f.clone(), "d1")
            .store("c2", f.clone(), "d2")
            .load("x1", "c1", f.clone())
            .load("x2", "c2", f.clone());
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `s = new Set(); s.add(new E()); s.add(new F()); s.forEach(visit)`
pub fn scenario_d() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("E", None, &[]);
    pb.class("F", None, &[]);
    let add = MethodSignature::new("Set", "add");
    let for_each = MethodSignature::new("Set", "forEach");
    let visit = pb.function("visit", |b| {
        b.param("elem").assign("seen", "elem").ret(None);
    });
    let main = pb.function("main", |b| {
        b.new_object("s", "Set")
            .new_object("e", "E")
            .new_object("f", "F")
            .call(None, "s", add.clone(), &["e"])
            .call(None, "s", add.clone(), &["f"])
            .func_ref("cb", visit.clone())
            .call(None, "s", for_each.clone(), &["cb"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `x` holds a Dog and a Cat; a Fish is allocated but never flows into `x`
pub fn scenario_e() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Animal", None, &[]);
    pb.class("Dog", Some("Animal"), &[]);
    pb.class("Cat", Some("Animal"), &[]);
    pb.class("Fish", None, &[]);
    for class in ["Animal", "Dog", "Cat", "Fish"] {
        pb.instance_method(class, "speak", |b| {
            b.ret(Some("this"));
        });
    }
    let speak = MethodSignature::new("Animal", "speak");
    let main = pb.function("main", |b| {
        b.new_object("x", "Dog")
            .new_object("x", "Cat")
            .new_object("fish", "Fish")
            .call(Some("r"), "x", speak.clone(), &[]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `x = id(a); y = id(b);` with `id(p) { return p }`
pub fn identity_calls() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("A", None, &[]);
    pb.class("B", None, &[]);
    let id = pb.function("id", |b| {
        b.param("p").ret(Some("p"));
    });
    let main = pb.function("main", |b| {
        b.new_object("a", "A")
            .new_object("b", "B")
            .call_static(Some("x"), id.clone(), &["a"])
            .call_static(Some("y"), id.clone(), &["b"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `main` calls `wrap` twice and `wrap` calls `id`; only k >= 2 separates them
pub fn nested_identity_calls() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("A", None, &[]);
    pb.class("B", None, &[]);
    let id = pb.function("id", |b| {
        b.param("p").ret(Some("p"));
    });
    let wrap = pb.function("wrap", |b| {
        b.param("q")
            .call_static(Some("r"), id.clone(), &["q"])
            .ret(Some("r"));
    });
    let main = pb.function("main", |b| {
        b.new_object("a", "A")
            .new_object("b", "B")
            .call_static(Some("x"), wrap.clone(), &["a"])
            .call_static(Some("y"), wrap.clone(), &["b"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// Two boxes filled through a setter and read through a getter
pub fn box_setter() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Box", None, &["val"]);
    pb.class("A", None, &[]);
    pb.class("B", None, &[]);
    let val = FieldSignature::new("Box", "val");
    let set = pb.instance_method("Box", "set", |b| {
        b.param("v").store("this", val.clone(), "v").ret(None);
    });
    let get = pb.instance_method("Box", "get", |b| {
        b.load("r", "this", val.clone()).ret(Some("r"));
    });
    let main = pb.function("main", |b| {
        b.new_object("b1", "Box")
            .new_object("b2", "Box")
            .new_object("a", "A")
            .new_object("b", "B")
            .call(None, "b1", set.clone(), &["a"])
            .call(None, "b2", set.clone(), &["b"])
            .call(Some("x"), "b1", get.clone(), &[])
            .call(Some("y"), "b2", get.clone(), &[]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `f(p) { n = new Node(); n.next = p; return f(n) }`, unbounded recursion
pub fn recursive_list() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Node", None, &["next"]);
    let next = FieldSignature::new("Node", "next");
    let f = MethodSignature::function("f");
    pb.function("f", |b| {
        b.param("p")
            .new_object("n", "Node")
            .store("n", next.clone(), "p")
            .call_static(Some("r"), f.clone(), &["n"])
            .ret(Some("r"))
            .ret(Some("n"));
    });
    let main = pb.function("main", |b| {
        b.new_object("head", "Node")
            .call_static(Some("list"), f.clone(), &["head"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// Arrays and maps through the container plugin
pub fn array_and_map() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("K", None, &[]);
    pb.class("V", None, &[]);
    pb.class("W", None, &[]);
    let push = MethodSignature::new("Array", "push");
    let pop = MethodSignature::new("Array", "pop");
    let set = MethodSignature::new("Map", "set");
    let get = MethodSignature::new("Map", "get");
    let main = pb.function("main", |b| {
        b.new_array("arr")
            .new_object("v", "V")
            .new_object("w", "W")
            .call(None, "arr", push.clone(), &["v", "w"])
            .call(Some("popped"), "arr", pop.clone(), &[])
            .new_object("m", "Map")
            .new_object("k", "K")
            .call(None, "m", set.clone(), &["k", "w"])
            .call(Some("got"), "m", get.clone(), &["k"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// `net.fetch(url, onDone)` is opaque, returns a `Response` and takes a callback
pub fn sdk_callback() -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Url", None, &[]);
    pb.class("Payload", None, &[]);
    let fetch = MethodSignature::new("net", "fetch");
    pb.opaque(
        fetch.clone(),
        vec![
            Param {
                name: "url".into(),
                ty: Type::class("Url"),
            },
            Param {
                name: "onDone".into(),
                ty: Type::function(),
            },
        ],
        Type::class("Response"),
    );
    let on_done = pb.function("onDone", |b| {
        b.new_object("payload", "Payload").ret(None);
    });
    let main = pb.function("main", |b| {
        b.new_object("url", "Url")
            .func_ref("cb", on_done.clone())
            .call_static(Some("r1"), fetch.clone(), &["url", "cb"])
            .call_static(Some("r2"), fetch.clone(), &["url", "cb"]);
    });
    pb.entry(main);
    pb.build().unwrap()
}

/// Chain `f0 -> f1 -> ... -> f{n-1}`, each storing a fresh object into a field
pub fn call_chain(n: usize) -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Obj", None, &["next"]);
    let next = FieldSignature::new("Obj", "next");
    let mut callee: Option<MethodSignature> = None;
    for i in (0..n).rev() {
        let target = callee.take();
        let sig = pb.function(&format!("f{}", i), |b| {
            b.param("p")
                .new_object("o", "Obj")
                .store("o", next.clone(), "p")
                .load("q", "o", next.clone());
            match target {
                Some(t) => b.call_static(Some("r"), t, &["o"]).ret(Some("r")),
                None => b.ret(Some("q")),
            };
        });
        callee = Some(sig);
    }
    let main = pb.function("main", |b| {
        b.new_object("seed", "Obj");
        if let Some(first) = callee {
            b.call_static(Some("out1"), first.clone(), &["seed"])
                .call_static(Some("out2"), first, &["seed"]);
        }
    });
    pb.entry(main);
    pb.build().unwrap()
}
