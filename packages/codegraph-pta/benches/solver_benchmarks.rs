//! Solver benchmarks
//!
//! Synthetic programs whose size scales with one parameter:
//! - call chains (context growth along depth)
//! - fan-out from a dispatcher (virtual dispatch and container traffic)

use codegraph_pta::config::ContextKind;
use codegraph_pta::{
    FieldSignature, MethodSignature, ParallelAnalyzer, PointerAnalysis, Program, ProgramBuilder,
    PtaConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

/// `main -> f0 -> ... -> f{n-1}`, each frame storing and reloading a field
fn call_chain(n: usize) -> Program {
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
            b.call_static(Some("a"), first.clone(), &["seed"])
                .call_static(Some("b"), first, &["seed"]);
        }
    });
    pb.entry(main);
    pb.build().expect("well-formed chain")
}

/// `n` handler classes pushed into one array, then invoked through `forEach`
/// and through a virtual call on each popped element
fn handler_fan_out(n: usize) -> Program {
    let mut pb = ProgramBuilder::new();
    pb.class("Handler", None, &[]);
    pb.class("Event", None, &[]);
    let handle = MethodSignature::new("Handler", "handle");
    pb.instance_method("Handler", "handle", |b| {
        b.param("e").ret(Some("e"));
    });
    for i in 0..n {
        let class = format!("H{}", i);
        pb.class(&class, Some("Handler"), &[]);
        pb.instance_method(&class, "handle", |b| {
            b.param("e").new_object("out", "Event").ret(Some("out"));
        });
    }
    let visit = pb.function("visit", |b| {
        b.param("h").new_object("e", "Event").call(Some("r"), "h", handle.clone(), &["e"]);
    });
    let main = pb.function("main", |b| {
        b.new_array("hs");
        for i in 0..n {
            let local = format!("h{}", i);
            b.new_object(&local, &format!("H{}", i))
                .call(None, "hs", MethodSignature::new("Array", "push"), &[local.as_str()]);
        }
        b.func_ref("cb", visit.clone())
            .call(None, "hs", MethodSignature::new("Array", "forEach"), &["cb"])
            .call(Some("h"), "hs", MethodSignature::new("Array", "pop"), &[])
            .new_object("ev", "Event")
            .call(Some("res"), "h", handle.clone(), &["ev"]);
    });
    pb.entry(main);
    pb.build().expect("well-formed fan-out")
}

fn solve(program: Arc<Program>, config: PtaConfig) -> usize {
    let mut pta = PointerAnalysis::new(program, config).expect("valid config");
    pta.solve().map(|s| s.facts_propagated).unwrap_or_default()
}

// ============================================================================
// Context policies
// ============================================================================

fn bench_call_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_chain");

    for n in [16usize, 64, 256] {
        let program = Arc::new(call_chain(n));
        group.throughput(Throughput::Elements(n as u64));
        for (name, kind, k) in [
            ("insensitive", ContextKind::Insensitive, 0),
            ("1-callsite", ContextKind::CallSite, 1),
            ("3-callsite", ContextKind::CallSite, 3),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &program, |b, program| {
                b.iter(|| {
                    let config = PtaConfig::default().context(kind).depth(k);
                    black_box(solve(Arc::clone(program), config))
                });
            });
        }
    }

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("handler_fan_out");

    for n in [8usize, 32, 128] {
        let program = Arc::new(handler_fan_out(n));
        group.throughput(Throughput::Elements(n as u64));
        for (name, kind, k) in [
            ("1-callsite", ContextKind::CallSite, 1),
            ("2-object", ContextKind::Object, 2),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &program, |b, program| {
                b.iter(|| {
                    let config = PtaConfig::default().context(kind).depth(k);
                    black_box(solve(Arc::clone(program), config))
                });
            });
        }
    }

    group.finish();
}

// ============================================================================
// Parallel driver
// ============================================================================

fn bench_parallel_programs(c: &mut Criterion) {
    let programs: Vec<Program> = (0..8).map(|_| call_chain(64)).collect();

    c.bench_function("parallel_programs_8x64", |b| {
        b.iter(|| {
            let analyzer = ParallelAnalyzer::new(PtaConfig::default());
            let reports = analyzer
                .analyze_programs(programs.clone())
                .expect("parallel run");
            black_box(reports.len())
        });
    });
}

criterion_group!(benches, bench_call_chain, bench_fan_out, bench_parallel_programs);
criterion_main!(benches);
