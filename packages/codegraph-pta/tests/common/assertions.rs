//! Custom assertions for analysis results

use codegraph_pta::{MethodSignature, ObjectId, PointerAnalysis, Program, PtaConfig};
use pretty_assertions::assert_eq;

/// Build and solve an analysis, panicking on configuration errors
pub fn solve(program: Program, config: PtaConfig) -> PointerAnalysis {
    let mut pta = PointerAnalysis::new(program, config).expect("valid configuration");
    pta.solve().expect("analysis reaches a result");
    pta
}

/// Sorted class names of `objs`; function values show as `fn`, arrays as `[]`
pub fn class_names(pta: &PointerAnalysis, objs: &[ObjectId]) -> Vec<String> {
    let mut names: Vec<String> = objs
        .iter()
        .map(|&o| {
            let site = pta.allocation_site(o).expect("object has a site");
            match (site.class(), site.function()) {
                (Some(class), _) => class.name.clone(),
                (None, Some(_)) => "fn".to_string(),
                (None, None) => "[]".to_string(),
            }
        })
        .collect();
    names.sort();
    names
}

/// Assert the classes a local of `method` may point to, over all contexts
pub fn assert_points_to_classes(
    pta: &PointerAnalysis,
    method: &MethodSignature,
    local: &str,
    expected: &[&str],
) {
    let objs = pta.points_to_by_name(method, local);
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(
        class_names(pta, &objs),
        expected,
        "points-to set of {}::{}",
        method,
        local
    );
}

/// Assert a call edge exists between two methods
pub fn assert_calls(pta: &PointerAnalysis, caller: &MethodSignature, callee: &MethodSignature) {
    let program = pta.program();
    let (Some(from), Some(to)) = (program.method_id(caller), program.method_id(callee)) else {
        panic!("unknown method {} or {}", caller, callee);
    };
    assert!(
        pta.call_graph().has_edge(from, to),
        "expected call edge {} -> {}",
        caller,
        callee
    );
}

/// Assert no call edge exists between two methods
pub fn assert_not_calls(pta: &PointerAnalysis, caller: &MethodSignature, callee: &MethodSignature) {
    let program = pta.program();
    let (Some(from), Some(to)) = (program.method_id(caller), program.method_id(callee)) else {
        panic!("unknown method {} or {}", caller, callee);
    };
    assert!(
        !pta.call_graph().has_edge(from, to),
        "unexpected call edge {} -> {}",
        caller,
        callee
    );
}
