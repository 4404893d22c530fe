//! Pointer analysis facade
//!
//! Owns one analysis run over a [`Program`]: configuration, the PAG, the call
//! graph, the context cache and the plugin list. Construction validates the
//! configuration; `solve` runs the worklist solver to fixpoint once, after
//! which the query methods read the results.
//!
//! # Usage
//! ```rust,ignore
//! use codegraph_pta::{PointerAnalysis, PtaConfig};
//!
//! let mut pta = PointerAnalysis::new(program, PtaConfig::default())?;
//! pta.solve()?;
//! let objs = pta.points_to_by_name(&main_sig, "x");
//! ```

use crate::config::PtaConfig;
use crate::errors::{PtaError, Result};
use crate::features::call_graph::CallGraph;
use crate::features::ir::{FieldSignature, MethodSignature, Program, StmtRef};
use crate::features::points_to::domain::{
    AbstractObject, AllocationSite, ContainerKind, PointerKey,
};
use crate::features::points_to::infrastructure::{
    selector_for, ContextCache, Pag, PtaState, WorklistSolver,
};
use crate::features::points_to::plugins::{ContainerPlugin, PagPlugin, PluginManager, SdkPlugin};
use crate::shared::{ContextId, LocalId, MethodId, ObjectId, PointsToSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtaStats {
    pub iterations: usize,
    pub facts_propagated: usize,
    pub facts_dropped: usize,
    pub pag_nodes: usize,
    pub pag_edges: usize,
    pub abstract_objects: usize,
    pub contexts: usize,
    pub reachable_methods: usize,
    pub call_edges: usize,
    pub call_sites: usize,
    pub unresolved_calls: usize,
    pub processed_method_contexts: usize,
    pub duration_ms: f64,
    pub reached_fixpoint: bool,
}

/// One call graph edge, by signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdgeSummary {
    pub caller: String,
    pub callee: String,
    pub site: u32,
}

/// Points-to set of one local, merged over contexts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsToSummary {
    pub method: String,
    pub local: String,
    pub objects: Vec<String>,
}

/// Serializable summary of a solved run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtaReport {
    pub config: PtaConfig,
    pub stats: PtaStats,
    pub reachable_methods: Vec<String>,
    pub call_edges: Vec<CallEdgeSummary>,
    pub points_to: Vec<PointsToSummary>,
}

impl PtaReport {
    /// Human-readable rendering used by the CLI
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let s = &self.stats;
        out.push_str(&format!(
            "context: {} (k={})\n",
            self.config.context.as_str(),
            self.config.effective_depth()
        ));
        out.push_str(&format!(
            "iterations: {}  fixpoint: {}  time: {:.2}ms\n",
            s.iterations, s.reached_fixpoint, s.duration_ms
        ));
        out.push_str(&format!(
            "pag: {} nodes, {} edges, {} objects, {} contexts\n",
            s.pag_nodes, s.pag_edges, s.abstract_objects, s.contexts
        ));
        out.push_str(&format!(
            "call graph: {} methods, {} edges, {} unresolved calls\n",
            s.reachable_methods, s.call_edges, s.unresolved_calls
        ));

        out.push_str("\nreachable methods:\n");
        for m in &self.reachable_methods {
            out.push_str(&format!("  {}\n", m));
        }
        out.push_str("\ncall edges:\n");
        for e in &self.call_edges {
            out.push_str(&format!("  {} -> {} (site {})\n", e.caller, e.callee, e.site));
        }
        out.push_str("\npoints-to:\n");
        for p in &self.points_to {
            out.push_str(&format!(
                "  {}::{} -> {{{}}}\n",
                p.method,
                p.local,
                p.objects.join(", ")
            ));
        }
        out
    }
}

/// Context-sensitive pointer analysis over one program
pub struct PointerAnalysis {
    program: Arc<Program>,
    config: PtaConfig,
    state: PtaState,
    plugins: PluginManager,
    stats: Option<PtaStats>,
}

impl PointerAnalysis {
    /// Validate `config` and set up the built-in plugins it enables
    pub fn new(program: impl Into<Arc<Program>>, config: PtaConfig) -> Result<Self> {
        config.validate()?;

        let mut plugins = PluginManager::new();
        if config.enable_container_plugin {
            plugins.register(Box::new(ContainerPlugin::new(config.container_precision)));
        }
        if config.enable_sdk_plugin {
            plugins.register(Box::new(SdkPlugin::new()));
        }

        Ok(Self {
            program: program.into(),
            state: PtaState::new(selector_for(&config)),
            config,
            plugins,
            stats: None,
        })
    }

    /// Append a plugin after the built-in ones
    ///
    /// Refused once the analysis has run.
    pub fn register_plugin(&mut self, plugin: Box<dyn PagPlugin>) -> Result<()> {
        if self.stats.is_some() {
            return Err(PtaError::invariant(format!(
                "plugin '{}' registered after solve()",
                plugin.name()
            )));
        }
        self.plugins.register(plugin);
        Ok(())
    }

    /// Run to fixpoint (or the iteration cap); later calls return the same stats
    pub fn solve(&mut self) -> Result<&PtaStats> {
        if self.stats.is_none() {
            let stats = self.run()?;
            self.stats = Some(stats);
        }
        self.stats
            .as_ref()
            .ok_or_else(|| PtaError::invariant("statistics missing after solve"))
    }

    fn run(&mut self) -> Result<PtaStats> {
        let start = Instant::now();
        let program = Arc::clone(&self.program);

        info!(
            context = self.config.context.as_str(),
            depth = self.config.effective_depth(),
            methods = program.method_count(),
            entries = program.entry_points().len(),
            plugins = self.plugins.len(),
            "pointer analysis started"
        );

        let empty = self.state.selector.empty_context(&mut self.state.contexts);
        for &entry in program.entry_points() {
            let opaque = program.method(entry).map_or(true, |m| m.is_opaque());
            self.state.call_graph.add_entry(entry, opaque);
            self.state.request_method(entry, empty);
        }

        let outcome = WorklistSolver::new(
            &program,
            &mut self.state,
            &mut self.plugins,
            self.config.max_iterations,
        )
        .run();

        self.state.pag.check_invariants()?;

        let counters = self.state.counters;
        let stats = PtaStats {
            iterations: outcome.iterations,
            facts_propagated: counters.facts_propagated,
            facts_dropped: counters.facts_dropped,
            pag_nodes: self.state.pag.node_count(),
            pag_edges: self.state.pag.edge_count(),
            abstract_objects: self.state.pag.object_count(),
            contexts: self.state.contexts.len(),
            reachable_methods: self.state.call_graph.node_count(),
            call_edges: self.state.call_graph.edge_count(),
            call_sites: self.state.call_graph.call_site_count(),
            unresolved_calls: counters.unresolved_calls,
            processed_method_contexts: self.state.processed_count(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            reached_fixpoint: outcome.reached_fixpoint,
        };

        info!(
            iterations = stats.iterations,
            nodes = stats.pag_nodes,
            objects = stats.abstract_objects,
            call_edges = stats.call_edges,
            unresolved = stats.unresolved_calls,
            fixpoint = stats.reached_fixpoint,
            duration_ms = stats.duration_ms,
            "pointer analysis finished"
        );
        Ok(stats)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Objects `local` of `method` may point to under `ctx`
    pub fn points_to(&self, ctx: ContextId, method: MethodId, local: LocalId) -> Vec<ObjectId> {
        self.set_of(&PointerKey::Local { ctx, method, local })
    }

    /// Objects a named local may point to, merged over every context
    pub fn points_to_by_name(&self, method: &MethodSignature, local: &str) -> Vec<ObjectId> {
        match self.program.find_local(method, local) {
            Some((m, l)) => self.merged_points_to(m, l).iter().collect(),
            None => Vec::new(),
        }
    }

    /// Whether two named locals may refer to the same object in some context
    pub fn may_alias(&self, a: (&MethodSignature, &str), b: (&MethodSignature, &str)) -> bool {
        let (Some((ma, la)), Some((mb, lb))) = (
            self.program.find_local(a.0, a.1),
            self.program.find_local(b.0, b.1),
        ) else {
            return false;
        };
        self.merged_points_to(ma, la)
            .intersects(&self.merged_points_to(mb, lb))
    }

    fn merged_points_to(&self, method: MethodId, local: LocalId) -> PointsToSet {
        let mut merged = PointsToSet::new();
        for node in self.state.pag.nodes() {
            if let PointerKey::Local {
                method: m,
                local: l,
                ..
            } = node.key
            {
                if m == method && l == local {
                    merged.union_with(&node.points_to);
                }
            }
        }
        merged
    }

    fn set_of(&self, key: &PointerKey) -> Vec<ObjectId> {
        self.state
            .pag
            .node_id(key)
            .and_then(|id| self.state.pag.points_to(id))
            .map(|pts| pts.iter().collect())
            .unwrap_or_default()
    }

    pub fn object(&self, obj: ObjectId) -> Option<&AbstractObject> {
        self.state.pag.object(obj)
    }

    pub fn allocation_site(&self, obj: ObjectId) -> Option<&AllocationSite> {
        self.state.pag.allocation_site(obj)
    }

    /// Statement that allocated `obj`; `None` for synthesized objects
    pub fn allocation_stmt(&self, obj: ObjectId) -> Option<StmtRef> {
        self.allocation_site(obj).and_then(AllocationSite::stmt)
    }

    /// Readable label such as `new Foo@m0#2 [cs1->m3]`
    pub fn describe_object(&self, obj: ObjectId) -> Option<String> {
        let o = self.object(obj)?;
        let site = self.state.pag.site(o.site)?;
        let ctx = self
            .state
            .contexts
            .get(o.ctx)
            .map(ToString::to_string)
            .unwrap_or_default();
        Some(format!("{} {}", site, ctx))
    }

    /// Objects stored in field `field` of `obj`, whichever class spells `field`
    pub fn field_points_to(&self, obj: ObjectId, field: &FieldSignature) -> Vec<ObjectId> {
        self.set_of(&PointerKey::InstanceField {
            obj,
            field: self.program().canonical_field(field),
        })
    }

    /// Objects stored as elements of container `obj`
    pub fn container_points_to(&self, obj: ObjectId) -> Vec<ObjectId> {
        let kind = self
            .allocation_site(obj)
            .and_then(AllocationSite::container_kind)
            .unwrap_or(ContainerKind::Array);
        self.set_of(&PointerKey::ContainerField { obj, kind })
    }

    pub fn static_field_points_to(&self, field: &FieldSignature) -> Vec<ObjectId> {
        self.set_of(&PointerKey::StaticField {
            field: field.clone(),
        })
    }

    pub fn call_graph(&self) -> &CallGraph {
        &self.state.call_graph
    }

    pub fn pag(&self) -> &Pag {
        &self.state.pag
    }

    pub fn contexts(&self) -> &ContextCache {
        &self.state.contexts
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &PtaConfig {
        &self.config
    }

    /// `None` until `solve` has run
    pub fn stats(&self) -> Option<&PtaStats> {
        self.stats.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.stats.is_some()
    }

    fn method_name(&self, method: MethodId) -> String {
        self.program
            .method(method)
            .map(|m| m.signature.to_string())
            .unwrap_or_else(|| format!("m{}", method))
    }

    /// Summary of the run; empty statistics before `solve`
    pub fn report(&self) -> PtaReport {
        let call_graph = &self.state.call_graph;
        let reachable = call_graph.reachable_methods();

        let mut call_edges: Vec<CallEdgeSummary> = call_graph
            .edges()
            .map(|(caller, callee, edge)| CallEdgeSummary {
                caller: self.method_name(caller),
                callee: self.method_name(callee),
                site: edge.site,
            })
            .collect();
        call_edges.sort_by(|a, b| (&a.caller, a.site, &a.callee).cmp(&(&b.caller, b.site, &b.callee)));
        call_edges.dedup();

        let mut points_to = Vec::new();
        for &method in &reachable {
            let Some(body) = self.program.method(method).and_then(|m| m.body.as_ref()) else {
                continue;
            };
            for (local, decl) in body.locals.iter().enumerate() {
                let merged = self.merged_points_to(method, local as LocalId);
                if merged.is_empty() {
                    continue;
                }
                points_to.push(PointsToSummary {
                    method: self.method_name(method),
                    local: decl.name.clone(),
                    objects: merged
                        .iter()
                        .filter_map(|obj| self.describe_object(obj))
                        .collect(),
                });
            }
        }

        PtaReport {
            config: self.config.clone(),
            stats: self.stats.clone().unwrap_or_default(),
            reachable_methods: reachable.iter().map(|&m| self.method_name(m)).collect(),
            call_edges,
            points_to,
        }
    }
}

impl std::fmt::Debug for PointerAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerAnalysis")
            .field("config", &self.config)
            .field("plugins", &self.plugins)
            .field("state", &self.state)
            .field("solved", &self.is_solved())
            .finish()
    }
}
