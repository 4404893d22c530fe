//! Worklist solver
//!
//! Drives the analysis to a fixpoint. Each step takes, in priority order:
//! 1. a newly reachable `(method, context)` to lower,
//! 2. a parked call whose receiver gained an object,
//! 3. a points-to fact to push along the PAG.
//!
//! Lowering and call resolution only add edges and facts, so the loop ends
//! once all three queues are drained.

use super::pag_builder::PagBuilder;
use super::state::PtaState;
use crate::features::ir::Program;
use crate::features::points_to::plugins::PluginManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a solver run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub iterations: usize,
    pub reached_fixpoint: bool,
}

pub struct WorklistSolver<'a> {
    program: &'a Program,
    state: &'a mut PtaState,
    plugins: &'a mut PluginManager,
    max_iterations: Option<usize>,
}

impl<'a> WorklistSolver<'a> {
    pub fn new(
        program: &'a Program,
        state: &'a mut PtaState,
        plugins: &'a mut PluginManager,
        max_iterations: Option<usize>,
    ) -> Self {
        Self {
            program,
            state,
            plugins,
            max_iterations,
        }
    }

    /// Run until every queue is empty or the iteration cap is hit
    ///
    /// `iterations` counts processed facts only; lowering and call
    /// resolution are bounded by the program and the context depth.
    pub fn run(&mut self) -> SolveOutcome {
        let mut iterations = 0usize;

        loop {
            if let Some((method, ctx)) = self.state.pending_methods.pop_front() {
                PagBuilder::new(self.program, &mut *self.state, &mut *self.plugins)
                    .process_method(method, ctx);
                continue;
            }

            if let Some((idx, obj)) = self.state.pending_calls.pop_front() {
                PagBuilder::new(self.program, &mut *self.state, &mut *self.plugins)
                    .resolve_parked(idx, obj);
                continue;
            }

            if self.max_iterations.is_some_and(|cap| iterations >= cap) {
                if !self.state.worklist.is_empty() {
                    warn!(
                        iterations = iterations,
                        remaining = self.state.worklist.len(),
                        "iteration cap reached before fixpoint; results are partial"
                    );
                    return SolveOutcome {
                        iterations,
                        reached_fixpoint: false,
                    };
                }
            }

            let Some(fact) = self.state.worklist.pop() else {
                break;
            };
            iterations += 1;
            self.state.propagate_fact(fact);
        }

        self.state.report_unresolved_parked();
        debug!(iterations = iterations, "worklist drained");
        SolveOutcome {
            iterations,
            reached_fixpoint: true,
        }
    }
}
