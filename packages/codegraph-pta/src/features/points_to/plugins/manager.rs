//! Plugin dispatch

use super::{PagPlugin, PluginCall, PluginContext};
use crate::shared::NodeId;
use tracing::debug;

/// Ordered plugin list; first match wins
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn PagPlugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn PagPlugin>) {
        debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.push(plugin);
    }

    /// Let the first matching plugin process `call`
    ///
    /// Returns `None` when no plugin claims the call.
    pub fn dispatch(&mut self, cx: &mut PluginContext<'_>, call: &PluginCall) -> Option<Vec<NodeId>> {
        let plugin = self.plugins.iter_mut().find(|p| p.can_handle(cx, call))?;
        let nodes = plugin.process_call_site(cx, call);
        debug!(
            plugin = plugin.name(),
            site = call.site,
            nodes = nodes.len(),
            "call handled by plugin"
        );
        Some(nodes)
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
