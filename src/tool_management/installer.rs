use crate::tool_management::installers::{
    InstallContext, install_from_source, install_language_package, install_package,
    install_special, refresh_package_index,
};
use crate::tool_management::registry::{InstallDirective, ToolEntry, ToolRegistry};
use crate::tool_management::status::RunState;
use log::{info, warn};

/// Totals for one batch install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Routes tools to their installation strategy and records the results.
pub struct ToolInstaller<'a> {
    ctx: InstallContext<'a>,
    refresh_index: bool,
}

impl<'a> ToolInstaller<'a> {
    pub fn new(ctx: InstallContext<'a>) -> Self {
        Self {
            ctx,
            refresh_index: true,
        }
    }

    /// Skip the package index refresh before batch installs.
    pub fn without_index_refresh(mut self) -> Self {
        self.refresh_index = false;
        self
    }

    /// Run the strategy for one registry entry. Never fails the run.
    pub fn install_tool(&self, tool: &ToolEntry) -> bool {
        match &tool.directive {
            InstallDirective::Package(spec) => install_package(&self.ctx, &tool.name, spec),
            InstallDirective::Source(repo) => install_from_source(&self.ctx, &tool.name, repo),
            InstallDirective::Language(pkg) => install_language_package(&self.ctx, &tool.name, pkg),
            InstallDirective::Special(case) => install_special(&self.ctx, &tool.name, *case),
        }
    }

    /// Install a tool by name, recording the result in `state`.
    ///
    /// A name without a registry entry is skipped with a warning and counted
    /// as failed.
    pub fn install_by_name(&self, registry: &ToolRegistry, name: &str, state: &mut RunState) -> bool {
        let Some(tool) = registry.get(name) else {
            warn!("⚠️  No install directive for '{}', skipping", name);
            state.mark_unresolved(name);
            return false;
        };

        let installed = self.install_tool(tool);
        if installed {
            state.mark_installed(name);
        } else {
            state.mark_failed(name);
        }
        installed
    }

    /// Install every tool currently recorded as missing, one at a time.
    pub fn install_missing(&self, registry: &ToolRegistry, state: &mut RunState) -> BatchOutcome {
        let pending: Vec<String> = state.missing().iter().cloned().collect();
        let mut outcome = BatchOutcome::default();

        if pending.is_empty() {
            info!("✅ No missing tools, nothing to install");
            return outcome;
        }

        if self.refresh_index && !refresh_package_index(&self.ctx) {
            warn!("⚠️  Package index refresh failed, continuing with cached index");
        }

        info!("🛠️  Installing {} missing tools...", pending.len());
        for name in pending {
            outcome.attempted += 1;
            if self.install_by_name(registry, &name, state) {
                outcome.succeeded.push(name);
            } else {
                outcome.failed.push(name);
            }
        }

        info!(
            "Batch complete: {} installed, {} failed",
            outcome.succeeded.len(),
            outcome.failed.len()
        );
        outcome
    }
}
