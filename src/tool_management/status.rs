use crate::tool_management::registry::{ToolCategory, ToolRegistry};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Installed, missing and failed tools for one program run.
///
/// `installed` and `missing` never overlap. A tool whose installation failed
/// stays in `missing` and is also listed in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    installed: BTreeSet<String>,
    missing: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl RunState {
    pub fn mark_installed(&mut self, tool: &str) {
        self.missing.remove(tool);
        self.failed.remove(tool);
        self.installed.insert(tool.to_string());
    }

    pub fn mark_missing(&mut self, tool: &str) {
        self.installed.remove(tool);
        self.missing.insert(tool.to_string());
    }

    pub fn mark_failed(&mut self, tool: &str) {
        self.installed.remove(tool);
        self.missing.insert(tool.to_string());
        self.failed.insert(tool.to_string());
    }

    /// Record a name with no registry entry. It is never a missing tool.
    pub fn mark_unresolved(&mut self, tool: &str) {
        self.failed.insert(tool.to_string());
    }

    pub fn installed(&self) -> &BTreeSet<String> {
        &self.installed
    }

    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }

    pub fn failed(&self) -> &BTreeSet<String> {
        &self.failed
    }

    pub fn is_installed(&self, tool: &str) -> bool {
        self.installed.contains(tool)
    }

    pub fn is_missing(&self, tool: &str) -> bool {
        self.missing.contains(tool)
    }

    pub fn is_failed(&self, tool: &str) -> bool {
        self.failed.contains(tool)
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Console rendering of a check pass, grouped by category.
pub struct ToolStatusReporter<'a> {
    registry: &'a ToolRegistry,
    state: &'a RunState,
}

impl<'a> ToolStatusReporter<'a> {
    pub fn new(registry: &'a ToolRegistry, state: &'a RunState) -> Self {
        Self { registry, state }
    }

    pub fn print_console_report(&self) {
        println!("\n🔧 Security Tools Status");
        println!("{}", "=".repeat(50));

        for category in ToolCategory::ALL {
            let tools: Vec<_> = self.registry.in_category(category).collect();
            if tools.is_empty() {
                continue;
            }
            println!("\n{}", category.label().bold());
            for tool in tools {
                if self.state.is_installed(&tool.name) {
                    println!("  {} {} {}", "✅", tool.name, "installed".green());
                } else if self.state.is_failed(&tool.name) {
                    println!("  {} {} {}", "❌", tool.name, "failed".red());
                } else if self.state.is_missing(&tool.name) {
                    println!(
                        "  {} {} {} {}",
                        "❌",
                        tool.name,
                        "missing".yellow(),
                        format!("({})", tool.directive).dimmed()
                    );
                }
            }
        }

        let total = self.state.installed.len() + self.state.missing.len();
        let percentage = if total == 0 {
            0.0
        } else {
            (self.state.installed.len() as f32 / total as f32) * 100.0
        };
        println!(
            "\nOverall availability: {:.1}% ({}/{})",
            percentage,
            self.state.installed.len(),
            total
        );
        if !self.state.failed.is_empty() {
            println!(
                "{} {}",
                "Failed:".red().bold(),
                self.state
                    .failed
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        println!();
    }

    /// JSON view of the same data, keyed by tool name.
    pub fn to_json(&self) -> serde_json::Value {
        let tools: serde_json::Map<String, serde_json::Value> = self
            .registry
            .iter()
            .filter(|tool| self.state.is_installed(&tool.name) || self.state.is_missing(&tool.name))
            .map(|tool| {
                (
                    tool.name.clone(),
                    serde_json::json!({
                        "category": tool.category,
                        "available": self.state.is_installed(&tool.name),
                        "failed": self.state.is_failed(&tool.name),
                        "method": tool.directive.kind(),
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "installed": self.state.installed.len(),
            "missing": self.state.missing.len(),
            "failed": self.state.failed.len(),
            "tools": tools,
        })
    }
}
