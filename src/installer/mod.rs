//! Installation planning and execution
//!
//! The [`Installer`] ties the catalog, platform and resolver together:
//! `plan` builds an ordered installation plan for one component, `install`
//! executes it (prerequisites first). Failure of one tool does not abort
//! the remaining tools; each outcome is recorded per tool and the caller
//! decides how to present the rollup.

pub mod methods;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{Result, SproutError};
use crate::platform::Platform;
use crate::resolver::{InstallPlan, PlannedTool, Resolver};

/// What happened to one tool during execution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum ToolOutcome {
    Installed,
    Skipped { reason: String },
    Failed { error: String },
}

/// Per-tool execution record.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub name: String,

    #[serde(flatten)]
    pub outcome: ToolOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ToolResult {
    pub fn failed(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Failed { .. })
    }
}

/// The result of executing an installation plan.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    pub component: String,
    pub success: bool,
    pub dry_run: bool,
    pub tools: Vec<ToolResult>,
}

impl InstallResult {
    /// Rollup counts: (installed, skipped, failed).
    pub fn summary(&self) -> (usize, usize, usize) {
        let mut installed = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for tool in &self.tools {
            match tool.outcome {
                ToolOutcome::Installed => installed += 1,
                ToolOutcome::Skipped { .. } => skipped += 1,
                ToolOutcome::Failed { .. } => failed += 1,
            }
        }
        (installed, skipped, failed)
    }
}

/// Component installer.
pub struct Installer {
    catalog: Catalog,
    platform: Platform,
    dry_run: bool,
    verbose: bool,
}

impl Installer {
    pub fn new(catalog: Catalog, platform: Platform, dry_run: bool, verbose: bool) -> Self {
        Installer {
            catalog,
            platform,
            dry_run,
            verbose,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Build the installation plan for a component.
    pub fn plan(&self, component: &str) -> Result<InstallPlan> {
        let tools = self.catalog.tool_requirements(component)?;
        if tools.is_empty() {
            return Err(SproutError::NoToolsDeclared {
                component: component.to_string(),
            });
        }

        let mut resolver = Resolver::new(&self.catalog, &self.platform);
        resolver.build_plan(component, &tools)
    }

    /// Execute an installation plan: prerequisites first, then direct tools.
    pub fn execute(&self, plan: &InstallPlan) -> InstallResult {
        let mut result = InstallResult {
            component: plan.component.clone(),
            success: true,
            dry_run: self.dry_run,
            tools: Vec::new(),
        };

        for tool in plan.prerequisites.iter().chain(plan.tools.iter()) {
            let tool_result = self.install_tool(tool);
            if tool_result.failed() {
                result.success = false;
            }
            result.tools.push(tool_result);
        }

        result
    }

    /// Plan and execute in one step.
    pub fn install(&self, component: &str) -> Result<InstallResult> {
        let plan = self.plan(component)?;
        Ok(self.execute(&plan))
    }

    /// Install a single planned tool.
    fn install_tool(&self, tool: &PlannedTool) -> ToolResult {
        if tool.already_installed {
            return ToolResult {
                name: tool.name.clone(),
                outcome: ToolOutcome::Skipped {
                    reason: "already installed".to_string(),
                },
                version: tool.version.clone(),
            };
        }

        // The resolver guarantees a method for any tool that is not installed
        let Some(method) = &tool.method else {
            return ToolResult {
                name: tool.name.clone(),
                outcome: ToolOutcome::Failed {
                    error: "no install method selected".to_string(),
                },
                version: None,
            };
        };

        let invocation = match methods::synthesize(&tool.name, method) {
            Ok(invocation) => invocation,
            Err(e) => {
                return ToolResult {
                    name: tool.name.clone(),
                    outcome: ToolOutcome::Failed {
                        error: e.to_string(),
                    },
                    version: None,
                };
            }
        };

        if self.dry_run {
            println!("Would run: {invocation}");
            return ToolResult {
                name: tool.name.clone(),
                outcome: ToolOutcome::Skipped {
                    reason: "dry run".to_string(),
                },
                version: None,
            };
        }

        if !methods::is_available(method.kind) {
            return ToolResult {
                name: tool.name.clone(),
                outcome: ToolOutcome::Failed {
                    error: SproutError::ExecutorUnavailable {
                        program: methods::front_end(method.kind).to_string(),
                    }
                    .to_string(),
                },
                version: None,
            };
        }

        if self.verbose {
            println!("Installing {} via {}...", tool.name, method.kind);
        }

        if let Err(e) = methods::run(&invocation) {
            return ToolResult {
                name: tool.name.clone(),
                outcome: ToolOutcome::Failed {
                    error: e.to_string(),
                },
                version: None,
            };
        }

        if let Some(guidance) = &tool.post_install {
            println!("\n{guidance}");
        }

        ToolResult {
            name: tool.name.clone(),
            outcome: ToolOutcome::Installed,
            version: None,
        }
    }
}
