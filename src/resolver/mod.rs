//! Installation plan resolution
//!
//! This module handles:
//! - Building installation plans from a component's tool requirements
//! - Depth-first prerequisite resolution across components
//! - Cycle detection via DFS coloring (in-progress vs done)
//! - Platform-specific install method selection
//!
//! A tool appears at most once in a plan: tools already resolved in the
//! current invocation are skipped, and all of a tool's prerequisites appear
//! in the plan before the tool itself. A prerequisite chain that re-enters
//! a tool still being resolved is a hard error, not a silent truncation.

use std::collections::HashMap;
use std::process::Command;

use serde::Serialize;

use crate::catalog::{Catalog, InstallMethod, ToolRequirement};
use crate::error::{Result, SproutError};
use crate::platform::{Platform, command_exists};

/// Why a tool is part of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Direct,
    Prerequisite,
}

/// A tool scheduled for installation.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTool {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Selected install method; `None` only when the tool is already installed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<InstallMethod>,

    pub already_installed: bool,

    /// Installed version when the availability check reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub reason: Reason,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_install: Option<String>,
}

/// The resolved, ordered installation plan for one component.
///
/// Built fresh per invocation and consumed immediately; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    pub component: String,
    pub platform: Platform,

    /// Tools pulled in as prerequisites, dependency-first
    pub prerequisites: Vec<PlannedTool>,

    /// Directly requested tools, in declaration order
    pub tools: Vec<PlannedTool>,
}

impl InstallPlan {
    /// Total number of tools in the plan.
    pub fn total(&self) -> usize {
        self.prerequisites.len() + self.tools.len()
    }

    /// Tools that still need to be installed.
    pub fn pending(&self) -> Vec<&PlannedTool> {
        self.prerequisites
            .iter()
            .chain(self.tools.iter())
            .filter(|t| !t.already_installed)
            .collect()
    }
}

/// DFS coloring state for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Prerequisite resolver for installation plans.
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    platform: &'a Platform,
    visited: HashMap<String, VisitState>,
    stack: Vec<String>,
    resolved: Vec<PlannedTool>,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, platform: &'a Platform) -> Self {
        Resolver {
            catalog,
            platform,
            visited: HashMap::new(),
            stack: Vec::new(),
            resolved: Vec::new(),
        }
    }

    /// Build a complete installation plan with prerequisites resolved.
    ///
    /// Prerequisites appear before the tools that require them; directly
    /// requested tools keep their declaration order relative to each other.
    /// Any unresolvable prerequisite or missing platform method aborts the
    /// entire plan.
    pub fn build_plan(
        &mut self,
        component: &str,
        tools: &[ToolRequirement],
    ) -> Result<InstallPlan> {
        self.visited.clear();
        self.stack.clear();
        self.resolved.clear();

        for tool in tools {
            self.resolve_tool(tool, Reason::Direct)?;
        }

        let mut plan = InstallPlan {
            component: component.to_string(),
            platform: self.platform.clone(),
            prerequisites: Vec::new(),
            tools: Vec::new(),
        };

        for planned in self.resolved.drain(..) {
            match planned.reason {
                Reason::Prerequisite => plan.prerequisites.push(planned),
                Reason::Direct => plan.tools.push(planned),
            }
        }

        Ok(plan)
    }

    /// Resolve a tool and its prerequisites recursively, dependency-first.
    fn resolve_tool(&mut self, tool: &ToolRequirement, reason: Reason) -> Result<()> {
        match self.visited.get(&tool.name) {
            // Already in the plan; dedup keeps the plan idempotent
            Some(VisitState::Done) => return Ok(()),
            // Re-entered while still resolving: genuine cycle
            Some(VisitState::InProgress) => {
                let mut chain = self.stack.clone();
                chain.push(tool.name.clone());
                return Err(SproutError::CircularPrerequisite {
                    chain: chain.join(" -> "),
                });
            }
            None => {}
        }

        self.visited
            .insert(tool.name.clone(), VisitState::InProgress);
        self.stack.push(tool.name.clone());

        let (already_installed, version) = check_installed(&tool.check);

        for requirement in &tool.requires {
            self.resolve_requirement(requirement)?;
        }

        let method = self.select_method(tool);
        if method.is_none() && !already_installed {
            return Err(SproutError::NoInstallMethod {
                tool: tool.name.clone(),
                platform: self.platform.to_string(),
            });
        }

        self.stack.pop();
        self.visited.insert(tool.name.clone(), VisitState::Done);

        self.resolved.push(PlannedTool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            method,
            already_installed,
            version,
            reason,
            post_install: tool.post_install.clone(),
        });

        Ok(())
    }

    /// Resolve a prerequisite reference.
    ///
    /// Form: "component:tool" loads the named tool from that component's
    /// requirements. A bare "tool" is only acceptable when the command is
    /// already present on the host; otherwise there is no component to
    /// install it from and resolution fails.
    fn resolve_requirement(&mut self, requirement: &str) -> Result<()> {
        let (component, tool_name) = parse_requirement(requirement);

        if command_exists(tool_name) {
            return Ok(()); // Already satisfied
        }

        let Some(component) = component else {
            return Err(SproutError::AmbiguousPrerequisite {
                name: tool_name.to_string(),
            });
        };

        let tools = self.catalog.tool_requirements(component)?;
        let tool = tools.iter().find(|t| t.name == tool_name).ok_or_else(|| {
            SproutError::PrerequisiteNotFound {
                tool: tool_name.to_string(),
                component: component.to_string(),
            }
        })?;

        self.resolve_tool(tool, Reason::Prerequisite)
    }

    /// Select the install method for the detected platform.
    ///
    /// Tries the platform's lookup keys most-specific-first and stops at
    /// the first match.
    fn select_method(&self, tool: &ToolRequirement) -> Option<InstallMethod> {
        self.platform
            .method_lookup_keys()
            .iter()
            .find_map(|key| tool.methods.get(key).cloned())
    }
}

/// Run an availability check and report (installed, version).
///
/// Two recognized shapes: `command -v <name>` is answered with a PATH
/// lookup (no version), anything else runs under `sh -c` and success
/// implies presence, with the first output line as the version.
pub fn check_installed(check: &str) -> (bool, Option<String>) {
    if check.is_empty() {
        return (false, None);
    }

    let fields: Vec<&str> = check.split_whitespace().collect();
    if fields.len() >= 3 && fields[0] == "command" && fields[1] == "-v" {
        return (command_exists(fields[2]), None);
    }

    let output = match Command::new("sh").arg("-c").arg(check).output() {
        Ok(output) if output.status.success() => output,
        _ => return (false, None),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string);

    (true, version)
}

/// Split a requirement into (component, tool).
///
/// "node:npm" -> (Some("node"), "npm"); "npm" -> (None, "npm").
fn parse_requirement(requirement: &str) -> (Option<&str>, &str) {
    match requirement.split_once(':') {
        Some((component, tool)) if !component.is_empty() => (Some(component), tool),
        _ => (None, requirement),
    }
}
