//! Install method dispatch and execution
//!
//! Every [`MethodKind`] maps to a synthesized invocation via an exhaustive
//! match. System package managers that need elevated privileges are run
//! through sudo; script-download methods stream the fetched script directly
//! into an interpreter without writing a temp file. Child processes inherit
//! the parent's stdio so interactive prompts (e.g. a sudo password) work
//! unmodified.

use std::fmt;
use std::process::{Command, Stdio};

use crate::catalog::{InstallMethod, MethodKind};
use crate::error::{Result, SproutError};
use crate::platform::command_exists;

/// A concrete invocation synthesized from a tool's install method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A single command: program + args
    Command { program: String, args: Vec<String> },

    /// Fetch a script and stream it into an interpreter: `curl -fsSL <url> | sh`
    Pipeline { url: String },
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Command { program, args } => {
                write!(f, "{program}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Invocation::Pipeline { url } => write!(f, "curl -fsSL {url} | sh"),
        }
    }
}

/// The binary whose presence makes a method usable on this host.
pub fn front_end(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::Brew => "brew",
        MethodKind::Apt => "apt",
        MethodKind::Dnf => "dnf",
        MethodKind::Pacman => "pacman",
        MethodKind::Npm => "npm",
        MethodKind::Cargo => "cargo",
        MethodKind::Pip => "pip3",
        MethodKind::Go => "go",
        MethodKind::Curl => "curl",
    }
}

/// Whether a method's front-end binary is present on this host.
pub fn is_available(kind: MethodKind) -> bool {
    command_exists(front_end(kind))
}

/// Synthesize the concrete invocation for installing `tool_name` via `method`.
pub fn synthesize(tool_name: &str, method: &InstallMethod) -> Result<Invocation> {
    let package = method.package.clone().unwrap_or_else(|| tool_name.to_string());

    let (program, mut args): (&str, Vec<String>) = match method.kind {
        MethodKind::Brew => ("brew", vec!["install".into(), package]),
        // System package managers on Linux need root
        MethodKind::Apt => ("sudo", vec!["apt".into(), "install".into(), "-y".into(), package]),
        MethodKind::Dnf => ("sudo", vec!["dnf".into(), "install".into(), "-y".into(), package]),
        MethodKind::Pacman => (
            "sudo",
            vec!["pacman".into(), "-S".into(), "--noconfirm".into(), package],
        ),
        MethodKind::Npm => {
            let mut args = vec!["install".to_string()];
            if method.global {
                args.push("-g".to_string());
            }
            args.push(package);
            ("npm", args)
        }
        MethodKind::Cargo => ("cargo", vec!["install".into(), package]),
        MethodKind::Pip => {
            let mut args = vec!["install".to_string()];
            if !method.global {
                args.push("--user".to_string());
            }
            args.push(package);
            ("pip3", args)
        }
        MethodKind::Go => {
            // go install has no implicit package path
            let Some(package) = method.package.clone() else {
                return Err(SproutError::InvalidMethod {
                    reason: format!("go install for '{tool_name}' requires a package path"),
                });
            };
            ("go", vec!["install".into(), package])
        }
        MethodKind::Curl => {
            let Some(url) = method.url.clone() else {
                return Err(SproutError::InvalidMethod {
                    reason: format!("curl install for '{tool_name}' requires a url"),
                });
            };
            return Ok(Invocation::Pipeline { url });
        }
    };

    args.extend(method.args.iter().cloned());

    Ok(Invocation::Command {
        program: program.to_string(),
        args,
    })
}

/// Execute a synthesized invocation.
///
/// Stdio is inherited from the parent. Pipeline fetch failure and
/// interpreter failure are reported as distinct errors.
pub fn run(invocation: &Invocation) -> Result<()> {
    match invocation {
        Invocation::Command { program, args } => run_command(program, args),
        Invocation::Pipeline { url } => run_pipeline(url),
    }
}

fn run_command(program: &str, args: &[String]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| SproutError::CommandFailed {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(SproutError::CommandFailed {
            program: program.to_string(),
            reason: format!("exited with {status}"),
        });
    }

    Ok(())
}

/// `curl -fsSL <url> | sh`, streamed, no temp file.
fn run_pipeline(url: &str) -> Result<()> {
    let mut fetch = Command::new("curl")
        .args(["-fsSL", url])
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| SproutError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let script = fetch.stdout.take().ok_or_else(|| SproutError::FetchFailed {
        url: url.to_string(),
        reason: "failed to open pipe".to_string(),
    })?;

    let mut interpreter = Command::new("sh")
        .stdin(Stdio::from(script))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| SproutError::ScriptFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let fetch_status = fetch.wait().map_err(|e| SproutError::FetchFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let script_status = interpreter.wait().map_err(|e| SproutError::ScriptFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !fetch_status.success() {
        return Err(SproutError::FetchFailed {
            url: url.to_string(),
            reason: format!("curl exited with {fetch_status}"),
        });
    }
    if !script_status.success() {
        return Err(SproutError::ScriptFailed {
            url: url.to_string(),
            reason: format!("interpreter exited with {script_status}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(kind: MethodKind) -> InstallMethod {
        InstallMethod {
            kind,
            package: None,
            global: false,
            url: None,
            args: vec![],
        }
    }

    fn argv(invocation: &Invocation) -> Vec<String> {
        match invocation {
            Invocation::Command { program, args } => {
                let mut all = vec![program.clone()];
                all.extend(args.iter().cloned());
                all
            }
            Invocation::Pipeline { .. } => panic!("expected a command"),
        }
    }

    #[test]
    fn test_brew_invocation() {
        let inv = synthesize("jq", &method(MethodKind::Brew)).unwrap();
        assert_eq!(argv(&inv), vec!["brew", "install", "jq"]);
    }

    #[test]
    fn test_apt_uses_sudo() {
        let inv = synthesize("jq", &method(MethodKind::Apt)).unwrap();
        assert_eq!(argv(&inv), vec!["sudo", "apt", "install", "-y", "jq"]);
    }

    #[test]
    fn test_pacman_noconfirm() {
        let inv = synthesize("jq", &method(MethodKind::Pacman)).unwrap();
        assert_eq!(argv(&inv), vec!["sudo", "pacman", "-S", "--noconfirm", "jq"]);
    }

    #[test]
    fn test_package_override_and_extra_args() {
        let mut m = method(MethodKind::Brew);
        m.package = Some("jq-latest".to_string());
        m.args = vec!["--HEAD".to_string()];
        let inv = synthesize("jq", &m).unwrap();
        assert_eq!(argv(&inv), vec!["brew", "install", "jq-latest", "--HEAD"]);
    }

    #[test]
    fn test_npm_global_flag() {
        let mut m = method(MethodKind::Npm);
        m.global = true;
        m.package = Some("wrangler".to_string());
        let inv = synthesize("wrangler", &m).unwrap();
        assert_eq!(argv(&inv), vec!["npm", "install", "-g", "wrangler"]);
    }

    #[test]
    fn test_npm_local_by_default() {
        let inv = synthesize("left-pad", &method(MethodKind::Npm)).unwrap();
        assert_eq!(argv(&inv), vec!["npm", "install", "left-pad"]);
    }

    #[test]
    fn test_pip_user_unless_global() {
        let inv = synthesize("httpie", &method(MethodKind::Pip)).unwrap();
        assert_eq!(argv(&inv), vec!["pip3", "install", "--user", "httpie"]);

        let mut m = method(MethodKind::Pip);
        m.global = true;
        let inv = synthesize("httpie", &m).unwrap();
        assert_eq!(argv(&inv), vec!["pip3", "install", "httpie"]);
    }

    #[test]
    fn test_go_requires_package_path() {
        let err = synthesize("smug", &method(MethodKind::Go)).unwrap_err();
        assert!(matches!(err, SproutError::InvalidMethod { .. }));

        let mut m = method(MethodKind::Go);
        m.package = Some("github.com/ivaaaan/smug@latest".to_string());
        let inv = synthesize("smug", &m).unwrap();
        assert_eq!(
            argv(&inv),
            vec!["go", "install", "github.com/ivaaaan/smug@latest"]
        );
    }

    #[test]
    fn test_curl_requires_url() {
        let err = synthesize("rustup", &method(MethodKind::Curl)).unwrap_err();
        assert!(matches!(err, SproutError::InvalidMethod { .. }));

        let mut m = method(MethodKind::Curl);
        m.url = Some("https://example.com/install.sh".to_string());
        let inv = synthesize("rustup", &m).unwrap();
        assert_eq!(
            inv,
            Invocation::Pipeline {
                url: "https://example.com/install.sh".to_string()
            }
        );
        assert_eq!(
            inv.to_string(),
            "curl -fsSL https://example.com/install.sh | sh"
        );
    }

    #[test]
    fn test_pipeline_fetch_failure_is_distinct() {
        // Invalid URL: curl exits non-zero, sh succeeds on empty input
        let err = run(&Invocation::Pipeline {
            url: "file:///definitely/not/a/real/script.sh".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, SproutError::FetchFailed { .. }));
    }

    #[test]
    fn test_front_end_probe() {
        assert_eq!(front_end(MethodKind::Apt), "apt");
        assert_eq!(front_end(MethodKind::Curl), "curl");
    }
}
