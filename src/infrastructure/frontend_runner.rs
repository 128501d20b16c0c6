//! Compiler Frontend Runner.
//!
//! Obtains the serialized AST from the external Python frontend:
//! `<python> -m <module_name> <source_path>` with the frontend's module
//! path on `PYTHONPATH`. The frontend writes one JSON document to stdout.
//!
//! When a virtual environment is given, its interpreter is used and
//! `VIRTUAL_ENV` is exported so the frontend resolves its dependencies
//! from there.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use super::BridgeError;
use crate::ports::ParseTreeSource;

pub const DEFAULT_INTERPRETER: &str = "python3";

/// Everything needed to invoke the frontend once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendInvocation {
    /// Python module implementing the frontend, e.g. `xion`.
    pub module_name: String,
    /// Directory containing the frontend module.
    pub module_path: PathBuf,
    /// Source program to parse.
    pub source_path: PathBuf,
    /// Optional virtual environment with the frontend's dependencies.
    pub env_path: Option<PathBuf>,
    /// Interpreter used when no virtual environment is given.
    pub interpreter: String,
}

impl FrontendInvocation {
    pub fn new(
        module_name: impl Into<String>,
        module_path: impl Into<PathBuf>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            module_path: module_path.into(),
            source_path: source_path.into(),
            env_path: None,
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }

    pub fn with_env_path(mut self, env_path: Option<PathBuf>) -> Self {
        self.env_path = env_path;
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the command that would be run for an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendCommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Build the command specification for an invocation without running it.
pub fn build_command_spec(invocation: &FrontendInvocation) -> FrontendCommandSpec {
    let program = match &invocation.env_path {
        Some(env) => venv_interpreter(env).display().to_string(),
        None => invocation.interpreter.clone(),
    };

    let mut env = vec![(
        "PYTHONPATH".to_string(),
        invocation.module_path.display().to_string(),
    )];
    if let Some(env_path) = &invocation.env_path {
        env.push(("VIRTUAL_ENV".to_string(), env_path.display().to_string()));
    }

    FrontendCommandSpec {
        program,
        args: vec![
            "-m".to_string(),
            invocation.module_name.clone(),
            invocation.source_path.display().to_string(),
        ],
        env,
    }
}

fn venv_interpreter(env_path: &Path) -> PathBuf {
    if cfg!(windows) {
        env_path.join("Scripts").join("python.exe")
    } else {
        env_path.join("bin").join("python")
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Process-backed source
// ═══════════════════════════════════════════════════════════════════════════

/// Runs the Python frontend as a child process, one blocking call per load.
#[derive(Debug, Clone)]
pub struct PythonFrontend {
    invocation: FrontendInvocation,
}

impl PythonFrontend {
    pub fn new(invocation: FrontendInvocation) -> Self {
        Self { invocation }
    }

    pub fn invocation(&self) -> &FrontendInvocation {
        &self.invocation
    }
}

impl ParseTreeSource for PythonFrontend {
    fn describe(&self) -> String {
        format!(
            "frontend `{}` on {}",
            self.invocation.module_name,
            self.invocation.source_path.display()
        )
    }

    fn load_parse_tree(&self) -> Result<String, BridgeError> {
        let source = &self.invocation.source_path;
        if !source.is_file() {
            return Err(BridgeError::SourceNotFound {
                path: source.clone(),
            });
        }

        let spec = build_command_spec(&self.invocation);
        info!(program = %spec.program, module = %self.invocation.module_name, "running frontend");
        debug!(args = ?spec.args, env = ?spec.env, "frontend command");

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|source| BridgeError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(%stderr, "frontend stderr");
            return Err(BridgeError::FrontendFailed {
                module: self.invocation.module_name.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| BridgeError::InvalidUtf8)?;
        if text.trim().is_empty() {
            return Err(BridgeError::EmptyOutput {
                module: self.invocation.module_name.clone(),
            });
        }

        debug!(bytes = text.len(), "frontend produced parse tree");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn invocation() -> FrontendInvocation {
        FrontendInvocation::new("xion", "/opt/frontend", "/src/hello.b")
    }

    #[test]
    fn test_build_command_spec_default_interpreter() {
        let spec = build_command_spec(&invocation());
        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["-m", "xion", "/src/hello.b"]);
        assert_eq!(
            spec.env,
            vec![("PYTHONPATH".to_string(), "/opt/frontend".to_string())]
        );
    }

    #[test]
    fn test_build_command_spec_custom_interpreter() {
        let spec = build_command_spec(&invocation().with_interpreter("/usr/bin/python3.12"));
        assert_eq!(spec.program, "/usr/bin/python3.12");
    }

    #[test]
    #[cfg(unix)]
    fn test_build_command_spec_with_venv() {
        let inv = invocation()
            .with_interpreter("ignored")
            .with_env_path(Some(PathBuf::from("/opt/venv")));
        let spec = build_command_spec(&inv);
        assert_eq!(spec.program, "/opt/venv/bin/python");
        assert!(spec
            .env
            .contains(&("VIRTUAL_ENV".to_string(), "/opt/venv".to_string())));
    }

    #[test]
    fn test_missing_source_is_reported_before_spawning() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.b");
        let frontend = PythonFrontend::new(FrontendInvocation::new("xion", dir.path(), &missing));
        match frontend.load_parse_tree() {
            Err(BridgeError::SourceNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_interpreter_is_a_spawn_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("hello.b");
        fs::write(&source, "main() { }").unwrap();
        let inv = FrontendInvocation::new("xion", dir.path(), &source)
            .with_interpreter(dir.path().join("no-such-python").display().to_string());
        let err = PythonFrontend::new(inv).load_parse_tree().unwrap_err();
        assert!(matches!(err, BridgeError::Spawn { .. }), "got {:?}", err);
    }

    #[test]
    #[ignore] // Requires python3 on PATH
    fn test_frontend_stdout_is_returned() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("echo_tree.py"),
            "import json, sys\nprint(json.dumps({'node': 'PROG', 'root': 'PROG', 'src': sys.argv[1]}))\n",
        )
        .unwrap();
        let source = dir.path().join("hello.b");
        fs::write(&source, "main() { }").unwrap();

        let frontend = PythonFrontend::new(FrontendInvocation::new("echo_tree", dir.path(), &source));
        let text = frontend.load_parse_tree().unwrap();
        assert!(text.contains("\"PROG\""));
    }
}
