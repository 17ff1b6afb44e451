//! # Tool Path Resolver
//!
//! Finds the external optimizer binary:
//! - Explicit path from configuration
//! - `TOOLS_DIR` environment variable (bundled tools)
//! - System `PATH`

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tool path resolver for bundled and system-installed tools
#[derive(Debug, Clone, Default)]
pub struct ToolPathResolver {
    /// Explicit override, tried before anything else
    explicit: Option<PathBuf>,
    /// Directory holding bundled tools
    tools_dir: Option<PathBuf>,
    /// `PATH`-style search list
    system_path: Option<OsString>,
}

impl ToolPathResolver {
    /// Create a resolver, picking up `TOOLS_DIR` from the environment
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let tools_dir = env::var_os("TOOLS_DIR")
            .map(PathBuf::from)
            .filter(|path| path.is_dir());
        if let Some(ref dir) = tools_dir {
            debug!("Found tools directory via TOOLS_DIR: {:?}", dir);
        }

        Self {
            explicit,
            tools_dir,
            system_path: env::var_os("PATH"),
        }
    }

    /// Replace the bundled tools directory
    pub fn with_tools_dir(mut self, tools_dir: Option<PathBuf>) -> Self {
        self.tools_dir = tools_dir;
        self
    }

    /// Replace the `PATH`-style search list
    pub fn with_system_path(mut self, system_path: Option<OsString>) -> Self {
        self.system_path = system_path;
        self
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        debug!("Resolving tool: {}", tool_name);

        if let Some(ref explicit) = self.explicit {
            if explicit.is_file() {
                debug!("Using configured tool path: {:?}", explicit);
                return Some(explicit.clone());
            }
            warn!("Configured path for {} does not exist: {:?}", tool_name, explicit);
        }

        if let Some(ref tools_dir) = self.tools_dir {
            let bundled = tools_dir.join(Self::executable_name(tool_name));
            if bundled.is_file() {
                debug!("Using bundled tool: {} -> {:?}", tool_name, bundled);
                return Some(bundled);
            }
        }

        let found = self.find_in_system_path(tool_name);
        if found.is_none() {
            warn!("Tool not found: {}", tool_name);
        }
        found
    }

    fn executable_name(tool_name: &str) -> String {
        let extension = if cfg!(windows) { ".exe" } else { "" };
        format!("{}{}", tool_name, extension)
    }

    /// Find tool in system PATH
    fn find_in_system_path(&self, tool_name: &str) -> Option<PathBuf> {
        let executable = Self::executable_name(tool_name);
        let paths = self.system_path.as_ref()?;
        env::split_paths(paths)
            .map(|dir| dir.join(&executable))
            .find(|path| Path::new(path).is_file())
    }
}
