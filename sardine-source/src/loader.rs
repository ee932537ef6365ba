//! Module loading for `import`.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// File extension of Sardine source files.
pub const EXTENSION: &str = "sd";

/// Resolves a module name to its source text.
pub trait ModuleLoader {
    fn load(&self, name: &str) -> io::Result<String>;
}

/// Loads `<root>/<name>.sd` from the filesystem.
#[derive(Debug, Clone)]
pub struct FsModuleLoader {
    root: PathBuf,
}

impl FsModuleLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name).with_extension(EXTENSION)
    }
}

impl Default for FsModuleLoader {
    /// Resolves modules relative to the current directory.
    fn default() -> Self {
        Self::new(".")
    }
}

impl ModuleLoader for FsModuleLoader {
    fn load(&self, name: &str) -> io::Result<String> {
        let path = self.path_of(name);
        tracing::debug!(path = %path.display(), "loading module");
        std::fs::read_to_string(path)
    }
}

/// Serves modules from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleLoader {
    modules: HashMap<String, String>,
}

impl MemoryModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a module.
    pub fn add_module(&mut self, name: impl ToString, source: impl ToString) {
        self.modules.insert(name.to_string(), source.to_string());
    }

    pub fn with_module(mut self, name: impl ToString, source: impl ToString) -> Self {
        self.add_module(name, source);
        self
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn load(&self, name: &str) -> io::Result<String> {
        self.modules.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no module named '{}'", name))
        })
    }
}
