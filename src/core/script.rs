//! Named sequences of raw command lines, loaded from disk or supplied in
//! memory, replayed through the normal dispatch path.

use std::fs;

use super::error::ConsoleError;

/// A script: a path, a from-memory flag, and the stored command lines.
///
/// File-backed scripts load lazily; in-memory scripts never touch the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    path: String,
    from_memory: bool,
    lines: Vec<String>,
}

impl Script {
    /// Create a file-backed script. The file is read on the first
    /// [`load`](Self::load), not here, so a bad path surfaces as a logged
    /// error at run time rather than a registration failure.
    pub fn from_file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from_memory: false,
            lines: Vec::new(),
        }
    }

    /// Create a script from lines already in memory.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            path: String::new(),
            from_memory: true,
            lines,
        }
    }

    /// Read the script file line-by-line, appending to the stored lines.
    ///
    /// A no-op for in-memory scripts. An unreadable file is a
    /// [`ConsoleError::Script`].
    pub fn load(&mut self) -> Result<(), ConsoleError> {
        if self.from_memory {
            return Ok(());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|_| ConsoleError::script("Failed to load script", &self.path))?;
        for line in contents.lines() {
            self.lines.push(line.to_string());
        }
        Ok(())
    }

    /// Unload then load. A no-op for in-memory scripts.
    pub fn reload(&mut self) -> Result<(), ConsoleError> {
        if self.from_memory {
            return Ok(());
        }
        self.unload();
        self.load()
    }

    /// Drop the stored lines.
    pub fn unload(&mut self) {
        self.lines.clear();
    }

    /// Change the backing path used by the next load.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The backing path (empty for in-memory scripts).
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this script was supplied in memory.
    #[inline]
    pub fn is_from_memory(&self) -> bool {
        self.from_memory
    }

    /// The stored command lines, in file order.
    #[inline]
    pub fn data(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_script_holds_lines() {
        let script = Script::from_lines(vec!["a 1".to_string(), "b 2".to_string()]);
        assert!(script.is_from_memory());
        assert_eq!(script.data(), ["a 1", "b 2"]);
    }

    #[test]
    fn test_memory_script_never_reloads() {
        let mut script = Script::from_lines(vec!["keep me".to_string()]);
        script.reload().unwrap();
        assert_eq!(script.data(), ["keep me"]);
        script.load().unwrap();
        assert_eq!(script.data(), ["keep me"]);
    }

    #[test]
    fn test_file_script_loads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first one").unwrap();
        writeln!(file, "second two").unwrap();

        let mut script = Script::from_file(file.path().to_string_lossy());
        assert!(script.data().is_empty());
        script.load().unwrap();
        assert_eq!(script.data(), ["first one", "second two"]);
    }

    #[test]
    fn test_file_script_reload_rereads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "line").unwrap();

        let mut script = Script::from_file(file.path().to_string_lossy());
        script.load().unwrap();
        script.reload().unwrap();
        // Reload is unload + load, not append.
        assert_eq!(script.data(), ["line"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut script = Script::from_file("/definitely/not/here.cfg");
        let err = script.load().unwrap_err();
        assert!(matches!(err, ConsoleError::Script { .. }));
    }
}
