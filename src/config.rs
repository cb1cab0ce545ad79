//! Build-target configuration (spec §4.E inputs, §8 "ambient stack"):
//! an optional `c3c.toml` project file, overlaid with CLI flags which
//! always win on a field-by-field basis.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Executable,
    Object,
    Headers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub output_kind: OutputKind,
    pub output_name: String,
    pub arch_os: String,
    pub is_platform_default_arch: bool,
    pub object_format: String,
    pub sources: Vec<String>,
    pub lib_dir: Option<PathBuf>,
    pub test_output: bool,
    pub run_after_compile: bool,
    pub ct_flags: Vec<String>,
}

impl Default for BuildTarget {
    fn default() -> Self {
        BuildTarget {
            output_kind: OutputKind::Executable,
            output_name: "a.out".to_string(),
            arch_os: host_arch_os(),
            is_platform_default_arch: true,
            object_format: "elf".to_string(),
            sources: Vec::new(),
            lib_dir: None,
            test_output: false,
            run_after_compile: false,
            ct_flags: Vec::new(),
        }
    }
}

fn host_arch_os() -> String {
    format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
}

/// The subset of `c3c.toml` fields this driver understands. All fields are
/// optional so a project file can set just one or two and leave the rest
/// to the driver's defaults / CLI flags.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectFile {
    pub output_name: Option<String>,
    pub arch_os: Option<String>,
    pub sources: Option<Vec<String>>,
    pub lib_dir: Option<PathBuf>,
    pub ct_flags: Option<Vec<String>>,
}

impl ProjectFile {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        let parsed: ProjectFile = toml::from_str(&text)?;
        Ok(Some(parsed))
    }

    /// Overlay this project file onto `target`, field by field. Call
    /// before applying CLI overrides, since CLI flags always win (spec's
    /// ambient-stack configuration rule).
    pub fn apply_to(self, target: &mut BuildTarget) {
        if let Some(name) = self.output_name {
            target.output_name = name;
        }
        if let Some(arch_os) = self.arch_os {
            target.is_platform_default_arch = arch_os == host_arch_os();
            target.arch_os = arch_os;
        }
        if let Some(sources) = self.sources {
            target.sources = sources;
        }
        if let Some(lib_dir) = self.lib_dir {
            target.lib_dir = Some(lib_dir);
        }
        if let Some(ct_flags) = self.ct_flags {
            target.ct_flags = ct_flags;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_file_is_not_an_error() {
        let result = ProjectFile::load(std::path::Path::new("/nonexistent/c3c.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn project_file_fields_overlay_defaults() {
        let mut target = BuildTarget::default();
        let project = ProjectFile {
            output_name: Some("myapp".to_string()),
            arch_os: None,
            sources: Some(vec!["src/*".to_string()]),
            lib_dir: None,
            ct_flags: Some(vec!["DEBUG".to_string()]),
        };
        project.apply_to(&mut target);
        assert_eq!(target.output_name, "myapp");
        assert_eq!(target.sources, vec!["src/*".to_string()]);
        assert_eq!(target.ct_flags, vec!["DEBUG".to_string()]);
    }

    #[test]
    fn absent_fields_leave_defaults_untouched() {
        let mut target = BuildTarget::default();
        let default_name = target.output_name.clone();
        let project = ProjectFile::default();
        project.apply_to(&mut target);
        assert_eq!(target.output_name, default_name);
    }
}
