//! Command-line surface (spec §6 "CLI surface"). Parsing itself is out of
//! the core's scope; this module only has to produce the externally
//! visible flags the driver branches on.

use std::path::PathBuf;

use clap::Parser;

use crate::config::BuildTarget;

#[derive(Debug, Parser)]
#[command(name = "c3c", about = "Compiler driver for the c3 language", version)]
pub struct Cli {
    /// Source files, directories (`dir/*`), or recursive directories
    /// (`dir/**`) to compile.
    pub sources: Vec<String>,

    /// Print lexical tokens for each source and exit; no parsing or
    /// analysis.
    #[arg(long)]
    pub lex_only: bool,

    /// Parse each source and dump the AST; no analysis or codegen.
    #[arg(long)]
    pub parse_only: bool,

    /// Emit header files per module after analysis and exit.
    #[arg(long)]
    pub output_headers: bool,

    /// Compile only: skip link and run even for executable targets.
    #[arg(long)]
    pub test_output: bool,

    /// Run the produced executable after a successful link.
    #[arg(long)]
    pub run: bool,

    /// Output executable/object name.
    #[arg(long, short = 'o')]
    pub output_name: Option<String>,

    /// Standard-library directory; falls back to a platform search when
    /// absent.
    #[arg(long)]
    pub lib_dir: Option<PathBuf>,

    /// Project configuration file (defaults to `c3c.toml` in the current
    /// directory).
    #[arg(long, default_value = "c3c.toml")]
    pub config: PathBuf,

    /// Compile-time flags made available to `$if`/`$else` gates.
    #[arg(long = "define", value_name = "FLAG")]
    pub ct_flags: Vec<String>,
}

impl Cli {
    /// Build a [`BuildTarget`] by overlaying the project file (if any) and
    /// then this CLI invocation on top of the defaults. CLI flags always
    /// win over the project file.
    pub fn build_target(&self) -> anyhow::Result<BuildTarget> {
        let mut target = BuildTarget::default();

        if let Some(project) = crate::config::ProjectFile::load(&self.config)? {
            project.apply_to(&mut target);
        }

        if let Some(name) = &self.output_name {
            target.output_name = name.clone();
        }
        if let Some(lib_dir) = &self.lib_dir {
            target.lib_dir = Some(lib_dir.clone());
        }
        if !self.sources.is_empty() {
            target.sources = self.sources.clone();
        }
        if !self.ct_flags.is_empty() {
            target.ct_flags = self.ct_flags.clone();
        }
        target.test_output = self.test_output;
        target.run_after_compile = self.run;
        if self.output_headers {
            target.output_kind = crate::config::OutputKind::Headers;
        }

        Ok(target)
    }
}
