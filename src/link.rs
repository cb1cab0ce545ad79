//! Linker (spec §6 "Linker" collaborator, §4.E steps 8-9): turn object
//! files into an executable, preferring the platform-default linker and
//! falling back to a generic one when the target's object format supports
//! it (spec §4.E step 8).

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::DriverError;

pub trait Linker {
    /// Link using the host's default toolchain. Used when the target
    /// architecture is the platform default (spec §4.E step 8).
    fn platform_linker(&self, output_name: &str, obj_paths: &[PathBuf]) -> bool;

    /// Link for a non-default target. Only invoked when
    /// `obj_format_linking_supported` returns `true`.
    fn linker(&self, output_name: &str, obj_paths: &[PathBuf]) -> bool;

    fn obj_format_linking_supported(&self, format: &str) -> bool;
}

/// Shells out to the system C compiler driver (`cc`) the way most small
/// compilers bootstrap linking rather than reimplementing a linker.
pub struct CcLinker;

impl Linker for CcLinker {
    fn platform_linker(&self, output_name: &str, obj_paths: &[PathBuf]) -> bool {
        run_cc(output_name, obj_paths)
    }

    fn linker(&self, output_name: &str, obj_paths: &[PathBuf]) -> bool {
        run_cc(output_name, obj_paths)
    }

    fn obj_format_linking_supported(&self, format: &str) -> bool {
        matches!(format, "elf" | "macho" | "coff")
    }
}

fn run_cc(output_name: &str, obj_paths: &[PathBuf]) -> bool {
    Command::new("cc")
        .arg("-o")
        .arg(output_name)
        .args(obj_paths)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Drives §4.E steps 8-9: decide whether to link at all, which linker
/// entry point to use, and whether a post-link run is still possible.
/// Returns `Ok(true)` if the executable was produced (or linking was
/// skipped because none was requested), `Ok(false)` if linking was skipped
/// with a diagnostic (so `run_after_compile` must be canceled by the
/// caller).
pub fn link_executable(
    linker: &dyn Linker,
    output_name: &str,
    obj_paths: &[PathBuf],
    target_format: &str,
    is_platform_default: bool,
) -> Result<bool, DriverError> {
    let linked = if is_platform_default {
        linker.platform_linker(output_name, obj_paths)
    } else if linker.obj_format_linking_supported(target_format) {
        linker.linker(output_name, obj_paths)
    } else {
        eprintln!(
            "note: skipping link for unsupported object format '{target_format}'; \
             run_after_compile disabled"
        );
        return Ok(false);
    };

    if !linked {
        return Err(DriverError::LinkingUnsupported);
    }
    Ok(true)
}

pub fn run_binary(path: &Path) -> std::io::Result<std::process::ExitStatus> {
    Command::new(path).status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct RecordingLinker {
        platform_calls: Cell<u32>,
        generic_calls: Cell<u32>,
        supports_generic: bool,
    }

    impl Linker for RecordingLinker {
        fn platform_linker(&self, _output_name: &str, _obj_paths: &[PathBuf]) -> bool {
            self.platform_calls.set(self.platform_calls.get() + 1);
            true
        }

        fn linker(&self, _output_name: &str, _obj_paths: &[PathBuf]) -> bool {
            self.generic_calls.set(self.generic_calls.get() + 1);
            true
        }

        fn obj_format_linking_supported(&self, _format: &str) -> bool {
            self.supports_generic
        }
    }

    #[test]
    fn platform_default_uses_platform_linker() {
        let linker = RecordingLinker {
            platform_calls: Cell::new(0),
            generic_calls: Cell::new(0),
            supports_generic: true,
        };
        let result = link_executable(&linker, "a.out", &[], "elf", true).unwrap();
        assert!(result);
        assert_eq!(linker.platform_calls.get(), 1);
        assert_eq!(linker.generic_calls.get(), 0);
    }

    #[test]
    fn non_default_unsupported_format_skips_with_diagnostic() {
        let linker = RecordingLinker {
            platform_calls: Cell::new(0),
            generic_calls: Cell::new(0),
            supports_generic: false,
        };
        let result = link_executable(&linker, "a.out", &[], "exotic", false).unwrap();
        assert!(!result);
        assert_eq!(linker.platform_calls.get(), 0);
        assert_eq!(linker.generic_calls.get(), 0);
    }

    #[test]
    fn non_default_supported_format_uses_generic_linker() {
        let linker = RecordingLinker {
            platform_calls: Cell::new(0),
            generic_calls: Cell::new(0),
            supports_generic: true,
        };
        let result = link_executable(&linker, "a.out", &[], "elf", false).unwrap();
        assert!(result);
        assert_eq!(linker.generic_calls.get(), 1);
    }
}
