//! `rebind rename` command implementation.

use miette::{miette, IntoDiagnostic, Result};
use rayon::prelude::*;
use rebind_core::{Config, CONFIG_FILE_NAME};
use rebind_hygiene::{program_from_str, transform_with, TranspileOptions};
use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Schema version of the `--json` report.
pub const RENAME_SCHEMA_VERSION: u32 = 1;

/// Input file could not be read.
pub const RENAME_READ_FAILED: &str = "RENAME_READ_FAILED";

/// Input is not a usable ESTree program.
pub const RENAME_INVALID_ESTREE: &str = "RENAME_INVALID_ESTREE";

/// Program contains a node kind the renamer cannot render.
pub const RENAME_UNSUPPORTED_SYNTAX: &str = "RENAME_UNSUPPORTED_SYNTAX";

/// Output file could not be written.
pub const RENAME_WRITE_FAILED: &str = "RENAME_WRITE_FAILED";

/// Rename command action.
#[derive(Debug, Clone)]
pub struct RenameAction {
    /// ESTree JSON files, or directories searched for `*.json`.
    pub paths: Vec<PathBuf>,
    /// Write `<stem>.js` files here instead of printing to stdout.
    pub out_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct RenameReport {
    schema_version: u32,
    ok: bool,
    separator: String,
    counts: RenameCounts,
    files: Vec<FileResult>,
}

#[derive(Serialize)]
struct RenameCounts {
    total: usize,
    succeeded: usize,
    failed: usize,
}

#[derive(Serialize)]
struct FileResult {
    input: String,
    ok: bool,
    /// Written file, when `--out-dir` is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    /// Generated code, when printing to stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FileError>,
}

#[derive(Debug, Serialize)]
struct FileError {
    code: &'static str,
    message: String,
}

impl FileError {
    fn new(code: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            code,
            message: err.to_string(),
        }
    }
}

/// Run the rename command.
pub fn run(config: &Config, action: RenameAction, json: bool) -> Result<()> {
    let inputs = collect_inputs(&config.cwd, &action.paths)?;
    if inputs.is_empty() {
        return Err(miette!("no ESTree JSON files found"));
    }

    let out_dir = action.out_dir.map(|dir| config.cwd.join(dir));
    if let Some(dir) = &out_dir {
        check_output_names(&inputs)?;
        std::fs::create_dir_all(dir).into_diagnostic()?;
    }

    let options = config.transpile_options();
    info!(files = inputs.len(), separator = %options.separator, "renaming");

    // One context per file; results come back in input order
    let files: Vec<FileResult> = inputs
        .par_iter()
        .map(|input| process_file(input, &options, out_dir.as_deref()))
        .collect();

    let failed = files.iter().filter(|f| !f.ok).count();
    let total = files.len();

    if json {
        let report = RenameReport {
            schema_version: RENAME_SCHEMA_VERSION,
            ok: failed == 0,
            separator: options.separator,
            counts: RenameCounts {
                total,
                succeeded: total - failed,
                failed,
            },
            files,
        };
        super::print_json(&report)?;
        if failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    for file in &files {
        if let Some(error) = &file.error {
            eprintln!("error[{}]: {}: {}", error.code, file.input, error.message);
        } else if let Some(code) = &file.code {
            if total > 1 {
                println!("// {}", file.input);
            }
            print!("{code}");
        }
    }

    if failed > 0 {
        return Err(miette!("{failed} of {total} files failed"));
    }
    Ok(())
}

/// Expand the command line paths into a list of input files.
///
/// Directories are walked recursively; their files come back sorted so
/// output order does not depend on the filesystem.
fn collect_inputs(cwd: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for path in paths {
        let path = cwd.join(path);
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(&path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_estree_file(e.path()))
                .map(walkdir::DirEntry::into_path)
                .collect();
            found.sort();
            debug!(dir = %path.display(), files = found.len(), "discovered inputs");
            inputs.extend(found);
        } else if path.is_file() {
            inputs.push(path);
        } else {
            return Err(miette!("input not found: {}", path.display()));
        }
    }

    Ok(inputs)
}

/// `*.json`, except the config file.
fn is_estree_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path.file_name().is_some_and(|name| name != CONFIG_FILE_NAME)
}

/// Where the renamed code for `input` goes inside `dir`.
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".js");
    dir.join(name)
}

/// Two inputs with the same stem would overwrite each other in `--out-dir`.
fn check_output_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<OsString, &Path> = HashMap::new();
    for input in inputs {
        let stem = input.file_stem().unwrap_or_default().to_os_string();
        if let Some(previous) = seen.insert(stem, input.as_path()) {
            return Err(miette!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                output_path(Path::new(""), input).display()
            ));
        }
    }
    Ok(())
}

fn process_file(input: &Path, options: &TranspileOptions, out_dir: Option<&Path>) -> FileResult {
    let result = rename_file(input, options).and_then(|code| match out_dir {
        Some(dir) => write_output(dir, input, &code).map(|path| (Some(path), None)),
        None => Ok((None, Some(code))),
    });

    match result {
        Ok((output, code)) => {
            if let Some(path) = &output {
                info!(input = %input.display(), output = %path.display(), "wrote");
            } else {
                debug!(input = %input.display(), "renamed");
            }
            FileResult {
                input: input.display().to_string(),
                ok: true,
                output: output.map(|p| p.display().to_string()),
                code,
                error: None,
            }
        }
        Err(error) => {
            warn!(input = %input.display(), code = error.code, "{}", error.message);
            FileResult {
                input: input.display().to_string(),
                ok: false,
                output: None,
                code: None,
                error: Some(error),
            }
        }
    }
}

fn rename_file(input: &Path, options: &TranspileOptions) -> std::result::Result<String, FileError> {
    let text =
        std::fs::read_to_string(input).map_err(|e| FileError::new(RENAME_READ_FAILED, e))?;
    let program =
        program_from_str(&text).map_err(|e| FileError::new(RENAME_INVALID_ESTREE, e))?;
    transform_with(&program, options).map_err(|e| FileError::new(RENAME_UNSUPPORTED_SYNTAX, e))
}

fn write_output(
    dir: &Path,
    input: &Path,
    code: &str,
) -> std::result::Result<PathBuf, FileError> {
    let path = output_path(dir, input);
    std::fs::write(&path, code).map_err(|e| FileError::new(RENAME_WRITE_FAILED, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_all_codes_are_screaming_snake_case() {
        let codes = [
            RENAME_READ_FAILED,
            RENAME_INVALID_ESTREE,
            RENAME_UNSUPPORTED_SYNTAX,
            RENAME_WRITE_FAILED,
        ];
        for code in codes {
            assert!(code.starts_with("RENAME_"));
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_collect_inputs_walks_directories_sorted() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(nested.join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let inputs = collect_inputs(dir.path(), &[PathBuf::from(".")]).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a.json".to_string()));
        assert!(names.contains(&"b.json".to_string()));
        let mut sorted = inputs.clone();
        sorted.sort();
        assert_eq!(inputs, sorted);
    }

    #[test]
    fn test_collect_inputs_missing_path() {
        let dir = tempdir().unwrap();
        assert!(collect_inputs(dir.path(), &[PathBuf::from("nope.json")]).is_err());
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        let path = output_path(Path::new("out"), Path::new("src/app.min.json"));
        assert_eq!(path, Path::new("out/app.min.js"));
    }

    #[test]
    fn test_duplicate_stems_are_rejected() {
        let inputs = vec![PathBuf::from("a/main.json"), PathBuf::from("b/main.json")];
        assert!(check_output_names(&inputs).is_err());
        let inputs = vec![PathBuf::from("a/main.json"), PathBuf::from("b/other.json")];
        assert!(check_output_names(&inputs).is_ok());
    }

    #[test]
    fn test_rename_file_reports_error_codes() {
        let dir = tempdir().unwrap();
        let options = TranspileOptions::default();

        let missing = rename_file(&dir.path().join("missing.json"), &options).unwrap_err();
        assert_eq!(missing.code, RENAME_READ_FAILED);

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert_eq!(
            rename_file(&garbage, &options).unwrap_err().code,
            RENAME_INVALID_ESTREE
        );

        let class = dir.path().join("class.json");
        std::fs::write(
            &class,
            r#"{"type":"Program","body":[{"type":"ClassDeclaration","start":0,"end":10}]}"#,
        )
        .unwrap();
        let err = rename_file(&class, &options).unwrap_err();
        assert_eq!(err.code, RENAME_UNSUPPORTED_SYNTAX);
        assert!(err.message.contains("ClassDeclaration"));
    }
}
