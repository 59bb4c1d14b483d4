//! Bulk JSON import through the external mongoimport tool.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{ConnectionParams, REDACTED_PASSWORD};
use crate::error::{Error, Result};
use crate::import::scan::{collect_file_paths, destination_for, is_within, move_file};
use crate::import::tool::mongoimport_path;

/// Document counts reported by mongoimport on success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: u64,
    pub failed: u64,
}

/// One file imported and relocated by `import_directory`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub summary: ImportSummary,
}

/// Runs mongoimport against the configured namespace, one file per invocation.
#[derive(Clone, Debug)]
pub struct MongoImporter {
    params: ConnectionParams,
    tool: Option<PathBuf>,
}

impl MongoImporter {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params, tool: None }
    }

    /// Use an explicit mongoimport executable instead of searching for one.
    pub fn with_tool_path(self, tool: impl Into<PathBuf>) -> Self {
        Self { tool: Some(tool.into()), ..self }
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    fn tool_path(&self) -> Result<PathBuf> {
        if let Some(tool) = &self.tool {
            return Ok(tool.clone());
        }
        mongoimport_path().ok_or_else(|| {
            Error::ToolNotFound(
                "mongoimport not found. Install MongoDB Database Tools or put it on PATH."
                    .into(),
            )
        })
    }

    /// Arguments passed to mongoimport for `file`.
    /// `-u`/`-p` are left out when no username is configured.
    pub fn command_args(&self, file: &Path) -> Vec<OsString> {
        let params = &self.params;
        let mut args: Vec<OsString> = vec!["-h".into(), params.host.as_str().into()];

        if params.has_credentials() {
            args.push("-u".into());
            args.push(params.user.as_str().into());
            args.push("-p".into());
            args.push(params.password.as_str().into());
        }

        args.push("--db".into());
        args.push(params.database.as_str().into());
        args.push("--collection".into());
        args.push(params.collection.as_str().into());
        args.push("--file".into());
        args.push(file.as_os_str().to_owned());
        args.push("--jsonArray".into());
        args
    }

    /// Command line suitable for logging, with the password masked.
    fn display_command(&self, tool: &Path, file: &Path) -> String {
        let mut mask_next = false;
        let mut rendered = vec![tool.display().to_string()];
        for arg in self.command_args(file) {
            if mask_next {
                rendered.push(REDACTED_PASSWORD.to_string());
                mask_next = false;
                continue;
            }
            mask_next = arg == "-p";
            rendered.push(arg.to_string_lossy().into_owned());
        }
        rendered.join(" ")
    }

    /// Import one JSON-array file. Any non-zero exit is an `ImportFailed` error.
    pub fn import_json(&self, file: &Path) -> Result<ImportSummary> {
        self.params.validate()?;
        let tool = self.tool_path()?;
        log::info!("Running {}", self.display_command(&tool, file));

        let output = Command::new(&tool).args(self.command_args(file)).output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(Error::ImportFailed {
                path: file.to_path_buf(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        // mongoimport reports on stderr; fall back to stdout for wrappers that don't
        let summary = parse_import_summary(&stderr)
            .or_else(|| parse_import_summary(&String::from_utf8_lossy(&output.stdout)))
            .unwrap_or_default();

        log::info!(
            "Imported {} into {} ({} documents, {} failed)",
            file.display(),
            self.params.namespace(),
            summary.imported,
            summary.failed
        );
        Ok(summary)
    }

    /// Import every matching file under `dir`, moving each one into `completed_dir`
    /// after it succeeds.
    ///
    /// Files already inside `completed_dir` are skipped. Every destination is checked
    /// before the first import, so a file that could not be moved afterwards is never
    /// imported. Stops at the first failure; files handled before it stay moved.
    pub fn import_directory(
        &self,
        dir: &Path,
        extension: &str,
        completed_dir: &Path,
    ) -> Result<Vec<ImportedFile>> {
        let pending: Vec<PathBuf> = collect_file_paths(dir, extension)?
            .into_iter()
            .filter(|path| !is_within(path, completed_dir))
            .collect();

        check_destinations(&pending, completed_dir)?;

        log::info!("Importing {} file(s) from {}", pending.len(), dir.display());

        let mut imported = Vec::with_capacity(pending.len());
        for source in pending {
            let summary = self.import_json(&source)?;
            let destination = move_file(&source, completed_dir)?;
            imported.push(ImportedFile { source, destination, summary });
        }

        Ok(imported)
    }
}

/// Fail with `DestinationExists` if any file in `pending` would land on an existing
/// path in `completed_dir`, or on the same path as another pending file.
fn check_destinations(pending: &[PathBuf], completed_dir: &Path) -> Result<()> {
    let mut claimed = HashSet::with_capacity(pending.len());
    for source in pending {
        let destination = destination_for(source, completed_dir)?;
        let taken = std::fs::symlink_metadata(&destination).is_ok();
        if taken || !claimed.insert(destination.clone()) {
            log::warn!("{} cannot be moved to {}", source.display(), destination.display());
            return Err(Error::DestinationExists(destination));
        }
    }
    Ok(())
}

/// Parse mongoimport's closing line.
/// Example lines:
/// - `2026-02-01T18:00:05.658+0400<TAB>3 document(s) imported successfully. 0 document(s) failed to import.`
/// - `47 document(s) imported successfully. 2 document(s) failed to import.`
fn parse_import_summary(output: &str) -> Option<ImportSummary> {
    output.lines().find_map(|line| {
        // Skip timestamp prefix (everything before the last tab)
        let content = line.rsplit('\t').next().unwrap_or(line);
        let (imported_part, rest) = content.split_once(" document(s) imported successfully")?;
        let imported: u64 = imported_part.split_whitespace().last()?.parse().ok()?;
        let failed = rest
            .split_once(" document(s) failed to import")
            .and_then(|(before, _)| before.split_whitespace().last()?.parse().ok())
            .unwrap_or(0);
        Some(ImportSummary { imported, failed })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn importer() -> MongoImporter {
        MongoImporter::new(
            ConnectionParams::new("localhost:27017", "todofuken", "prefectures")
                .with_credentials("loader", "s3cret"),
        )
    }

    #[test]
    fn test_command_args_with_credentials() {
        let args = importer().command_args(Path::new("input_data/tokyo.json"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "-h",
                "localhost:27017",
                "-u",
                "loader",
                "-p",
                "s3cret",
                "--db",
                "todofuken",
                "--collection",
                "prefectures",
                "--file",
                "input_data/tokyo.json",
                "--jsonArray",
            ]
        );
    }

    #[test]
    fn test_command_args_without_credentials() {
        let importer = MongoImporter::new(ConnectionParams::new("db:27017", "d", "c"));
        let args = importer.command_args(Path::new("x.json"));

        assert!(!args.iter().any(|a| a == "-u" || a == "-p"));
        assert_eq!(args.first().map(|a| a.as_os_str()), Some(OsStr::new("-h")));
        assert_eq!(args.last().map(|a| a.as_os_str()), Some(OsStr::new("--jsonArray")));
    }

    #[test]
    fn test_display_command_masks_password() {
        let importer = importer();
        let rendered =
            importer.display_command(Path::new("/usr/bin/mongoimport"), Path::new("a.json"));

        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains(&format!("-p {REDACTED_PASSWORD}")));
        assert!(rendered.starts_with("/usr/bin/mongoimport -h localhost:27017"));
    }

    #[test]
    fn test_parse_import_summary() {
        let line = "2026-02-01T18:00:05.658+0400\t3 document(s) imported successfully. 0 document(s) failed to import.";
        assert_eq!(parse_import_summary(line), Some(ImportSummary { imported: 3, failed: 0 }));

        let output = "2026-02-01T18:00:05.600+0400\tconnected to: mongodb://localhost/\n\
                      47 document(s) imported successfully. 2 document(s) failed to import.\n";
        assert_eq!(parse_import_summary(output), Some(ImportSummary { imported: 47, failed: 2 }));

        // Older tool versions only print the imported count
        let line = "2026-02-01T18:00:05.658+0400\t12 document(s) imported successfully.";
        assert_eq!(parse_import_summary(line), Some(ImportSummary { imported: 12, failed: 0 }));

        let line = "2026-02-01T18:00:05.600+0400\tconnected to: mongodb://localhost/";
        assert_eq!(parse_import_summary(line), None);
    }

    #[test]
    fn test_import_json_rejects_password_without_user() {
        let importer = MongoImporter::new(
            ConnectionParams::new("localhost:27017", "d", "c").with_credentials("", "s3cret"),
        )
        .with_tool_path("/nonexistent/mongoimport");

        // Rejected before the tool is spawned, so no Io error
        let err = importer.import_json(Path::new("a.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_explicit_tool_path_wins() {
        let importer = importer().with_tool_path("/opt/tools/mongoimport");
        assert_eq!(importer.tool_path().unwrap(), PathBuf::from("/opt/tools/mongoimport"));
    }
}
