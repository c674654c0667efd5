//! Wrappers around the external programs that produce and join the PDFs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Converts one vector document into a fixed-layout PDF.
pub trait Renderer {
    fn render(&self, source: &Path, target: &Path) -> Result<()>;
}

/// Concatenates PDFs, in order, into one output document.
pub trait Merger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// Inkscape command-line SVG to PDF export.
#[derive(Debug, Clone)]
pub struct Inkscape {
    pub program: OsString,
}

impl Default for Inkscape {
    fn default() -> Self {
        Self {
            program: "inkscape".into(),
        }
    }
}

impl Inkscape {
    pub fn args(source: &Path, target: &Path) -> Vec<OsString> {
        let mut filename = OsString::from("--export-filename=");
        filename.push(target);
        vec![
            filename,
            "--export-type=pdf".into(),
            source.as_os_str().to_owned(),
        ]
    }
}

impl Renderer for Inkscape {
    fn render(&self, source: &Path, target: &Path) -> Result<()> {
        run_tool(&self.program, &Self::args(source, target))
    }
}

/// `pdfjoin` from the pdfjam suite.
#[derive(Debug, Clone)]
pub struct PdfJoin {
    pub program: OsString,
    pub landscape: bool,
}

impl Default for PdfJoin {
    fn default() -> Self {
        Self {
            program: "pdfjoin".into(),
            landscape: true,
        }
    }
}

impl PdfJoin {
    pub fn args(&self, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(inputs.len() + 3);
        if self.landscape {
            args.push("--landscape".into());
        }
        args.push("-o".into());
        args.push(output.as_os_str().to_owned());
        args.extend(inputs.iter().map(|p| p.as_os_str().to_owned()));
        args
    }
}

impl Merger for PdfJoin {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        run_tool(&self.program, &self.args(inputs, output))
    }
}

/// Run `program` to completion, turning spawn failures and non-zero exits into errors.
fn run_tool(program: &OsString, args: &[OsString]) -> Result<()> {
    let tool = program.to_string_lossy().into_owned();
    debug!(%tool, ?args, "running external tool");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| Error::ExternalTool {
            tool: tool.clone(),
            detail: format!("could not start: {err}"),
        })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!(%tool, stdout = %stdout.trim(), "tool output");
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            format!("exited with {}", output.status)
        } else {
            format!("exited with {}: {}", output.status, stderr.trim())
        };
        return Err(Error::ExternalTool { tool, detail });
    }
    Ok(())
}
