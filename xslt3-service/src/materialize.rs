//! Turns uploaded payloads into engine documents and staged files

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use xslt_engine_traits::{DiagnosticSink, XsltProcessor};

use crate::error::{Error, Result};
use crate::request::{TransformRequest, Upload};

/// Context document used when a named template starts the transformation
/// and no XML payload was uploaded.
pub const PLACEHOLDER_DOCUMENT: &str = r#"<?xml version="1.0"?><unlikely_xml_element/>"#;

const FALLBACK_AUXILIARY_NAME: &str = "auxiliary";

/// An auxiliary upload written to disk for the duration of one request.
///
/// The file lives in its own temporary directory under its original file
/// name, so concurrent requests never collide. Dropping the value removes
/// the directory.
#[derive(Debug)]
pub struct AuxiliaryFile {
    path: PathBuf,
    dir: TempDir,
}

impl AuxiliaryFile {
    pub fn stage(upload: &Upload) -> Result<Self> {
        let name = file_name(upload.filename.as_deref())
            .unwrap_or(FALLBACK_AUXILIARY_NAME)
            .to_string();
        let io_error = |source| Error::AuxiliaryFile {
            name: name.clone(),
            source,
        };

        let dir = tempfile::Builder::new()
            .prefix("xslt3-aux-")
            .tempdir()
            .map_err(io_error)?;
        let path = dir.path().join(&name);
        fs::write(&path, &upload.bytes).map_err(io_error)?;

        debug!(path = %path.display(), bytes = upload.len(), "staged auxiliary file");
        Ok(Self { path, dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the file; documents get their system ids here
    pub fn directory(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for AuxiliaryFile {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "removing auxiliary file");
    }
}

/// Documents ready for compilation and execution
pub struct MaterializedInputs<D> {
    pub stylesheet: D,
    /// Parsed XML payload, the placeholder document, or nothing
    pub context: Option<D>,
    /// Must be held until the engine has finished
    pub auxiliary: Option<AuxiliaryFile>,
}

/// Stage the auxiliary payload and parse the XML and stylesheet payloads.
///
/// A parse failure is returned as-is; deciding whether it is a fault or is
/// already explained by recorded diagnostics is the caller's job. Any staged
/// auxiliary file is removed before an error is returned.
pub fn materialize<P: XsltProcessor>(
    processor: &mut P,
    request: &TransformRequest,
    sink: &mut dyn DiagnosticSink,
) -> Result<MaterializedInputs<P::Document>> {
    let auxiliary = request
        .auxiliary
        .as_ref()
        .map(AuxiliaryFile::stage)
        .transpose()?;

    let context = match &request.xml {
        Some(xml) => {
            let system_id = system_id(xml, auxiliary.as_ref());
            Some(processor.parse_document(&xml.text(), system_id.as_deref(), sink)?)
        }
        None if request.options.init_template.is_some() => {
            debug!("no XML payload, using placeholder context document");
            Some(processor.parse_document(PLACEHOLDER_DOCUMENT, None, sink)?)
        }
        None => None,
    };

    let system_id = system_id(&request.stylesheet, auxiliary.as_ref());
    let stylesheet =
        processor.parse_document(&request.stylesheet.text(), system_id.as_deref(), sink)?;

    Ok(MaterializedInputs {
        stylesheet,
        context,
        auxiliary,
    })
}

/// Where a document claims to live: next to the auxiliary file when there
/// is one, otherwise just its uploaded name.
fn system_id(upload: &Upload, auxiliary: Option<&AuxiliaryFile>) -> Option<String> {
    let name = file_name(upload.filename.as_deref())?;
    Some(match auxiliary {
        Some(aux) => aux.directory().join(name).display().to_string(),
        None => name.to_string(),
    })
}

/// Final path component of a client-supplied file name
fn file_name(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    // Clients on Windows send backslash-separated paths
    let last = raw.rsplit(['/', '\\']).next()?;
    match last {
        "" | "." | ".." => {
            if !raw.is_empty() {
                warn!(filename = raw, "ignoring unusable upload file name");
            }
            None
        }
        name => Some(name),
    }
}
