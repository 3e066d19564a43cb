// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Case directories: one per uploaded document, named by its file stem.
//
// Layout under the cases root:
//
//   <root>/<case>/<case>_encrypted.pdf            redacted artifact (cache entry)
//   <root>/<case>/plantilla_respuesta_<case>.docx  response letter slot
//
// Directories are created on first use and never deleted here.

use std::path::{Path, PathBuf};

use faro_core::CaseId;
use faro_core::error::Result;
use tracing::debug;

/// Root under which case directories live.
#[derive(Debug, Clone)]
pub struct CaseStore {
    root: PathBuf,
}

impl CaseStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for `document`, creating it if needed.
    pub fn open(&self, document: &Path) -> Result<CaseDirectory> {
        let case = CaseId::from_document(document)?;
        let dir = self.root.join(case.as_str());
        std::fs::create_dir_all(&dir)?;
        debug!(case = %case, dir = %dir.display(), "Case directory ready");
        Ok(CaseDirectory { case, dir })
    }
}

/// One case's storage scope.
#[derive(Debug, Clone)]
pub struct CaseDirectory {
    case: CaseId,
    dir: PathBuf,
}

impl CaseDirectory {
    pub fn case_id(&self) -> &CaseId {
        &self.case
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn redacted_artifact_path(&self) -> PathBuf {
        self.dir.join(format!("{}_encrypted.pdf", self.case))
    }

    pub fn response_template_path(&self) -> PathBuf {
        self.dir.join(format!("plantilla_respuesta_{}.docx", self.case))
    }
}
