//! Shared fixtures for integration tests.
#![allow(dead_code)]

pub mod mocks;

use kestrel::KestrelConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const COMPANY_DOC: &str = "SGFD is an AI defence company.";
pub const FOUNDER_DOC: &str = "John Doe founded the company.";

/// A scratch workspace with a documents directory and a store directory.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("docs")).expect("create docs dir");
        Self { root }
    }

    pub fn docs(&self) -> PathBuf {
        self.root.path().join("docs")
    }

    pub fn data(&self) -> PathBuf {
        self.root.path().join("vectors")
    }

    pub fn write_doc(&self, name: &str, body: impl AsRef<[u8]>) -> PathBuf {
        let path = self.docs().join(name);
        std::fs::write(&path, body).expect("write document");
        path
    }

    /// Default configuration pointed at this workspace.
    pub fn config(&self) -> KestrelConfig {
        let mut config = KestrelConfig::default();
        config.rag.documents_dir = self.docs();
        config.rag.data_dir = self.data();
        config
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// The two-document corpus used throughout the pipeline tests.
pub fn company_workspace() -> Workspace {
    let workspace = Workspace::new();
    workspace.write_doc("company.txt", COMPANY_DOC);
    workspace.write_doc("founders.txt", FOUNDER_DOC);
    workspace
}
