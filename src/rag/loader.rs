//! Document loading for ingestion.
//!
//! Reads the immediate children of a directory, extracts text from `.txt` and
//! `.pdf` files, and runs each file's text through the [`TextChunker`]. A file
//! that cannot be read or parsed is logged and reported, never fatal: one bad
//! PDF must not block the rest of the directory.

use crate::rag::chunker::TextChunker;
use crate::types::{AppError, DocumentChunk, Result, SkipReason, SkippedFile};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Separator placed between extracted PDF pages.
const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(DocumentKind::Text),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// Output of [`DocumentLoader::load`]: chunks in file-name order plus every
/// file that was passed over.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub chunks: Vec<DocumentChunk>,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

impl LoadedDocuments {
    /// Just the chunk texts, in order.
    pub fn texts(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.text.clone()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    chunker: TextChunker,
}

impl DocumentLoader {
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }

    /// Load and chunk every supported file directly inside `dir`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if `dir` does not exist.
    /// - [`AppError::InvalidArgument`] if `dir` is not a directory.
    ///
    /// Per-file failures are not errors; they end up in
    /// [`LoadedDocuments::skipped`].
    pub async fn load(&self, dir: &Path) -> Result<LoadedDocuments> {
        let metadata = match tokio::fs::metadata(dir).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Document directory {} does not exist",
                    dir.display()
                )));
            }
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Failed to inspect {}: {}",
                    dir.display(),
                    e
                )));
            }
        };
        if !metadata.is_dir() {
            return Err(AppError::InvalidArgument(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut paths = list_entries(dir).await?;
        // read_dir order is platform-dependent
        paths.sort();

        let mut loaded = LoadedDocuments::default();
        for path in paths {
            let Some(kind) = supported_file(&path).await else {
                info!(file = %path.display(), "Skipping unsupported file type");
                loaded.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::Unsupported,
                });
                continue;
            };

            match extract_text(&path, kind).await {
                Ok(text) => {
                    let source = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let chunks = self.chunker.chunk(&text);
                    debug!(file = %source, chunks = chunks.len(), "Chunked document");
                    loaded
                        .chunks
                        .extend(chunks.into_iter().enumerate().map(|(chunk_index, text)| {
                            DocumentChunk {
                                text,
                                source: source.clone(),
                                chunk_index,
                            }
                        }));
                    loaded.files_loaded += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Skipping document");
                    let reason = match e {
                        AppError::PartialIngestFailure { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    loaded.skipped.push(SkippedFile {
                        path,
                        reason: SkipReason::Failed(reason),
                    });
                }
            }
        }

        info!(
            dir = %dir.display(),
            files = loaded.files_loaded,
            chunks = loaded.chunks.len(),
            skipped = loaded.skipped.len(),
            "Loaded documents"
        );
        Ok(loaded)
    }
}

/// Load and chunk every supported file in `dir`, returning only the chunk
/// texts.
pub async fn load_documents(dir: &Path, chunker: TextChunker) -> Result<Vec<String>> {
    Ok(DocumentLoader::new(chunker).load(dir).await?.texts())
}

async fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        AppError::Internal(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        AppError::Internal(format!("Failed to read directory {}: {}", dir.display(), e))
    })? {
        paths.push(entry.path());
    }
    Ok(paths)
}

async fn supported_file(path: &Path) -> Option<DocumentKind> {
    let kind = DocumentKind::from_path(path)?;
    match tokio::fs::metadata(path).await {
        Ok(m) if m.is_file() => Some(kind),
        _ => None,
    }
}

async fn extract_text(path: &Path, kind: DocumentKind) -> Result<String> {
    let failure = |reason: String| AppError::PartialIngestFailure {
        path: path.to_path_buf(),
        reason,
    };

    match kind {
        DocumentKind::Text => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| failure(e.to_string())),
        DocumentKind::Pdf => {
            let owned = path.to_path_buf();
            // pdf-extract is synchronous and can be slow on large files
            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_by_pages(&owned)
            })
            .await
            .map_err(|e| failure(format!("PDF extraction task failed: {}", e)))?
            .map_err(|e| failure(e.to_string()))?;

            Ok(pages.join(PAGE_SEPARATOR))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader(size: usize, overlap: usize) -> DocumentLoader {
        DocumentLoader::new(TextChunker::new(size, overlap).unwrap())
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/notes.TXT")),
            Some(DocumentKind::Text)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("report.Pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_path(Path::new("image.png")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = loader(80, 20).load(&dir.path().join("nope")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_instead_of_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let result = loader(80, 20).load(&file).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_loads_text_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "John Doe founded the company.").unwrap();
        std::fs::write(dir.path().join("a.txt"), "SGFD is an AI defence company.").unwrap();

        let loaded = loader(80, 20).load(dir.path()).await.unwrap();

        assert_eq!(loaded.files_loaded, 2);
        assert_eq!(
            loaded.texts(),
            vec!["SGFD is an AI defence company.", "John Doe founded the company."]
        );
        assert_eq!(loaded.chunks[1].source, "b.txt");
        assert_eq!(loaded.chunks[1].chunk_index, 0);
    }

    #[tokio::test]
    async fn test_unsupported_and_nested_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# heading").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();
        std::fs::write(dir.path().join("nested.txt").join("inner.txt"), "hidden").unwrap();
        std::fs::write(dir.path().join("keep.txt"), "visible words").unwrap();

        let loaded = loader(80, 20).load(dir.path()).await.unwrap();

        assert_eq!(loaded.texts(), vec!["visible words"]);
        assert_eq!(loaded.skipped.len(), 2);
        assert!(loaded
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::Unsupported));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_does_not_abort_load() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4 this is not a pdf").unwrap();
        std::fs::write(dir.path().join("good.txt"), "still ingested").unwrap();

        let loaded = loader(80, 20).load(dir.path()).await.unwrap();

        assert_eq!(loaded.texts(), vec!["still ingested"]);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(matches!(loaded.skipped[0].reason, SkipReason::Failed(_)));
    }

    /// Minimal PDF with one Helvetica text line per page.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let font_id = 3 + pages.len() * 2;
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 3 + i * 2))
            .collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {} 0 R >> >> /Contents {} 0 R >>",
                font_id,
                4 + i * 2
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[tokio::test]
    async fn test_pdf_pages_are_joined_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.PDF");
        std::fs::write(&path, pdf_with_pages(&["Alpha page words", "Beta page words"])).unwrap();

        let text = extract_text(&path, DocumentKind::Pdf).await.unwrap();
        let alpha = text.find("Alpha").unwrap();
        let beta = text.find("Beta").unwrap();
        assert!(alpha < beta);
        assert!(text[alpha..beta].contains(PAGE_SEPARATOR));

        let loaded = loader(80, 20).load(dir.path()).await.unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.files_loaded, 1);
        assert_eq!(loaded.texts(), vec!["Alpha page words Beta page words"]);
        assert_eq!(loaded.chunks[0].source, "report.PDF");
    }

    #[tokio::test]
    async fn test_invalid_utf8_text_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("binary.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let loaded = loader(80, 20).load(dir.path()).await.unwrap();

        assert!(loaded.chunks.is_empty());
        assert!(matches!(loaded.skipped[0].reason, SkipReason::Failed(_)));
    }

    #[tokio::test]
    async fn test_long_text_is_chunked() {
        let dir = TempDir::new().unwrap();
        let body: Vec<String> = (0..25).map(|i| format!("word{}", i)).collect();
        std::fs::write(dir.path().join("long.txt"), body.join(" ")).unwrap();

        let chunks = load_documents(dir.path(), TextChunker::new(10, 5).unwrap())
            .await
            .unwrap();

        assert_eq!(chunks.len(), 4);
        assert!(chunks[0].starts_with("word0 "));
        assert!(chunks[3].ends_with("word24"));
    }
}
