//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Kestrel CLI.

use crate::types::{IngestReport, RetrievedChunk, SkipReason};
use kestrel_vector::StoreStats;
use owo_colors::OwoColorize;

/// Printed when a query returns no chunks, for an empty store or `-k 0`.
const NO_CHUNKS: &str = "No chunks retrieved";

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print an ingestion summary, one line per skipped file
    pub fn ingest_report(&self, report: &IngestReport) {
        self.success(&format!(
            "Ingested {} chunks from {} files",
            report.chunks_added, report.files_loaded
        ));
        for skipped in &report.skipped {
            let reason = match &skipped.reason {
                SkipReason::Unsupported => "unsupported".to_string(),
                SkipReason::Failed(detail) => detail.clone(),
            };
            self.skipped(&skipped.path.display().to_string(), &reason);
        }
    }

    /// Print retrieved chunks, best match first
    pub fn chunks(&self, chunks: &[RetrievedChunk]) {
        if chunks.is_empty() {
            self.warning(NO_CHUNKS);
            return;
        }
        for (rank, chunk) in chunks.iter().enumerate() {
            let source = chunk
                .metadata
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            if self.colored {
                println!(
                    "  {} {} {}",
                    format!("[{}]", rank + 1).bright_cyan().bold(),
                    source.dimmed(),
                    format!("d={:.4}", chunk.distance).dimmed()
                );
            } else {
                println!("  [{}] {} d={:.4}", rank + 1, source, chunk.distance);
            }
            println!("      {}", chunk.text);
        }
    }

    /// Print store statistics
    pub fn stats(&self, stats: &StoreStats) {
        self.kv("records", &stats.record_count.to_string());
        self.kv("dimensions", &stats.dimensions.to_string());
        self.kv("memory", &format!("{} bytes", stats.memory_bytes));
        self.kv("index", &stats.index_path.display().to_string());
        self.kv("metadata", &stats.metadata_path.display().to_string());
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
