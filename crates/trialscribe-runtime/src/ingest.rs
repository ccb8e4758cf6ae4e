//! Plain-text ingestion collaborator.
//!
//! Walks a directory for `.txt`/`.md` files and chunks each one into
//! blank-line-separated paragraphs, producing the `{text, source_id,
//! chunk_index}` payloads the index consumes. Document formats that need
//! real extraction (PDF and friends) are expected to be converted to text
//! upstream.

use std::path::{Path, PathBuf};

use thiserror::Error;

use trialscribe_core::ChunkPayload;

/// Errors from source-material ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no input material found under {0}")]
    NoInputMaterial(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Split one document into paragraph chunks.
///
/// Paragraphs are blank-line separated; leading/trailing whitespace is
/// trimmed and empty paragraphs are skipped. Chunk indices count the kept
/// paragraphs.
pub fn chunk_text(source_id: &str, text: &str) -> Vec<ChunkPayload> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .enumerate()
        .map(|(index, paragraph)| ChunkPayload::new(paragraph, source_id, index))
        .collect()
}

/// Load every text document under `dir` (recursively) as chunk payloads.
///
/// Fails with [`IngestError::NoInputMaterial`] when the walk yields no
/// usable chunks — including when the directory does not exist.
pub fn load_directory(dir: &Path) -> Result<Vec<ChunkPayload>, IngestError> {
    let mut payloads = Vec::new();
    if dir.is_dir() {
        visit(dir, &mut payloads)?;
    }

    if payloads.is_empty() {
        return Err(IngestError::NoInputMaterial(dir.to_path_buf()));
    }

    tracing::info!(
        chunks = payloads.len(),
        dir = %dir.display(),
        "source material loaded"
    );
    Ok(payloads)
}

fn visit(dir: &Path, payloads: &mut Vec<ChunkPayload>) -> Result<(), IngestError> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    // Deterministic ingestion order regardless of directory enumeration.
    paths.sort();

    for path in paths {
        if path.is_dir() {
            visit(&path, payloads)?;
            continue;
        }

        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if !is_text {
            continue;
        }

        let text = std::fs::read_to_string(&path).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        let source_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
        payloads.extend(chunk_text(&source_id, &text));
    }

    Ok(())
}
