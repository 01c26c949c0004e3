//! Recursive character chunking of documents.

use std::path::Path;

use text_splitter::{ChunkConfig, TextSplitter};

use super::{Chunk, ChunkMetadata, DocumentFormat, OwnedChunk};
use crate::{Error, Result, TRACING_TARGET_INGEST};

/// Default maximum chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 350;

/// Default overlap between consecutive chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Splits documents into bounded, overlapping chunks.
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    max_characters: usize,
    overlap: usize,
    trim: bool,
}

impl DocumentChunker {
    /// Creates a chunker with trimming enabled.
    ///
    /// Fails when `max_characters` is zero or `overlap` is not smaller than it.
    pub fn new(max_characters: usize, overlap: usize) -> Result<Self> {
        if max_characters == 0 {
            return Err(Error::config("chunk size must be greater than zero"));
        }

        if overlap >= max_characters {
            return Err(Error::config(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({max_characters})"
            )));
        }

        Ok(Self {
            max_characters,
            overlap,
            trim: true,
        })
    }

    /// Sets whether surrounding whitespace is trimmed from chunks.
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Returns the maximum characters per chunk.
    pub fn max_characters(&self) -> usize {
        self.max_characters
    }

    /// Returns the overlap between chunks.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn splitter(&self) -> Result<TextSplitter<text_splitter::Characters>> {
        let config = ChunkConfig::new(self.max_characters)
            .with_overlap(self.overlap)
            .map_err(|e| Error::config(e.to_string()))?
            .with_trim(self.trim);

        Ok(TextSplitter::new(config))
    }

    /// Splits text into chunks with byte offset tracking.
    pub fn split<'a>(&self, text: &'a str) -> Result<Vec<Chunk<'a>>> {
        let chunks = self
            .splitter()?
            .chunk_indices(text)
            .enumerate()
            .map(|(index, (offset, chunk))| {
                let end = offset + chunk.len();
                Chunk::new(
                    chunk,
                    ChunkMetadata::new(index as u32, offset as u32, end as u32),
                )
            })
            .collect();

        Ok(chunks)
    }

    /// Splits text and returns owned chunks.
    pub fn split_owned(&self, text: &str) -> Result<Vec<OwnedChunk>> {
        Ok(self
            .split(text)?
            .into_iter()
            .map(Chunk::into_owned)
            .collect())
    }

    /// Loads a document and splits it into owned chunks.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_INGEST, fields(path = %path.display()))]
    pub fn chunk_file(&self, path: &Path) -> Result<Vec<OwnedChunk>> {
        let format = DocumentFormat::from_path(path)?;
        let text = format.load_text(path)?;

        tracing::debug!(
            target: TRACING_TARGET_INGEST,
            %format,
            text_len = text.len(),
            "Loaded document"
        );

        let chunks = self.split_owned(&text)?;

        tracing::info!(
            target: TRACING_TARGET_INGEST,
            total_chunks = chunks.len(),
            max_characters = self.max_characters,
            overlap = self.overlap,
            "Total chunks"
        );

        Ok(chunks)
    }
}

impl Default for DocumentChunker {
    fn default() -> Self {
        Self {
            max_characters: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            trim: true,
        }
    }
}
