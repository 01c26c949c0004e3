//! Split chunk types.

use serde::{Deserialize, Serialize};

/// Location of a chunk within its source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Chunk index within the source (0-based).
    pub index: u32,
    /// Start byte offset in the source text.
    pub start_offset: u32,
    /// End byte offset in the source text.
    pub end_offset: u32,
}

impl ChunkMetadata {
    /// Creates metadata with offset information.
    pub fn new(index: u32, start_offset: u32, end_offset: u32) -> Self {
        Self {
            index,
            start_offset,
            end_offset,
        }
    }
}

/// A chunk borrowed from the source text.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// The chunk text content.
    pub text: &'a str,
    /// Position of the chunk in the source.
    pub metadata: ChunkMetadata,
}

impl<'a> Chunk<'a> {
    /// Creates a new chunk.
    pub fn new(text: &'a str, metadata: ChunkMetadata) -> Self {
        Self { text, metadata }
    }

    /// Converts to an owned chunk.
    pub fn into_owned(self) -> OwnedChunk {
        OwnedChunk {
            text: self.text.to_owned(),
            metadata: self.metadata,
        }
    }
}

/// An owned version of [`Chunk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedChunk {
    /// The chunk text content.
    pub text: String,
    /// Position of the chunk in the source.
    pub metadata: ChunkMetadata,
}
