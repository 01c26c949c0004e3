//! Document loading and chunking.
//!
//! Documents are read into plain text (PDF text extraction or UTF-8 read) and
//! split with [`text-splitter`], which recursively prefers the largest semantic
//! boundary that keeps a chunk under the character bound: paragraph breaks,
//! then line breaks, then sentences and words, and finally single characters.
//!
//! [`text-splitter`]: text_splitter

mod chunk;
mod chunker;
mod format;

pub use chunk::{Chunk, ChunkMetadata, OwnedChunk};
pub use chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DocumentChunker};
pub use format::DocumentFormat;
