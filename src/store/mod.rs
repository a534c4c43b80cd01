//! Archive cache and extraction staging for binary distributions.
//!
//! [`LocalArtifactStore`] keeps downloaded archives at deterministic
//! per-distribution paths; [`ExtractedArtifactStore`] reuses a shared
//! canonical extraction per distribution and hands every caller a private
//! staged copy. Neither relies on locks or a coordination service: benign
//! filesystem races resolve through idempotent creation and atomic moves.

mod extracted;
mod local;
pub mod staging;

pub use extracted::{
    DirectoryAndNaming, Downloader, ExtractedArtifactStore, Extractor, FileSetManifest,
};
pub use local::LocalArtifactStore;
