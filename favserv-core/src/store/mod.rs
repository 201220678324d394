//! Favorites persistence
//!
//! This module provides the [`FavoritesStore`], an ordered collection of
//! server records backed by a pipe-delimited text file, and the line codec
//! that reads and writes that file.

mod codec;
mod favorites;

pub use codec::{
    CodecError, FILE_HEADER, MIN_FIELDS, decode_record, encode_record, is_comment_or_blank,
};
pub use favorites::{ChangeKind, FavoritesStore, LoadReport, StoreChange};
