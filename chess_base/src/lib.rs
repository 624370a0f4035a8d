//! # Base types for openline
//!
//! Value types shared by the `openline` rules core: files, ranks, squares, colors, pieces, square
//! contents and castling rights, plus per-color rank geometry. Nothing here knows how pieces move.
//!
//! Normally you don't want to use this crate directly. Use `openline` instead.

pub mod geometry;
pub mod types;
