//! The `ttx` crate provides the font side of digit obfuscation: reading TTX documents, checking
//! that they define the ten digit glyphs, and producing copies of them in which the digit glyphs
//! draw each other's outlines.
//!
//! # TTX documents
//!
//! TTX is the XML representation of a font written and read by the `ttx` tool from fontTools.
//! [`Document`] holds an owned tree of such a file and can rebuild and serialize it. Only the
//! `TTGlyph` elements of the `glyf` table are interpreted; everything else is opaque and copied
//! through unchanged.
//!
//! # Digit permutations
//!
//! A [`Permutation`] assigns each digit the artwork of another digit. [`SourceFont::apply()`]
//! builds the permuted document and names it with an [`ArtifactName`]: a content hash followed by
//! the permutation's digits, which is all that is needed to decode text set in the font.

pub mod document;
pub mod glyph;
pub mod permutation;
pub mod shuffle;

pub use document::{Document, Element, Node, ParseDocumentError, WriteDocumentError};
pub use glyph::{DIGIT_NAMES, MissingGlyphError, Outline, validate};
pub use permutation::{ParsePermutationError, Permutation};
pub use shuffle::{ArtifactName, ParseArtifactNameError, Shuffled, SourceFont};
