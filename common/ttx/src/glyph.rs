//! The digit glyphs of a TTX document and their outlines.

use core::fmt;
use std::error;

use crate::document::{Document, Element, Node};

/// Tag of a glyph definition in the `glyf` table.
pub const GLYPH_TAG: &str = "TTGlyph";

/// Attribute holding the name of a glyph.
pub const NAME_ATTRIBUTE: &str = "name";

/// The number of digit glyphs.
pub const DIGIT_COUNT: usize = 10;

/// Names of the digit glyphs, indexed by the digit they draw.
pub const DIGIT_NAMES: [&str; DIGIT_COUNT] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Returns the first glyph definition named `name` in `document`.
pub fn find_glyph<'doc>(document: &'doc Document, name: &str) -> Option<&'doc Element> {
    document.find(GLYPH_TAG, NAME_ATTRIBUTE, name)
}

/// Returns the digit drawn by the glyph named `name`, if it is a digit glyph.
pub fn digit_of(name: &str) -> Option<usize> {
    DIGIT_NAMES
        .iter()
        .position(|digit_name| *digit_name == name)
}

/// Checks that `document` defines every glyph in [`DIGIT_NAMES`].
///
/// # Errors
///
/// Returns [`MissingGlyphError`] naming the first digit glyph that is not defined.
pub fn validate(document: &Document) -> Result<(), MissingGlyphError> {
    match DIGIT_NAMES
        .into_iter()
        .find(|name| find_glyph(document, name).is_none())
    {
        Some(name) => Err(MissingGlyphError { name }),
        None => Ok(()),
    }
}

/// The drawing of a glyph: every attribute except its name, and all of its children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    /// Attributes other than [`NAME_ATTRIBUTE`], in document order.
    attributes: Vec<(String, String)>,
    /// Contours, components and instructions.
    children: Vec<Node>,
}

impl Outline {
    /// Extracts the [`Outline`] of `glyph`.
    pub fn of(glyph: &Element) -> Self {
        let attributes = glyph
            .attributes()
            .filter(|(key, _)| *key != NAME_ATTRIBUTE)
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();

        Self {
            attributes,
            children: glyph.children().to_vec(),
        }
    }

    /// Builds a glyph definition named `name` that draws this [`Outline`].
    pub fn to_glyph(&self, name: &str) -> Element {
        let mut glyph = Element::new(GLYPH_TAG);
        glyph.set_attribute(NAME_ATTRIBUTE, name);
        for (key, value) in &self.attributes {
            glyph.set_attribute(key.as_str(), value.as_str());
        }
        for child in &self.children {
            glyph.push_child(child.clone());
        }

        glyph
    }
}

/// A glyph required for digit obfuscation is missing from a font.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct MissingGlyphError {
    /// The name of the missing glyph.
    pub name: &'static str,
}

impl fmt::Display for MissingGlyphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "font has no glyph named '{}': font must contain glyphs named 'zero', 'one', 'two' .. 'nine'",
            self.name
        )
    }
}

impl error::Error for MissingGlyphError {}
