//! Generation of fonts whose digit glyphs draw other digits.

use core::{fmt, str::FromStr};
use std::error;

use rand::Rng;

use crate::{
    document::{Document, WriteDocumentError},
    glyph::{
        self, DIGIT_COUNT, DIGIT_NAMES, GLYPH_TAG, MissingGlyphError, NAME_ATTRIBUTE, Outline,
    },
    permutation::{ParsePermutationError, Permutation},
};

/// The number of hex digits of the content hash used in an [`ArtifactName`].
pub const HASH_LENGTH: usize = 10;

/// A validated source font along with the outlines of its digit glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFont {
    /// The parsed source document. It is never modified.
    document: Document,
    /// The outline of each digit glyph, indexed by digit.
    outlines: Vec<Outline>,
}

impl SourceFont {
    /// Validates `document` and collects the outlines of its digit glyphs.
    ///
    /// # Errors
    ///
    /// Returns [`MissingGlyphError`] if one of the digit glyphs is not defined.
    pub fn new(document: Document) -> Result<Self, MissingGlyphError> {
        glyph::validate(&document)?;

        let outlines = DIGIT_NAMES
            .into_iter()
            .filter_map(|name| glyph::find_glyph(&document, name))
            .map(Outline::of)
            .collect();

        Ok(Self { document, outlines })
    }

    /// Returns the source [`Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the [`Outline`] the source font draws for `digit`.
    pub fn outline(&self, digit: usize) -> Option<&Outline> {
        self.outlines.get(digit)
    }

    /// Builds a copy of the source [`Document`] in which the glyph named after digit `i` draws
    /// the outline of digit `permutation.get(i)`.
    ///
    /// Only the first definition of each digit glyph is rebuilt. Glyph names, their order, and
    /// everything outside of the digit glyphs are copied unchanged.
    pub fn permuted(&self, permutation: Permutation) -> Document {
        let mut pending = [true; DIGIT_COUNT];

        self.document.rebuild(&mut |element| {
            if element.name() != GLYPH_TAG {
                return None;
            }

            let name = element.attribute(NAME_ATTRIBUTE)?;
            let digit = glyph::digit_of(name)?;
            if !core::mem::replace(&mut pending[digit], false) {
                return None;
            }

            let source = permutation.get(digit)?;
            let outline = self.outlines.get(source)?;
            Some(outline.to_glyph(name))
        })
    }

    /// Draws a random [`Permutation`] from `rng` and applies it. See [`SourceFont::apply()`].
    ///
    /// # Errors
    ///
    /// Returns [`WriteDocumentError`] if the permuted document cannot be serialized.
    pub fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Shuffled, WriteDocumentError> {
        self.apply(Permutation::random(rng))
    }

    /// Applies `permutation` to the source font and serializes the result.
    ///
    /// # Errors
    ///
    /// Returns [`WriteDocumentError`] if the permuted document cannot be serialized.
    pub fn apply(&self, permutation: Permutation) -> Result<Shuffled, WriteDocumentError> {
        let text = self.permuted(permutation).to_xml_string()?;
        let name = ArtifactName::new(&text, permutation);

        Ok(Shuffled { text, name })
    }
}

/// A permuted TTX document, ready to be compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shuffled {
    /// The serialized document.
    text: String,
    /// The name under which the document and its compiled font are stored.
    name: ArtifactName,
}

impl Shuffled {
    /// Returns the serialized TTX text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the [`ArtifactName`] of the document.
    pub fn name(&self) -> &ArtifactName {
        &self.name
    }

    /// Returns the [`Permutation`] that produced the document.
    pub fn permutation(&self) -> Permutation {
        self.name.permutation
    }

    /// Consumes the [`Shuffled`] document, returning its [`ArtifactName`].
    pub fn into_name(self) -> ArtifactName {
        self.name
    }
}

/// The name of a generated font: `<hash>.<permutation>`.
///
/// The hash is the start of the MD5 digest of the permuted TTX text, and the permutation records
/// which digit each glyph draws.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArtifactName {
    /// Lowercase hex digits of the content hash.
    hash: String,
    /// The applied [`Permutation`].
    permutation: Permutation,
}

impl ArtifactName {
    /// Creates the [`ArtifactName`] of the TTX `text` produced by `permutation`.
    pub fn new(text: &str, permutation: Permutation) -> Self {
        let mut hash = format!("{:x}", md5::compute(text.as_bytes()));
        hash.truncate(HASH_LENGTH);

        Self { hash, permutation }
    }

    /// Parses an [`ArtifactName`] from the name of a generated file, ignoring a trailing `.ttf`
    /// or `.ttx` extension.
    ///
    /// # Errors
    ///
    /// Returns [`ParseArtifactNameError`] if `file_name` is not a valid artifact name.
    pub fn from_file_name(file_name: &str) -> Result<Self, ParseArtifactNameError> {
        let stem = file_name
            .strip_suffix(".ttf")
            .or_else(|| file_name.strip_suffix(".ttx"))
            .unwrap_or(file_name);

        stem.parse()
    }

    /// Returns the content hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the applied [`Permutation`].
    pub fn permutation(&self) -> Permutation {
        self.permutation
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.hash, self.permutation)
    }
}

impl FromStr for ArtifactName {
    type Err = ParseArtifactNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash, permutation) = s
            .split_once('.')
            .ok_or(ParseArtifactNameError::MissingSeparator)?;

        if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseArtifactNameError::InvalidHash);
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
            permutation: permutation.parse()?,
        })
    }
}

/// Various errors that can occur while parsing an [`ArtifactName`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ParseArtifactNameError {
    /// There is no `.` between the hash and the permutation.
    MissingSeparator,
    /// The hash is empty or contains non-hex characters.
    InvalidHash,
    /// The permutation is invalid.
    Permutation(ParsePermutationError),
}

impl From<ParsePermutationError> for ParseArtifactNameError {
    fn from(value: ParsePermutationError) -> Self {
        Self::Permutation(value)
    }
}

impl fmt::Display for ParseArtifactNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("expected `<hash>.<permutation>`"),
            Self::InvalidHash => f.write_str("hash must be hexadecimal"),
            Self::Permutation(error) => write!(f, "invalid permutation: {error}"),
        }
    }
}

impl error::Error for ParseArtifactNameError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Permutation(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::glyph::find_glyph;

    static DIGITS: &str = include_str!("../../../test-data/digits.ttx");
    static MISSING_SEVEN: &str = include_str!("../../../test-data/missing-seven.ttx");

    fn source() -> SourceFont {
        SourceFont::new(Document::parse(DIGITS).unwrap()).unwrap()
    }

    /// Returns the outline drawn by every digit glyph of `document`, indexed by digit.
    fn outlines(document: &Document) -> Vec<Outline> {
        DIGIT_NAMES
            .iter()
            .map(|name| Outline::of(find_glyph(document, name).unwrap()))
            .collect()
    }

    #[test]
    fn rejects_font_missing_seven() {
        let document = Document::parse(MISSING_SEVEN).unwrap();
        assert_eq!(
            SourceFont::new(document),
            Err(MissingGlyphError { name: "seven" })
        );
    }

    #[test]
    fn glyphs_keep_their_names_and_order() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let shuffled = source.shuffle(&mut rng).unwrap();
            let document = Document::parse(shuffled.text()).unwrap();

            let names = |document: &Document| {
                document
                    .elements()
                    .filter(|element| element.name() == GLYPH_TAG)
                    .filter_map(|element| element.attribute(NAME_ATTRIBUTE))
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            };
            assert_eq!(names(&document), names(source.document()));
        }
    }

    #[test]
    fn outlines_are_redistributed_not_duplicated() {
        let source = source();
        let before = outlines(source.document());
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let shuffled = source.shuffle(&mut rng).unwrap();
            let after = outlines(&Document::parse(shuffled.text()).unwrap());

            for (digit, outline) in after.iter().enumerate() {
                let drawn = shuffled.permutation().get(digit).unwrap();
                assert_eq!(outline, &before[drawn]);
            }

            let debug = |outlines: &[Outline]| {
                outlines
                    .iter()
                    .map(|outline| format!("{outline:?}"))
                    .collect::<Vec<_>>()
            };
            let mut before_sorted = debug(before.as_slice());
            let mut after_sorted = debug(after.as_slice());
            before_sorted.sort();
            after_sorted.sort();
            assert_eq!(before_sorted, after_sorted);
        }
    }

    #[test]
    fn identity_leaves_document_unchanged() {
        let source = source();
        let shuffled = source.apply(Permutation::IDENTITY).unwrap();

        let document = Document::parse(shuffled.text()).unwrap();
        assert_eq!(&document, source.document());
    }

    #[test]
    fn only_digit_glyphs_change() {
        let source = source();
        let permutation = "9876543210".parse().unwrap();
        let permuted = source.permuted(permutation);

        assert_eq!(
            find_glyph(&permuted, ".notdef"),
            find_glyph(source.document(), ".notdef")
        );
        assert_eq!(
            permuted.find("mtx", "name", "one"),
            source.document().find("mtx", "name", "one")
        );
        assert_eq!(
            Outline::of(find_glyph(&permuted, "zero").unwrap()),
            source.outline(9).unwrap().clone()
        );
    }

    #[test]
    fn only_first_duplicate_is_rebuilt() {
        let document = Document::parse(concat!(
            "<glyf>",
            r#"<TTGlyph name="zero" m="0"/><TTGlyph name="one" m="1"/>"#,
            r#"<TTGlyph name="two" m="2"/><TTGlyph name="three" m="3"/>"#,
            r#"<TTGlyph name="four" m="4"/><TTGlyph name="five" m="5"/>"#,
            r#"<TTGlyph name="six" m="6"/><TTGlyph name="seven" m="7"/>"#,
            r#"<TTGlyph name="eight" m="8"/><TTGlyph name="nine" m="9"/>"#,
            r#"<TTGlyph name="zero" m="duplicate"/>"#,
            "</glyf>",
        ))
        .unwrap();
        let source = SourceFont::new(document).unwrap();

        let permuted = source.permuted("1023456789".parse().unwrap());
        let markers = permuted
            .root()
            .child_elements()
            .filter_map(|glyph| glyph.attribute("m"))
            .collect::<Vec<_>>();

        assert_eq!(
            markers,
            ["1", "0", "2", "3", "4", "5", "6", "7", "8", "9", "duplicate"]
        );
    }

    #[test]
    fn names_hash_content_and_record_permutation() {
        let source = source();
        let permutation = "3901827465".parse::<Permutation>().unwrap();
        let shuffled = source.apply(permutation).unwrap();
        let name = shuffled.name();

        let digest = format!("{:x}", md5::compute(shuffled.text()));
        assert_eq!(name.hash(), &digest[..HASH_LENGTH]);
        assert_eq!(name.permutation(), permutation);
        let expected = format!("{}.3901827465", &digest[..HASH_LENGTH]);
        assert_eq!(name.to_string(), expected);

        // identical permutations produce identical names
        assert_eq!(source.apply(permutation).unwrap().name(), name);
    }

    #[test]
    fn distinct_permutations_have_distinct_names() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(3);
        let mut permutations = HashSet::new();
        let mut names = HashSet::new();

        for _ in 0..30 {
            let shuffled = source.shuffle(&mut rng).unwrap();
            permutations.insert(shuffled.permutation());
            names.insert(shuffled.name().hash().to_owned());
        }

        assert_eq!(names.len(), permutations.len());
    }

    #[test]
    fn parses_artifact_file_names() {
        let name = ArtifactName::from_file_name("0a1B2c3d4e.3901827465.ttf").unwrap();

        assert_eq!(name.hash(), "0a1b2c3d4e");
        assert_eq!(name.permutation().to_string(), "3901827465");
        assert_eq!(
            ArtifactName::from_file_name("0a1b2c3d4e.3901827465.ttx"),
            Ok(name.clone())
        );
        assert_eq!(
            "0a1b2c3d4e".parse::<ArtifactName>(),
            Err(ParseArtifactNameError::MissingSeparator)
        );
        assert_eq!(
            "xyz.3901827465".parse::<ArtifactName>(),
            Err(ParseArtifactNameError::InvalidHash)
        );
        assert_eq!(
            "0a1b.39018274".parse::<ArtifactName>(),
            Err(ParseArtifactNameError::Permutation(
                ParsePermutationError::InvalidLength(8)
            ))
        );
    }
}
