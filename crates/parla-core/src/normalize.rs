//! Text canonicalization applied before any answer comparison.
//!
//! Dictation and quiz answers are compared after both sides go through the same
//! normalizer, so casing, punctuation and stray whitespace never count as
//! mistakes. The output is idempotent: normalizing twice gives the same string.

use unicode_normalization::UnicodeNormalization;

/// Unicode punctuation stripped in addition to ASCII punctuation.
const EXTRA_PUNCTUATION: &[char] = &[
    '\u{00A1}', // ¡
    '\u{00A7}', // §
    '\u{00AB}', // «
    '\u{00B6}', // ¶
    '\u{00B7}', // ·
    '\u{00BB}', // »
    '\u{00BF}', // ¿
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2015}', // horizontal bar
    '\u{2018}', // ‘
    '\u{2019}', // ’
    '\u{201A}', // ‚
    '\u{201B}', // ‛
    '\u{201C}', // “
    '\u{201D}', // ”
    '\u{201E}', // „
    '\u{201F}', // ‟
    '\u{2020}', // †
    '\u{2021}', // ‡
    '\u{2022}', // •
    '\u{2026}', // …
    '\u{2030}', // ‰
    '\u{2032}', // ′
    '\u{2033}', // ″
    '\u{2039}', // ‹
    '\u{203A}', // ›
    '\u{203C}', // ‼
    '\u{2047}', // ⁇
    '\u{2048}', // ⁈
    '\u{2049}', // ⁉
    '\u{3001}', // 、
    '\u{3002}', // 。
    '\u{300C}', // 「
    '\u{300D}', // 」
    '\u{300E}', // 『
    '\u{300F}', // 』
    '\u{3010}', // 【
    '\u{3011}', // 】
    '\u{FF01}', // ！
    '\u{FF08}', // （
    '\u{FF09}', // ）
    '\u{FF0C}', // ，
    '\u{FF0E}', // ．
    '\u{FF1A}', // ：
    '\u{FF1B}', // ；
    '\u{FF1F}', // ？
];

/// Whether `c` belongs to the fixed punctuation set removed by the normalizer.
pub fn is_stripped_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

/// Configurable normalizer.
///
/// The default mode keeps diacritics (`"café"` and `"cafe"` differ) because
/// dictation checks spelling. Vocabulary meaning checks turn on
/// [`TextNormalizer::fold_diacritics`] so learners are not penalized for
/// missing accents on their keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextNormalizer {
    fold_diacritics: bool,
}

impl TextNormalizer {
    /// Normalizer that preserves diacritics.
    pub const fn new() -> Self {
        Self {
            fold_diacritics: false,
        }
    }

    /// Normalizer that also strips accents and expands common ligatures.
    pub const fn folding() -> Self {
        Self {
            fold_diacritics: true,
        }
    }

    /// Enable or disable diacritic folding.
    pub const fn fold_diacritics(mut self, fold: bool) -> Self {
        self.fold_diacritics = fold;
        self
    }

    /// Canonicalize `text`.
    ///
    /// Applies, in order:
    /// 1. Lowercase (and ligature expansion when folding)
    /// 2. NFD decomposition
    /// 3. Punctuation stripping (see [`is_stripped_punctuation`]), plus
    ///    combining-mark removal when folding
    /// 4. NFC recomposition when not folding
    /// 5. Whitespace collapse and trim
    ///
    /// Punctuation is matched on decomposed code points, since some
    /// characters (U+037E, U+0387, U+1FEF) only become punctuation after
    /// canonical decomposition.
    pub fn normalize(&self, text: &str) -> String {
        let mut lowered = text.to_lowercase();
        if self.fold_diacritics {
            lowered = lowered
                .replace('ß', "ss")
                .replace('æ', "ae")
                .replace('œ', "oe");
        }

        let fold = self.fold_diacritics;
        let decomposed = lowered
            .nfd()
            .filter(|c| !is_stripped_punctuation(*c) && !(fold && is_combining_mark(*c)));

        let composed: String = if fold {
            decomposed.collect()
        } else {
            decomposed.nfc().collect()
        };

        composed.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Normalize with the default (diacritic-preserving) settings.
pub fn normalize(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}
