/// Normalizes a text or user key by stripping surrounding whitespace
/// and composing it into Unicode Normalization Form C.
///
/// ```
/// use voicebank::normalization::normalize_text;
/// assert_eq!(normalize_text(" e\u{301} "), "\u{e9}");
/// ```
pub fn normalize_text(text: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    text.as_ref().trim().nfc().collect()
}
