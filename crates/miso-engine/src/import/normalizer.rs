use super::Instrument;

/// Lowercase, strip invisible characters, and join words with underscores.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

pub(crate) fn instrument_for(value: &str) -> Option<Instrument> {
    match normalize_key(value).as_str() {
        "big_five" | "big5" | "bigfive" | "ipip" | "ipip_neo" | "bfi" => Some(Instrument::BigFive),
        "mbti" | "myers_briggs" => Some(Instrument::Mbti),
        "via" | "via_is" | "character_strengths" => Some(Instrument::Via),
        "dass" | "dass21" | "dass_21" => Some(Instrument::Dass),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_key(value)
}
