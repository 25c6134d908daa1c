//! Kit-name prefix used in slice names

pub const DEFAULT_KIT_PREFIX: &str = "DK2";

/// Derive a slice-name prefix from a kit name: the first letter of every word,
/// uppercased, followed by any digits the last word ends with. Words with no
/// letters only count through that trailing-digit rule.
/// "Drum Kit 2" gives "DK2", "lo-fi_breaks" gives "LFB", "909" gives "909".
pub fn kit_prefix_from_name(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect();

    let mut prefix: String = words
        .iter()
        .filter_map(|w| w.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_uppercase)
        .collect();

    if let Some(last) = words.last() {
        let digits: String = last
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        prefix.push_str(&digits);
    }

    if prefix.is_empty() {
        return DEFAULT_KIT_PREFIX.to_string();
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kit_prefix_from_name() {
        assert_eq!(kit_prefix_from_name("Drum Kit 2"), "DK2");
        assert_eq!(kit_prefix_from_name("lo-fi_breaks"), "LFB");
        assert_eq!(kit_prefix_from_name("909"), "909");
        assert_eq!(kit_prefix_from_name("Trap Kit9"), "TK9");
        assert_eq!(kit_prefix_from_name("   "), DEFAULT_KIT_PREFIX);
    }
}
