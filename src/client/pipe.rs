/// Uppercases the first character of each whitespace-separated word and
/// lowercases the rest. Runs of whitespace are preserved.
pub fn capitalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize("software ENGINEER"), "Software Engineer");
        assert_eq!(capitalize("  bench  time "), "  Bench  Time ");
        assert_eq!(capitalize("élan vital"), "Élan Vital");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(capitalize(""), "");
    }
}
