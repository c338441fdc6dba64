use crate::models::SpeakerLinePattern;

/// A line recognized as a speaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerLabel<'a> {
    /// Speaker name exactly as written (surrounding whitespace removed).
    pub name: &'a str,
    /// Dialogue that shares the label line, if the pattern allows it.
    pub inline: Option<&'a str>,
}

/// Try to read `line` as a speaker label under the given pattern.
pub fn match_speaker_line(line: &str, pattern: SpeakerLinePattern) -> Option<SpeakerLabel<'_>> {
    match pattern {
        SpeakerLinePattern::BareNameLine => {
            bare_name(line).map(|name| SpeakerLabel { name, inline: None })
        }
        SpeakerLinePattern::CapsColonLine => caps_colon(line).map(|(name, rest)| SpeakerLabel {
            name,
            inline: if rest.is_empty() { None } else { Some(rest) },
        }),
    }
}

/// A line that is nothing but a name: one or more whitespace-separated
/// tokens, every character alphabetic. Digits, punctuation, or a colon
/// anywhere disqualify the line.
fn bare_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let alphabetic = trimmed
        .split_whitespace()
        .all(|token| token.chars().all(char::is_alphabetic));
    if alphabetic { Some(trimmed) } else { None }
}

/// A line opening with an uppercase name and a colon, like
/// `MICHAEL BARBARO: From the New York Times.` The prefix must be at
/// least two characters of uppercase letters and spaces; whatever
/// follows the colon is returned trimmed.
fn caps_colon(line: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = line.trim_start().split_once(':')?;
    let name = prefix.trim_end();
    if name.chars().count() < 2 {
        return None;
    }
    let uppercase = name
        .split_whitespace()
        .all(|token| token.chars().all(|c| c.is_uppercase()));
    if uppercase { Some((name, rest.trim())) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(line: &str) -> Option<SpeakerLabel<'_>> {
        match_speaker_line(line, SpeakerLinePattern::BareNameLine)
    }

    fn caps(line: &str) -> Option<SpeakerLabel<'_>> {
        match_speaker_line(line, SpeakerLinePattern::CapsColonLine)
    }

    #[test]
    fn test_bare_name_matches_plain_names() {
        assert_eq!(bare("Alice Smith").unwrap().name, "Alice Smith");
        assert_eq!(bare("  Frances  ").unwrap().name, "Frances");
        assert_eq!(bare("michael barbaro").unwrap().name, "michael barbaro");
    }

    #[test]
    fn test_bare_name_rejects_sentences_and_punctuation() {
        assert!(bare("Hello there.").is_none());
        assert!(bare("Alice Smith:").is_none());
        assert!(bare("Speaker 1").is_none());
        assert!(bare("- Alice").is_none());
        assert!(bare("").is_none());
        assert!(bare("   ").is_none());
    }

    #[test]
    fn test_bare_name_never_carries_inline_text() {
        assert_eq!(bare("Alice").unwrap().inline, None);
    }

    #[test]
    fn test_caps_colon_splits_name_and_inline_text() {
        let label = caps("MICHAEL BARBARO: From the New York Times.").unwrap();
        assert_eq!(label.name, "MICHAEL BARBARO");
        assert_eq!(label.inline, Some("From the New York Times."));
    }

    #[test]
    fn test_caps_colon_with_empty_remainder() {
        let label = caps("ARCHIVED RECORDING:").unwrap();
        assert_eq!(label.name, "ARCHIVED RECORDING");
        assert_eq!(label.inline, None);

        // Whitespace after the colon counts as empty too.
        assert_eq!(caps("SABRINA TAVERNISE:   ").unwrap().inline, None);
    }

    #[test]
    fn test_caps_colon_requires_uppercase_prefix() {
        assert!(caps("Michael Barbaro: hello").is_none());
        assert!(caps("MICHAEL Barbaro: hello").is_none());
        assert!(caps("SPEAKER 1: hello").is_none());
    }

    #[test]
    fn test_caps_colon_requires_two_character_prefix() {
        assert!(caps("A: hello").is_none());
        assert!(caps(": hello").is_none());
        assert_eq!(caps("AL: hello").unwrap().name, "AL");
    }

    #[test]
    fn test_caps_colon_without_colon_is_not_a_label() {
        assert!(caps("MICHAEL BARBARO").is_none());
        assert!(caps("And the story continues.").is_none());
    }

    #[test]
    fn test_caps_colon_tolerates_missing_space_after_colon() {
        let label = caps("NEWSCASTER:Breaking news tonight.").unwrap();
        assert_eq!(label.inline, Some("Breaking news tonight."));
    }
}
