use super::{Resolution, Resolver};
use crate::args::ChordArgs;
use crate::token::{token_char, Wildcard};

/// Resolves `{char}`: any single character token, plus `space`, `tab` and
/// `enter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharResolver;

impl Resolver for CharResolver {
    fn wildcard(&self) -> Wildcard {
        Wildcard::Char
    }

    fn resolve(&self, tokens: &[String], args: &mut ChordArgs, _after_count: bool) -> Resolution {
        match token_char(&tokens[0]) {
            Some(c) => {
                args.character = Some(c);
                Resolution::Matched(1)
            }
            None => Resolution::NoMatch,
        }
    }

    fn first_tokens(&self) -> Vec<String> {
        Vec::new()
    }

    fn can_start(&self, token: &str) -> bool {
        token_char(token).is_some()
    }

    fn completions(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_printable_and_space() {
        let mut args = ChordArgs::default();
        let tokens = vec!["space".to_string()];
        assert_eq!(
            CharResolver.resolve(&tokens, &mut args, false),
            Resolution::Matched(1)
        );
        assert_eq!(args.character, Some(' '));
    }

    #[test]
    fn test_rejects_named_keys() {
        let mut args = ChordArgs::default();
        let tokens = vec!["escape".to_string()];
        assert_eq!(
            CharResolver.resolve(&tokens, &mut args, false),
            Resolution::NoMatch
        );
        assert!(args.character.is_none());
    }
}
