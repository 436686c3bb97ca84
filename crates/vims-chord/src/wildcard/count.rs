use tracing::debug;

use super::{Resolution, Resolver};
use crate::args::ChordArgs;
use crate::token::Wildcard;

/// Largest count a chord carries; longer digit runs are cut down to it.
pub const MAX_COUNT: usize = 9_999;

/// Resolves `{N}`.
///
/// A count starts with a digit token that does not begin with `0` and
/// continues through every following all-digit token, so `1 0` is ten.
/// A leading `0` is never a count; it stays free for "start of line".
/// Counts above [`MAX_COUNT`] resolve to [`MAX_COUNT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CountResolver;

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

impl Resolver for CountResolver {
    fn wildcard(&self) -> Wildcard {
        Wildcard::Count
    }

    fn resolve(&self, tokens: &[String], args: &mut ChordArgs, _after_count: bool) -> Resolution {
        if !self.can_start(&tokens[0]) {
            return Resolution::NoMatch;
        }

        let consumed = tokens.iter().take_while(|t| is_digits(t)).count();
        let digits: String = tokens[..consumed].concat();
        // All digits, so parsing only fails on overflow.
        let n = digits.parse::<usize>().unwrap_or(usize::MAX);
        if n > MAX_COUNT {
            debug!(count = %digits, max = MAX_COUNT, "count capped");
        }
        args.count = Some(n.min(MAX_COUNT));
        Resolution::Matched(consumed)
    }

    fn first_tokens(&self) -> Vec<String> {
        (1..=9).map(|d| d.to_string()).collect()
    }

    fn can_start(&self, token: &str) -> bool {
        is_digits(token) && !token.starts_with('0')
    }

    fn completions(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn resolve(script: &str) -> (Resolution, ChordArgs) {
        let mut args = ChordArgs::default();
        let resolution = CountResolver.resolve(&tokenize(script), &mut args, false);
        (resolution, args)
    }

    #[test]
    fn test_single_digit() {
        let (res, args) = resolve("3 w");
        assert_eq!(res, Resolution::Matched(1));
        assert_eq!(args.count, Some(3));
    }

    #[test]
    fn test_zero_continues_a_count() {
        let (res, args) = resolve("1 0 j");
        assert_eq!(res, Resolution::Matched(2));
        assert_eq!(args.count, Some(10));
    }

    #[test]
    fn test_multi_digit_token() {
        let (res, args) = resolve("10 ,");
        assert_eq!(res, Resolution::Matched(1));
        assert_eq!(args.count, Some(10));
    }

    #[test]
    fn test_leading_zero_is_not_a_count() {
        let (res, args) = resolve("0");
        assert_eq!(res, Resolution::NoMatch);
        assert_eq!(args.count, None);
    }

    #[test]
    fn test_large_count_is_capped() {
        let (res, args) = resolve("1 0 0 0 0 0 x");
        assert_eq!(res, Resolution::Matched(6));
        assert_eq!(args.count, Some(MAX_COUNT));

        let (res, args) = resolve("99999999999999999999999 x");
        assert_eq!(res, Resolution::Matched(1));
        assert_eq!(args.count, Some(MAX_COUNT));
    }

    #[test]
    fn test_non_digit() {
        assert_eq!(resolve("x").0, Resolution::NoMatch);
    }
}
