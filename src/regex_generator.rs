use crate::Error;
use regex::Regex;

/// The placeholder tokens a route pattern may contain and the capture group each one is replaced with.
pub const PLACEHOLDER_TOKENS: [(&str, &str); 3] = [(":string", "([^/]+)"), (":int", "([0-9]+)"), (":any", "(.+)")];

// Stands in for a token when counting the groups of the literal text. It is valid both as an
// expression and inside a class, and captures nothing.
const NON_CAPTURING_TOKEN: &str = "(?:)";

// Tokens are replaced across the whole pattern in table order. Escaping never touches a token,
// since neither ':' nor a letter is expression syntax.
fn substitute_with<F>(pattern: &str, escape_literals: bool, replacement: F) -> (String, usize)
where
    F: Fn(&'static str) -> &'static str,
{
    let mut body = if escape_literals {
        regex::escape(pattern)
    } else {
        pattern.to_owned()
    };
    let mut tokens = 0;

    for &(token, capture) in PLACEHOLDER_TOKENS.iter() {
        let found = body.matches(token).count();
        if found > 0 {
            body = body.replace(token, replacement(capture));
            tokens += found;
        }
    }

    (body, tokens)
}

/// Rewrites the placeholder tokens of a pattern into capture groups and returns the body of the
/// expression together with the number of tokens replaced.
///
/// The replacement is literal: a token that happens to sit inside a literal segment, like the
/// `:int` in `/:integer`, is replaced as well.
pub(crate) fn substitute_tokens(pattern: &str, escape_literals: bool) -> (String, usize) {
    substitute_with(pattern, escape_literals, |capture| capture)
}

/// Counts the capture groups the literal text of a pattern opens on its own.
fn literal_groups(pattern: &str, escape_literals: bool) -> crate::Result<usize> {
    let (body, _) = substitute_with(pattern, escape_literals, |_| NON_CAPTURING_TOKEN);
    let re = Regex::new(body.as_str()).map_err(|e| Error::match_error(pattern, e))?;
    Ok(re.captures_len() - 1)
}

/// Compiles a route pattern into an expression which matches the whole request path, with an
/// optional trailing `/`.
///
/// Returns the compiled expression and the number of captures the pattern's tokens produce.
pub(crate) fn generate_exact_match_regex(pattern: &str, escape_literals: bool) -> crate::Result<(Regex, usize)> {
    let (body, tokens) = substitute_tokens(pattern, escape_literals);
    let re = Regex::new(format!("^{}/?$", body).as_str()).map_err(|e| Error::match_error(pattern, e))?;

    // Each token must own exactly one group of its own. Fewer means a token was swallowed, e.g.
    // by a class; the literal groups would otherwise take the token's positions.
    let literal = literal_groups(pattern, escape_literals)?;
    if re.captures_len() - 1 != literal + tokens {
        return Err(Error::match_error(
            pattern,
            format!(
                "expected {} capture groups ({} literal, {} from tokens), the expression has {}",
                literal + tokens,
                literal,
                tokens,
                re.captures_len() - 1
            ),
        ));
    }

    Ok((re, tokens))
}

/// Compiles a route pattern the way the router does, with literal text passed through as
/// expression syntax.
///
/// # Examples
///
/// ```
/// let re = routerify_lite::compile("/users/:int").unwrap();
///
/// assert!(re.is_match("/users/42"));
/// assert!(re.is_match("/users/42/"));
/// assert!(!re.is_match("/users/alice"));
/// ```
pub fn compile(pattern: &str) -> crate::Result<Regex> {
    generate_exact_match_regex(pattern, false).map(|(re, _)| re)
}
