use crate::action::Action;
use crate::regex_generator::generate_exact_match_regex;
use crate::types::RouteParams;
use http::Method;
use regex::Regex;
use std::fmt::{self, Debug, Formatter};

/// Represents a single registered route.
///
/// A route consists of a pattern, an optional method condition and an [Action](./enum.Action.html).
/// It shouldn't be created directly, use [RouterBuilder](./struct.RouterBuilder.html) methods
/// to register a route.
///
/// The pattern is compiled once when the router is built. A pattern which fails to compile is
/// kept in the table but never matches.
pub struct Route<E> {
    pub(crate) pattern: String,
    // `Some` for a route registered through the method sugar; it only takes part in
    // requests with that method.
    pub(crate) condition: Option<Method>,
    pub(crate) action: Action<E>,
    matcher: crate::Result<(Regex, usize)>,
}

impl<E> Route<E> {
    pub(crate) fn new(pattern: String, condition: Option<Method>, action: Action<E>, escape_literals: bool) -> Route<E> {
        let matcher = generate_exact_match_regex(pattern.as_str(), escape_literals);

        Route {
            pattern,
            condition,
            action,
            matcher,
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn condition(&self) -> Option<&Method> {
        self.condition.as_ref()
    }

    pub fn action(&self) -> &Action<E> {
        &self.action
    }

    /// Returns `true` if the pattern compiled into a usable matcher.
    pub fn is_valid(&self) -> bool {
        self.matcher.is_ok()
    }

    pub(crate) fn applies_to(&self, method: &Method) -> bool {
        self.condition.as_ref().map(|m| m == method).unwrap_or(true)
    }

    /// Matches the route against the target path and returns the captured parameters, group 0
    /// excluded.
    ///
    /// Returns the compile error of a malformed pattern. A capture group which did not take part
    /// in the match yields an empty parameter.
    pub(crate) fn captures(&self, target_path: &str) -> Result<Option<RouteParams>, &crate::Error> {
        let (re, _) = self.matcher.as_ref()?;

        let caps = match re.captures(target_path) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let mut params = RouteParams::with_capacity(caps.len() - 1);
        let mut iter = caps.iter();
        // Skip the first match because it's the whole path.
        iter.next();
        for group in iter {
            params.push(group.map(|g| g.as_str()).unwrap_or(""));
        }

        Ok(Some(params))
    }
}

impl<E> Debug for Route<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let regex = self.matcher.as_ref().ok().map(|(re, _)| re.as_str());
        write!(
            f,
            "{{ pattern: {:?}, condition: {:?}, regex: {:?}, action: {:?} }}",
            self.pattern, self.condition, regex, self.action
        )
    }
}
