use std::fmt::{self, Display, Formatter};
use std::ops::Index;

/// The positional parameters captured from the request path, in left-to-right order.
///
/// # Examples
///
/// ```
/// use routerify_lite::RouteParams;
///
/// let params = RouteParams::from(vec!["alice".to_owned(), "42".to_owned()]);
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params.get(1), Some("42"));
/// assert_eq!(&params[0], "alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<String>);

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(Vec::with_capacity(capacity))
    }

    pub(crate) fn push<V: Into<String>>(&mut self, value: V) {
        self.0.push(value.into());
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for RouteParams {
    fn from(params: Vec<String>) -> Self {
        RouteParams(params)
    }
}

impl Index<usize> for RouteParams {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        self.0[idx].as_str()
    }
}

impl<'a> IntoIterator for &'a RouteParams {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for RouteParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
