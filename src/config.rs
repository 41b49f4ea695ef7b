use crate::constants;
use http::Method;
use std::path::PathBuf;

/// Decides when a named handler is swapped for its method-qualified variant, e.g. `showUser`
/// becoming `POST_showUser` for a `POST` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodPrefixPolicy {
    /// Prefix the handler name for every recognized method other than the default one.
    #[default]
    NonDefault,

    /// Prefix only when the handler group actually has the method-qualified handler, otherwise
    /// use the plain handler name.
    WhenDefined,

    /// Always use the plain handler name.
    Never,
}

/// What the router responds with when no route matches the request path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotFound {
    /// A `404 Not Found` with a short html message.
    #[default]
    Default,

    /// A `404 Not Found` with the content of the file at this path, read on every miss.
    Document(PathBuf),
}

/// Settings which control how a [Router](./struct.Router.html) matches and dispatches requests.
///
/// # Examples
///
/// ```
/// use routerify_lite::{MethodPrefixPolicy, RouterConfig};
///
/// let config = RouterConfig::default()
///     .ignore_query_string(false)
///     .method_prefix(MethodPrefixPolicy::WhenDefined)
///     .not_found_document("public/404.html");
///
/// assert!(!config.ignores_query_string());
/// ```
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub(crate) ignore_query_string: bool,
    pub(crate) percent_decode: bool,
    pub(crate) escape_literals: bool,
    pub(crate) separator: char,
    pub(crate) default_method: Method,
    pub(crate) methods: Vec<Method>,
    pub(crate) method_prefix: MethodPrefixPolicy,
    pub(crate) not_found: NotFound,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            ignore_query_string: true,
            percent_decode: false,
            escape_literals: false,
            separator: constants::DEFAULT_ACTION_SEPARATOR,
            default_method: Method::GET,
            methods: constants::default_methods(),
            method_prefix: MethodPrefixPolicy::default(),
            not_found: NotFound::default(),
        }
    }
}

impl RouterConfig {
    /// Strip everything from the first `?` before matching. Enabled by default.
    pub fn ignore_query_string(mut self, ignore: bool) -> Self {
        self.ignore_query_string = ignore;
        self
    }

    /// Percent-decode the request path before matching. Disabled by default.
    pub fn percent_decode(mut self, decode: bool) -> Self {
        self.percent_decode = decode;
        self
    }

    /// Treat the literal text of the patterns as plain text instead of expression syntax.
    /// Disabled by default.
    pub fn escape_literals(mut self, escape: bool) -> Self {
        self.escape_literals = escape;
        self
    }

    /// The character splitting a `"Group.handler"` action string. Defaults to `.`.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The method whose requests use the plain handler name. Defaults to `GET`.
    pub fn default_method(mut self, method: Method) -> Self {
        self.default_method = method;
        self
    }

    /// The methods for which a method-qualified handler name may be resolved.
    pub fn methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn method_prefix(mut self, policy: MethodPrefixPolicy) -> Self {
        self.method_prefix = policy;
        self
    }

    pub fn not_found(mut self, not_found: NotFound) -> Self {
        self.not_found = not_found;
        self
    }

    /// Serve the content of this file on a miss instead of the default message.
    pub fn not_found_document<P: Into<PathBuf>>(self, path: P) -> Self {
        self.not_found(NotFound::Document(path.into()))
    }

    pub fn ignores_query_string(&self) -> bool {
        self.ignore_query_string
    }

    pub fn is_recognized_method(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Returns the method prefix for the handler name, or `None` when the plain name is used.
    pub(crate) fn method_prefix_for(&self, method: &Method) -> Option<String> {
        if self.method_prefix == MethodPrefixPolicy::Never
            || !self.is_recognized_method(method)
            || *method == self.default_method
        {
            return None;
        }

        Some(format!("{}{}", method.as_str(), constants::METHOD_PREFIX_JOINER))
    }
}
