use http::Method;

pub(crate) const DEFAULT_NOT_FOUND_BODY: &str =
    "<h1>404 Not Found</h1>\nThe page that you have requested could not be found.";

pub(crate) const DEFAULT_ACTION_SEPARATOR: char = '.';

pub(crate) const METHOD_PREFIX_JOINER: &str = "_";

pub(crate) fn default_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::HEAD,
        Method::PUT,
        Method::DELETE,
        Method::TRACE,
        Method::CONNECT,
    ]
}
