//! Path template handling.
//!
//! Templates use `{param}` placeholders, as in Swagger path keys.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Extracts parameter names from a path template.
///
/// ## Examples
///
/// ```
/// use swagql_runtime::path::extract_path_params;
///
/// assert_eq!(extract_path_params("/pet"), Vec::<&str>::new());
/// assert_eq!(
///     extract_path_params("/store/{storeId}/order/{orderId}"),
///     vec!["storeId", "orderId"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = None;

    for (idx, c) in path.char_indices() {
        match c {
            '{' => start = Some(idx + 1),
            '}' => {
                if let Some(from) = start.take() {
                    let param = &path[from..idx];
                    if !param.is_empty() {
                        params.push(param);
                    }
                }
            }
            _ => {}
        }
    }

    params
}

/// Replaces every placeholder name with `{}`.
///
/// Two templates that differ only in parameter names normalize equally.
///
/// ```
/// use swagql_runtime::path::normalize_template;
///
/// assert_eq!(normalize_template("/pet/{petId}"), normalize_template("/pet/{id}"));
/// ```
pub fn normalize_template(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_param = false;
    for c in path.chars() {
        match c {
            '{' => {
                in_param = true;
                out.push_str("{}");
            }
            '}' if in_param => in_param = false,
            _ if in_param => {}
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a value for use as one path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Substitutes path parameters with their percent-encoded values.
///
/// Placeholders without a value are left in place.
///
/// ```
/// use swagql_runtime::path::substitute_path_params;
///
/// let path = substitute_path_params("/user/{username}", &[("username", "jane doe")]);
/// assert_eq!(path, "/user/jane%20doe");
/// ```
pub fn substitute_path_params(path: &str, params: &[(&str, &str)]) -> String {
    let mut result = path.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{name}}}");
        result = result.replace(&placeholder, &encode_segment(value));
    }
    result
}
