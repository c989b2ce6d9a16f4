//! URI reference parsing, resolution and relativisation (RFC 3986)

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped in file URI paths: unreserved, sub-delims, `/`, `:`, `@`
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Borrowed components of a URI reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UriParts<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

impl<'a> UriParts<'a> {
    /// Split a URI reference into its components
    pub fn parse(uri: &'a str) -> Self {
        let mut rest = uri;
        let mut parts = UriParts::default();

        if let Some(colon) = rest.find(':') {
            let candidate = &rest[..colon];
            if is_scheme(candidate) {
                parts.scheme = Some(candidate);
                rest = &rest[colon + 1..];
            }
        }

        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            parts.authority = Some(&after[..end]);
            rest = &after[end..];
        }

        if let Some(hash) = rest.find('#') {
            parts.fragment = Some(&rest[hash + 1..]);
            rest = &rest[..hash];
        }
        if let Some(question) = rest.find('?') {
            parts.query = Some(&rest[question + 1..]);
            rest = &rest[..question];
        }
        parts.path = rest;
        parts
    }

    fn recompose(&self, path: &str) -> String {
        let mut out = String::new();
        if let Some(scheme) = self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        if let Some(authority) = self.authority {
            out.push_str("//");
            out.push_str(authority);
        }
        out.push_str(path);
        if let Some(query) = self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// True if `uri` starts with a scheme
pub fn is_absolute(uri: &str) -> bool {
    UriParts::parse(uri).scheme.is_some()
}

/// Remove `.` and `..` segments from a path (RFC 3986 §5.2.4)
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output: Vec<&str> = Vec::new();
    let absolute = path.starts_with('/');

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            output.pop();
        } else if input == "/.." {
            input = "/";
            output.pop();
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map(|i| i + start).unwrap_or(input.len());
            output.push(&input[..end]);
            input = &input[end..];
        }
    }

    let mut result: String = output.concat();
    if absolute && !result.starts_with('/') {
        result.insert(0, '/');
    }
    result
}

/// Merge a relative path with a base (RFC 3986 §5.2.3)
fn merge(base: &UriParts<'_>, path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{}", path)
    } else {
        let dir = base.path.rfind('/').map(|i| &base.path[..=i]).unwrap_or("");
        format!("{}{}", dir, path)
    }
}

/// Resolve `reference` against the absolute URI `base` (RFC 3986 §5.2.2)
pub fn resolve(reference: &str, base: &str) -> String {
    let r = UriParts::parse(reference);
    let b = UriParts::parse(base);

    let mut target = UriParts {
        fragment: r.fragment,
        ..UriParts::default()
    };
    let path;

    if r.scheme.is_some() {
        target.scheme = r.scheme;
        target.authority = r.authority;
        target.query = r.query;
        path = remove_dot_segments(r.path);
    } else {
        target.scheme = b.scheme;
        if r.authority.is_some() {
            target.authority = r.authority;
            target.query = r.query;
            path = remove_dot_segments(r.path);
        } else {
            target.authority = b.authority;
            if r.path.is_empty() {
                path = b.path.to_string();
                target.query = r.query.or(b.query);
            } else {
                target.query = r.query;
                path = if r.path.starts_with('/') {
                    remove_dot_segments(r.path)
                } else {
                    remove_dot_segments(&merge(&b, r.path))
                };
            }
        }
    }

    target.recompose(&path)
}

fn directory(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..=i]).unwrap_or("")
}

/// Express `uri` relative to `base` where possible.
///
/// The URI is returned unchanged if it differs from `base` in scheme or
/// authority, or if `root` is given and `uri` does not lie under the
/// directory of `root`.
pub fn relativise(uri: &str, base: &str, root: Option<&str>) -> String {
    let u = UriParts::parse(uri);
    let b = UriParts::parse(base);

    let same_origin = |other: &UriParts<'_>| {
        u.scheme.is_some() && u.scheme == other.scheme && u.authority == other.authority
    };
    if !same_origin(&b) || !u.path.starts_with('/') || !b.path.starts_with('/') {
        return uri.to_string();
    }
    if let Some(root) = root {
        let r = UriParts::parse(root);
        if !same_origin(&r) || !u.path.starts_with(directory(r.path)) {
            return uri.to_string();
        }
    }

    let base_dir = directory(b.path);
    let common = u
        .path
        .bytes()
        .zip(base_dir.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    // Back off to the last shared '/', which is always a char boundary
    let common = u.path.as_bytes()[..common]
        .iter()
        .rposition(|&b| b == b'/')
        .map(|i| i + 1)
        .unwrap_or(0);

    let up = base_dir[common..].matches('/').count();
    let mut relative = "../".repeat(up);
    relative.push_str(&u.path[common..]);
    if relative.is_empty() && u.query.is_none() && u.fragment.is_none() {
        relative.push_str("./");
    }

    let tail = UriParts {
        path: "",
        query: u.query,
        fragment: u.fragment,
        ..UriParts::default()
    };
    format!("{}{}", relative, tail.recompose(""))
}

/// Build a `file:` URI (or a relative reference for relative paths)
pub fn file_uri(path: &str, hostname: Option<&str>) -> String {
    let path = path.replace('\\', "/");
    let bytes = path.as_bytes();
    let is_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';

    let mut uri = String::with_capacity(path.len() + 8);
    if path.starts_with('/') || is_drive {
        uri.push_str("file://");
        if let Some(host) = hostname {
            uri.push_str(host);
        }
        if is_drive {
            uri.push('/');
        }
    }
    uri.extend(utf8_percent_encode(&path, PATH_SET));
    uri
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-decode, dropping malformed escapes entirely
fn lenient_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value);
            let lo = bytes.get(i + 2).copied().and_then(hex_value);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(hi << 4 | lo);
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Convert a `file:` URI (or relative reference) back to a path and hostname.
///
/// Returns `None` for URIs with any other scheme.
pub fn file_uri_parse(uri: &str) -> Option<(String, Option<String>)> {
    if let Some(rest) = uri.strip_prefix("file://") {
        let (hostname, mut path) = if rest.starts_with('/') {
            (None, rest)
        } else {
            let slash = rest.find('/')?;
            (Some(rest[..slash].to_string()), &rest[slash..])
        };
        let bytes = path.as_bytes();
        if bytes.len() >= 3 && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
            path = &path[1..];
        }
        Some((lenient_decode(path), hostname))
    } else if is_absolute(uri) {
        None
    } else {
        Some((lenient_decode(uri), None))
    }
}
