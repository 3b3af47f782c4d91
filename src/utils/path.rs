use once_cell::sync::Lazy;
use regex::Regex;

/// Jekyll post filename prefix: `2024-01-31-`
static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-").expect("date prefix regex"));

/// Canonical form of a resource address: forward slashes, no leading `/` or `./`
pub fn normalize_address(address: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in address.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Join address segments with single slashes
pub fn join_address(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if base.is_empty() {
        normalize_address(name)
    } else {
        normalize_address(&format!("{}/{}", base, name))
    }
}

/// Get the extension of an address as a string
pub fn get_extension(address: &str) -> Option<&str> {
    let file = address.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Address with its extension removed: `about/index.html` -> `about/index`
pub fn strip_extension(address: &str) -> &str {
    match get_extension(address) {
        Some(ext) => &address[..address.len() - ext.len() - 1],
        None => address,
    }
}

/// File name without extension
pub fn get_stem(address: &str) -> &str {
    let stripped = strip_extension(address);
    stripped.rsplit('/').next().unwrap_or(stripped)
}

/// Split a `YYYY-MM-DD-` prefix off a post file stem
pub fn split_date_prefix(stem: &str) -> (Option<&str>, &str) {
    match DATE_PREFIX.captures(stem) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (caps.get(1).map(|m| m.as_str()), &stem[whole..])
        }
        None => (None, stem),
    }
}

/// True when any segment of the address is hidden or reserved (`_layouts`, `.git`)
pub fn is_reserved(address: &str) -> bool {
    address
        .split('/')
        .any(|segment| segment.starts_with('_') || segment.starts_with('.'))
}
