//! Path placeholder substitution

use chrono::Utc;

/// Well-known parameter names and the values substituted for them.
const KNOWN_PARAMS: &[(&str, &str)] = &[
    ("id", "1"),
    ("userId", "123"),
    ("petId", "456"),
    ("orderId", "789"),
    ("username", "testuser"),
    ("status", "available"),
    ("category", "dogs"),
    ("tag", "tag1"),
];

/// Value for a `{name}` placeholder.
///
/// Known names get fixed values; otherwise the name is matched
/// case-insensitively against `id`, `name` and `date`, in that order.
#[must_use]
pub fn placeholder_value(name: &str) -> String {
    if let Some((_, value)) = KNOWN_PARAMS.iter().find(|(known, _)| *known == name) {
        return (*value).to_string();
    }
    let lower = name.to_ascii_lowercase();
    if lower.contains("id") {
        "42".to_string()
    } else if lower.contains("name") {
        "test_name".to_string()
    } else if lower.contains("date") {
        Utc::now().format("%Y-%m-%d").to_string()
    } else {
        "test_value".to_string()
    }
}

/// Replace every `{name}` in `template`. Unbalanced braces are left as-is.
#[must_use]
pub fn substitute(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&placeholder_value(&rest[open + 1..close]));
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out
}
