/// Checks the local part: atext ASCII + '.' non initial/terminal, pas de "..".
/// Push des raisons invalidantes dans `reasons`.
pub(crate) fn check_local(local: &str, reasons: &mut Vec<String>) -> bool {
    let before = reasons.len();

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!("local part length {} invalid (1..=64)", local.len()));
    }
    if local.starts_with('.') || local.ends_with('.') {
        reasons.push("local part cannot start or end with '.'".to_string());
    }
    if local.contains("..") {
        reasons.push("local part cannot contain consecutive dots".to_string());
    }
    if !local.chars().all(is_atext_or_dot) {
        reasons.push("local part has characters outside the permitted set".to_string());
    }

    reasons.len() == before
}

fn is_atext_or_dot(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '.'
        )
}
