/// Checks the domain part: IDNA conversion + label checks + TLD shape.
/// Push des raisons invalidantes dans `reasons`.
///
/// Returns whether the domain passed and, when IDNA conversion succeeded,
/// the ASCII form used for the checks.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> (bool, Option<String>) {
    let before = reasons.len();

    let ascii = match idna::domain_to_ascii(domain) {
        Ok(a) => a,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return (false, None);
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return (false, None);
    }

    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    // au moins un point
    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    let labels: Vec<&str> = ascii.split('.').collect();
    for label in &labels {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{}' length {} > 63", label, label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{}' cannot start/end with '-'", label));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{}' has invalid chars", label));
        }
    }

    if let Some(tld) = labels.last() {
        if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
            reasons.push(format!("top-level label '{}' must be at least two letters", tld));
        }
    }

    (reasons.len() == before, Some(ascii))
}
