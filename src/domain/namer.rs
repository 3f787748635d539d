use super::{ranked_by_frequency, with_management_suffix, BusinessContext};

/// Name given to a cluster with no contexts
pub const GENERAL_DOMAIN: &str = "General Domain";

/// Words that are too generic to name a domain on their own
const GENERIC_TERMS: &[&str] = &["management", "system", "process", "data"];

/// Derive a domain name from the contexts of one cluster.
///
/// The most frequent main object wins (ties go to the first one seen). If
/// every word of it is generic and a runner-up exists, the runner-up is used
/// instead. The name is title-cased and suffixed with " Management".
pub fn name_domain(contexts: &[&BusinessContext]) -> String {
    let ranked = ranked_by_frequency(contexts.iter().map(|ctx| ctx.main_object.as_str()));
    let Some(&(primary, _)) = ranked.first() else {
        return GENERAL_DOMAIN.to_string();
    };

    let mut chosen = primary.trim();
    let all_generic = chosen
        .split_whitespace()
        .all(|word| GENERIC_TERMS.contains(&word));
    if all_generic {
        if let Some(&(runner_up, _)) = ranked.get(1) {
            chosen = runner_up;
        }
    }

    let words: Vec<String> = chosen.split_whitespace().map(title_case).collect();
    if words.is_empty() {
        return GENERAL_DOMAIN.to_string();
    }
    with_management_suffix(&words.join(" "))
}

/// Uppercase the first letter of every run of letters and lowercase the
/// rest, so "e-mail" becomes "E-Mail" and "o'neil" becomes "O'Neil".
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_is_letter = false;
    for c in word.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}
