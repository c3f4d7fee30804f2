//! Follow-up subject prefixes.
//!
//! A follow-up is an article whose subject starts with a localised
//! reply prefix. `Re: ` and the German `Aw: ` are the only ones that
//! show up in practice.

const FOLLOW_UP_PREFIXES: &[&str] = &["re: ", "aw: "];

/// Strip any number of leading follow-up prefixes, case-insensitively.
///
/// # Examples
///
/// ```
/// use loread::subject::strip_prefixes;
///
/// assert_eq!(strip_prefixes("Re: Hello"), "Hello");
/// assert_eq!(strip_prefixes("Re: AW: re: Hello"), "Hello");
/// assert_eq!(strip_prefixes("Hello"), "Hello");
/// ```
pub fn strip_prefixes(subject: &str) -> &str {
    let mut rest = subject;
    loop {
        let mut stripped = false;
        for prefix in FOLLOW_UP_PREFIXES {
            if let Some(head) = rest.get(..prefix.len()) {
                if head.eq_ignore_ascii_case(prefix) {
                    rest = &rest[prefix.len()..];
                    stripped = true;
                }
            }
        }
        if !stripped {
            return rest;
        }
    }
}

/// Does the subject carry a follow-up prefix?
pub fn is_follow_up(subject: &str) -> bool {
    FOLLOW_UP_PREFIXES.iter().any(|prefix| {
        subject
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
