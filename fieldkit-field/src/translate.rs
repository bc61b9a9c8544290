//! Translation of user-facing messages.

/// User-facing message lookup.
///
/// Keys are the English source strings. `%s` placeholders are filled from
/// `args` in order.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// Returns the key itself with placeholders substituted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, key: &str, args: &[&str]) -> String {
        substitute(key, args)
    }
}

/// Replaces each `%s` in `template` with the next argument. Surplus
/// placeholders are left as-is.
#[must_use]
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
