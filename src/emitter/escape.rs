//! TypeScript string/identifier escaping; escaping rules are
//! mode-specific (plain double-quoted string vs. template literal) and
//! live in one place rather than scattered across the emitters that
//! need them.

/// Escapes `s` for a plain double-quoted TS string literal.
pub fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Escapes `s` for the literal portions of a template-string
/// (backtick-delimited) literal, where `${` and `` ` `` must be escaped
/// but `"`/`'` need not be.
pub fn template_literal(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out
}

/// True when `name` is a valid TS/JS identifier, safe to use as a bare
/// variable name without further mangling.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Converts an arbitrary Bash identifier into a safe TS identifier,
/// replacing any disallowed character with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    if is_valid_identifier(name) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let ok = if i == 0 { c.is_alphabetic() || c == '_' || c == '$' } else { c.is_alphanumeric() || c == '_' || c == '$' };
        out.push(if ok { c } else { '_' });
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quote_escapes_special_chars() {
        assert_eq!(double_quote("hello"), "\"hello\"");
        assert_eq!(double_quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(double_quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn template_literal_escapes_backtick_and_interpolation() {
        assert_eq!(template_literal("`cmd`"), "\\`cmd\\`");
        assert_eq!(template_literal("${x}"), "\\${x}");
        assert_eq!(template_literal("plain"), "plain");
    }

    #[test]
    fn identifier_sanitization() {
        assert!(is_valid_identifier("valid_name"));
        assert!(!is_valid_identifier("123bad"));
        assert_eq!(sanitize_identifier("my-var"), "my_var");
        assert_eq!(sanitize_identifier("123bad"), "_123bad");
    }
}
