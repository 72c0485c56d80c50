//! Credential injection engine.
//!
//! Rewrites raw template source text to embed a new credential set. This
//! is a best-effort, pattern-matching rewrite: it operates purely on text,
//! never parses the template, and never fails. If a template declares its
//! credentials in an unanticipated style, the worst case is that the
//! canonical declarations are prepended and the rest of the text is left
//! untouched.
//!
//! Compatibility note: the canonical `TOKEN = "…"` declaration is always
//! prepended at the very top, even when an existing declaration was
//! already rewritten in place. A template that declared `TOKEN` therefore
//! ends up with two assignments of the same spelling. Downstream tooling
//! relies on the canonical declaration appearing first, so the duplication
//! is preserved deliberately.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// The spelling used for inserted primary-secret declarations.
pub const CANONICAL_SECRET_NAME: &str = "TOKEN";

/// The spelling used for inserted operator-identity declarations.
pub const CANONICAL_OPERATOR_NAME: &str = "ADMIN_ID";

/// Known primary-secret declaration spellings, in application order.
///
/// The `bool` is whether the spelling is matched case-insensitively.
/// `token` is matched case-sensitively: the case-insensitive `TOKEN`
/// rule ahead of it already covers (and canonicalizes) lowercase
/// declarations.
const SECRET_SPELLINGS: [(&str, bool); 5] = [
    ("TOKEN", true),
    ("BOT_TOKEN", true),
    ("API_TOKEN", true),
    ("token", false),
    ("BOT_API_TOKEN", true),
];

/// One compiled assignment matcher per secret spelling.
static SECRET_ASSIGN_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SECRET_SPELLINGS
        .iter()
        .map(|&(name, case_insensitive)| {
            let flag = if case_insensitive { "(?i)" } else { "" };
            let pattern = format!(r#"{flag}\b{name}\s*=\s*["'][^"'\n]*["']"#);
            (name, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

/// Detects any secret assignment, in any supported spelling.
static ANY_SECRET_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(TOKEN|BOT_TOKEN|API_TOKEN|BOT_API_TOKEN)\s*=").expect("valid regex")
});

/// Quoted operator-identity assignment, either case.
static OPERATOR_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bADMIN_ID\s*=\s*['"][^'"\n]*['"]"#).expect("valid regex")
});

/// Bare numeric operator-identity assignment (`ADMIN_ID = 12345`).
static OPERATOR_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bADMIN_ID\s*=\s*\d+").expect("valid regex"));

/// Lowercase quoted operator-identity assignment, matched case-sensitively.
static OPERATOR_LOWER_QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\badmin_id\s*=\s*['"][^'"\n]*['"]"#).expect("valid regex")
});

/// Any full line declaring an operator identity, either spelling.
static OPERATOR_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^.*\bADMIN_ID\s*=.*$").expect("valid regex"));

/// Detects any operator-identity assignment, either spelling.
static ANY_OPERATOR_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bADMIN_ID\s*=").expect("valid regex"));

/// First import-like line of the template, used as the insertion anchor
/// for declarations the template did not already carry.
static IMPORT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.*import.*$").expect("valid regex"));

/// Rewrite `template_text` to embed `secret` (and `operator_identity`,
/// when supplied). Always returns a string; never fails.
///
/// See the module docs for the duplication quirk on the canonical
/// `TOKEN` declaration.
pub fn inject(template_text: &str, secret: &str, operator_identity: Option<&str>) -> String {
    let mut text = template_text.to_string();

    // Value-replace the first assignment of each known secret spelling.
    for (name, re) in SECRET_ASSIGN_RES.iter() {
        let replacement = format!("{name} = \"{secret}\"");
        text = re.replace(&text, NoExpand(&replacement)).into_owned();
    }

    // Operator identity: rewrite in place when supplied, otherwise strip
    // every declaring line so no stale identity survives.
    match operator_identity {
        Some(id) => {
            let quoted = format!("{CANONICAL_OPERATOR_NAME} = '{id}'");
            text = OPERATOR_QUOTED_RE
                .replace(&text, NoExpand(&quoted))
                .into_owned();
            let bare = format!("{CANONICAL_OPERATOR_NAME} = {id}");
            text = OPERATOR_NUMERIC_RE
                .replace(&text, NoExpand(&bare))
                .into_owned();
            let lower = format!("admin_id = '{id}'");
            text = OPERATOR_LOWER_QUOTED_RE
                .replace(&text, NoExpand(&lower))
                .into_owned();
        }
        None => {
            text = OPERATOR_LINE_RE.replace_all(&text, NoExpand("")).into_owned();
        }
    }

    // No recognized secret declaration anywhere: insert the canonical one
    // after the first import-like line (or at the top).
    if !ANY_SECRET_ASSIGN_RE.is_match(&text) {
        let decl = format!("{CANONICAL_SECRET_NAME} = \"{secret}\"");
        text = insert_declaration(&text, &decl);
    }

    // The canonical declaration always appears first, regardless of what
    // the steps above did.
    text = format!("{CANONICAL_SECRET_NAME} = \"{secret}\"\n{text}");

    // An operator identity was supplied but no declaration survived:
    // insert one.
    if let Some(id) = operator_identity {
        if !ANY_OPERATOR_ASSIGN_RE.is_match(&text) {
            let decl = format!("{CANONICAL_OPERATOR_NAME} = '{id}'");
            text = insert_declaration(&text, &decl);
        }
    }

    text
}

/// Insert `decl` on its own line immediately after the first import-like
/// line, or prepend it if the template has none.
fn insert_declaration(text: &str, decl: &str) -> String {
    match IMPORT_LINE_RE.find(text) {
        Some(m) => {
            // Past the import line's trailing newline, clamped for
            // templates ending exactly at the import.
            let insert_pos = (m.end() + 1).min(text.len());
            format!(
                "{}\n{decl}\n{}",
                &text[..insert_pos],
                &text[insert_pos..]
            )
        }
        None => format!("{decl}\n{text}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Count non-overlapping occurrences of `needle` in `haystack`.
    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn canonical_declaration_always_embedded() {
        for template in ["", "print('hello')\n", "x = 1\ny = 2\n"] {
            let out = inject(template, "secret123", None);
            assert!(
                out.starts_with("TOKEN = \"secret123\"\n"),
                "canonical declaration must lead the output, got: {out:?}"
            );
        }
    }

    #[test]
    fn replaces_each_spelling_in_place() {
        let cases = [
            ("BOT_TOKEN = \"old\"\n", "BOT_TOKEN = \"new\""),
            ("API_TOKEN = 'old'\n", "API_TOKEN = \"new\""),
            ("BOT_API_TOKEN = 'old'\n", "BOT_API_TOKEN = \"new\""),
        ];
        for (template, expected) in cases {
            let out = inject(template, "new", None);
            assert!(out.contains(expected), "expected {expected:?} in {out:?}");
            assert!(!out.contains("old"), "stale value left in {out:?}");
        }
    }

    #[test]
    fn spelling_is_not_duplicated_by_rewrite() {
        let out = inject("BOT_TOKEN = 'x'\nrun()\n", "abc", None);
        assert_eq!(count(&out, "BOT_TOKEN"), 1);
        // The canonical prepend is the only extra assignment.
        assert!(out.starts_with("TOKEN = \"abc\"\n"));
    }

    #[test]
    fn longer_spellings_do_not_trip_shorter_rules() {
        // `\bTOKEN` must not match inside `BOT_API_TOKEN`.
        let out = inject("BOT_API_TOKEN = 'x'\n", "abc", None);
        assert_eq!(count(&out, "BOT_API_TOKEN = \"abc\""), 1);
    }

    #[test]
    fn lowercase_token_is_canonicalized() {
        // The case-insensitive TOKEN rule runs first and uppercases the
        // declaration, matching the reference behavior.
        let out = inject("token = 'x'\n", "abc", None);
        assert!(out.contains("TOKEN = \"abc\""));
        assert!(!out.contains("token = "));
    }

    #[test]
    fn duplication_quirk_preserved() {
        let out = inject("TOKEN = 'x'\n", "abc", None);
        assert_eq!(
            count(&out, "TOKEN = \"abc\""),
            2,
            "expected the prepended and the rewritten declaration: {out:?}"
        );
        assert!(out.starts_with("TOKEN = \"abc\"\n"));
        assert!(!out.contains('x'));
    }

    #[test]
    fn missing_secret_inserted_after_import() {
        let out = inject("import os\nprint('hi')\n", "abc", None);
        // Canonical prepend plus the insert-after-import declaration.
        assert_eq!(count(&out, "TOKEN = \"abc\""), 2);
        let import_pos = out.find("import os").unwrap();
        let inserted_pos = out.rfind("TOKEN = \"abc\"").unwrap();
        assert!(
            inserted_pos > import_pos,
            "inserted declaration must follow the import line: {out:?}"
        );
    }

    #[test]
    fn operator_absent_strips_every_declaration_line() {
        let template = "import os\nADMIN_ID = '1'\nadmin_id = '2'\nAdmin_Id = 3\nrun()\n";
        let out = inject(template, "abc", None);
        assert!(!out.to_lowercase().contains("admin_id"), "got: {out:?}");
        assert!(out.contains("run()"));
    }

    #[test]
    fn operator_replaces_quoted_and_numeric_forms() {
        let out = inject("ADMIN_ID = \"old\"\n", "abc", Some("777"));
        assert!(out.contains("ADMIN_ID = '777'"), "got: {out:?}");

        let out = inject("ADMIN_ID = 123456\n", "abc", Some("777"));
        assert!(out.contains("ADMIN_ID = 777"), "got: {out:?}");
    }

    #[test]
    fn operator_inserted_when_missing() {
        let out = inject("import os\nrun()\n", "abc", Some("777"));
        assert!(out.contains("ADMIN_ID = '777'"), "got: {out:?}");
        // Still exactly one operator declaration.
        assert_eq!(count(&out, "ADMIN_ID"), 1);
    }

    #[test]
    fn operator_inserted_at_top_without_imports() {
        let out = inject("run()\n", "abc", Some("9"));
        assert!(out.contains("ADMIN_ID = '9'"), "got: {out:?}");
    }

    #[test]
    fn never_fails_on_arbitrary_text() {
        let out = inject("}{ not source at all \u{1F916} ====", "s", Some("op"));
        assert!(out.starts_with("TOKEN = \"s\"\n"));
        assert!(out.contains("not source at all"));
    }

    #[test]
    fn template_ending_at_import_line() {
        // No trailing newline after the only import: the insertion anchor
        // is clamped to the end of the text.
        let out = inject("import os", "abc", None);
        assert!(out.contains("TOKEN = \"abc\""));
        assert!(out.contains("import os"));
    }
}
