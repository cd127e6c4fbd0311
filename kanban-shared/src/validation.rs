/// Input validation and sanitization
///
/// Every free-text value that reaches the database passes through this module.
/// Identifiers are checked for the canonical UUID shape before any query is
/// issued, and text fields are reduced to plain text so that stored titles,
/// descriptions and names never carry markup.
///
/// # Example
///
/// ```
/// use kanban_shared::validation::{sanitize_string, validate_required_string, validate_uuid};
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000"));
/// assert_eq!(sanitize_string("  <b>Ship</b> it  "), "Ship it");
/// assert!(validate_required_string("<script></script>", "Title").is_err());
/// ```

use chrono::NaiveDate;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html};
use std::collections::HashSet;
use std::sync::OnceLock;
use uuid::Uuid;

/// Message shown when an assignee name contains a disallowed character
pub const ASSIGNEE_NAME_MESSAGE: &str =
    "Assignee names can only contain letters, spaces, hyphens, and apostrophes";

/// Script-bearing and embedding elements; their content is dropped along
/// with the tag. Every other element keeps its text.
const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "template", "iframe", "noscript", "noembed", "noframes", "object",
    "embed", "svg", "math", "xmp", "plaintext",
];

/// Upper bound on re-parsing passes for input that decodes into new markup
const MAX_SANITIZE_PASSES: usize = 8;

/// Validation failures raised before any store access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Identifier is not a canonical UUID
    #[error("Invalid {entity} ID format")]
    InvalidId { entity: &'static str },

    /// Required field was missing or blank
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    /// Required field was non-blank but sanitized down to nothing
    #[error("{field} contains only invalid characters")]
    OnlyInvalidCharacters { field: &'static str },

    /// Field exceeds its length bound
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// An assignee name failed the character check
    #[error("Assignee names can only contain letters, spaces, hyphens, and apostrophes")]
    InvalidAssigneeName,

    /// Due date lies before today
    #[error("Due date cannot be in the past")]
    DueDateInPast,

    /// Same identifier listed twice in a reorder request
    #[error("Duplicate {entity} ID in reorder list: {id}")]
    DuplicateId { entity: &'static str, id: Uuid },
}

fn uuid_regex() -> &'static Regex {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .expect("Invalid UUID regex")
    })
}

fn tag_opener_regex() -> &'static Regex {
    static TAG_OPENER_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_OPENER_REGEX.get_or_init(|| Regex::new(r"<[A-Za-z/!?]").expect("Invalid tag regex"))
}

fn assignee_name_regex() -> &'static Regex {
    static ASSIGNEE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    ASSIGNEE_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[\p{L}\s'-]+$").expect("Invalid assignee name regex"))
}

/// Checks that `id` is a hyphenated UUID with version 1-5 and an RFC 4122 variant
///
/// Matching is case-insensitive. The empty string is rejected.
pub fn validate_uuid(id: &str) -> bool {
    uuid_regex().is_match(id)
}

/// Validates and parses an identifier for the given entity
///
/// # Errors
///
/// Returns `ValidationError::InvalidId` (e.g. "Invalid task ID format") if the
/// string is not a canonical UUID.
pub fn parse_id(id: &str, entity: &'static str) -> Result<Uuid, ValidationError> {
    if !validate_uuid(id) {
        return Err(ValidationError::InvalidId { entity });
    }

    Uuid::parse_str(id).map_err(|_| ValidationError::InvalidId { entity })
}

/// Parses a list of identifiers, rejecting malformed and repeated entries
pub fn parse_id_list(ids: &[String], entity: &'static str) -> Result<Vec<Uuid>, ValidationError> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut parsed = Vec::with_capacity(ids.len());

    for raw in ids {
        let id = parse_id(raw, entity)?;
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId { entity, id });
        }
        parsed.push(id);
    }

    Ok(parsed)
}

/// Strips all markup from `input`, keeping only its text content
///
/// The input is parsed as an HTML fragment. Text nodes are kept, tags,
/// attributes and comments are dropped, and the content of script-bearing or
/// embedded elements (`script`, `style`, `iframe`, `svg`, ...) is removed
/// entirely. Entity-encoded markup that decodes into new tags is parsed again,
/// so the result never contains a tag-opening sequence. Surrounding whitespace
/// is trimmed; empty input yields an empty string.
///
/// # Example
///
/// ```
/// use kanban_shared::validation::sanitize_string;
///
/// assert_eq!(sanitize_string("<p>Text with <strong>bold</strong> content</p>"), "Text with bold content");
/// assert_eq!(sanitize_string("<a href=\"javascript:alert(1)\">Click me</a>"), "Click me");
/// assert_eq!(sanitize_string("<img src=\"x\" onerror=\"alert(1)\">"), "");
/// assert_eq!(sanitize_string("Café & Résumé"), "Café & Résumé");
/// ```
pub fn sanitize_string(input: &str) -> String {
    let mut current = input.trim().to_string();

    for _ in 0..MAX_SANITIZE_PASSES {
        if current.is_empty() {
            return current;
        }

        let text = extract_text(&current).trim().to_string();
        if !tag_opener_regex().is_match(&text) {
            return text;
        }
        current = text;
    }

    current.replace('<', "").trim().to_string()
}

fn extract_text(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    collect_text(fragment.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if DROPPED_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Sanitizes a required field
///
/// # Errors
///
/// - `Required` if the raw input is empty or whitespace-only
/// - `OnlyInvalidCharacters` if sanitization removes everything (pure markup)
pub fn validate_required_string(input: &str, field: &'static str) -> Result<String, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }

    let sanitized = sanitize_string(input);
    if sanitized.is_empty() {
        return Err(ValidationError::OnlyInvalidCharacters { field });
    }

    Ok(sanitized)
}

/// Sanitizes an optional field, collapsing empty results to `None`
pub fn validate_optional_string(input: Option<&str>) -> Option<String> {
    let sanitized = sanitize_string(input?);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Enforces a maximum length counted in characters, not bytes
pub fn validate_max_length(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Splits a comma-separated assignee string into trimmed, non-empty names
///
/// ```
/// use kanban_shared::validation::parse_assignees;
///
/// assert_eq!(parse_assignees("  John Doe  ,  Jane Smith  "), vec!["John Doe", "Jane Smith"]);
/// assert!(parse_assignees(",,,").is_empty());
/// ```
pub fn parse_assignees(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins assignee names back into the comma-separated form
pub fn format_assignees(names: &[String]) -> String {
    names.join(", ")
}

/// Checks every name against the allowed character set
///
/// Letters (including accented and non-Latin letters), whitespace, hyphens and
/// apostrophes are allowed. An empty list is valid: the task is unassigned.
pub fn validate_assignee_names<S: AsRef<str>>(names: &[S]) -> Result<(), ValidationError> {
    if names
        .iter()
        .all(|name| assignee_name_regex().is_match(name.as_ref()))
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidAssigneeName)
    }
}

/// Rejects due dates earlier than `today`
pub fn validate_due_date(due: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if due < today {
        return Err(ValidationError::DueDateInPast);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid_accepts_canonical_forms() {
        let valid = [
            "123e4567-e89b-12d3-a456-426614174000",
            "550e8400-e29b-41d4-a716-446655440000",
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "6ba7b811-9dad-11d1-80b4-00c04fd430c8",
            "6BA7B812-9DAD-11D1-80B4-00C04FD430C8",
        ];

        for id in valid {
            assert!(validate_uuid(id), "{id} should be valid");
        }
        assert!(validate_uuid(&Uuid::new_v4().to_string()));
    }

    #[test]
    fn test_validate_uuid_rejects_malformed_input() {
        let invalid = [
            "not-a-uuid",
            "123e4567-e89b-12d3-a456-42661417400",
            "123e4567-e89b-12d3-a456-4266141740000",
            "123e4567-e89b-12d3-a456-42661417400g",
            "123e4567e89b12d3a456426614174000",
            "123e4567-e89b12d3-a456-426614174000-",
            "123e4567-e89b-62d3-a456-426614174000", // version 6
            "123e4567-e89b-02d3-a456-426614174000", // version 0
            "123e4567-e89b-12d3-c456-426614174000", // variant c
            "",
        ];

        for id in invalid {
            assert!(!validate_uuid(id), "{id:?} should be invalid");
        }
    }

    #[test]
    fn test_parse_id_error_message() {
        let err = parse_id("nope", "task").unwrap_err();
        assert_eq!(err.to_string(), "Invalid task ID format");

        let err = parse_id("", "column").unwrap_err();
        assert_eq!(err.to_string(), "Invalid column ID format");
    }

    #[test]
    fn test_parse_id_list_rejects_duplicates() {
        let id = Uuid::new_v4();
        let ids = vec![id.to_string(), Uuid::new_v4().to_string(), id.to_string()];

        let err = parse_id_list(&ids, "column").unwrap_err();
        assert_eq!(err, ValidationError::DuplicateId { entity: "column", id });
    }

    #[test]
    fn test_sanitize_string_empty_and_whitespace() {
        assert_eq!(sanitize_string(""), "");
        assert_eq!(sanitize_string("   "), "");
        assert_eq!(sanitize_string("  hello world  "), "hello world");
    }

    #[test]
    fn test_sanitize_string_removes_markup() {
        assert_eq!(sanitize_string("<script>alert('xss')</script>"), "");
        assert_eq!(sanitize_string("<div>Hello</div>"), "Hello");
        assert_eq!(
            sanitize_string("<p>Text with <strong>bold</strong> content</p>"),
            "Text with bold content"
        );
        assert_eq!(sanitize_string("<style>body { color: red }</style>Plain"), "Plain");
        assert_eq!(sanitize_string("<!-- hidden -->Visible"), "Visible");
    }

    #[test]
    fn test_sanitize_string_removes_dangerous_attributes() {
        assert_eq!(sanitize_string("<img src=\"x\" onerror=\"alert(1)\">"), "");
        assert_eq!(sanitize_string("<a href=\"javascript:alert(1)\">Click me</a>"), "Click me");
        assert_eq!(sanitize_string("<div onclick=\"steal()\">Safe text</div>"), "Safe text");
    }

    #[test]
    fn test_sanitize_string_preserves_plain_text() {
        assert_eq!(sanitize_string("Hello, World!"), "Hello, World!");
        assert_eq!(sanitize_string("123-456-7890"), "123-456-7890");
        assert_eq!(sanitize_string("user@example.com"), "user@example.com");
        assert_eq!(sanitize_string("Café & Résumé"), "Café & Résumé");
        assert_eq!(sanitize_string("测试文本"), "测试文本");
        assert_eq!(sanitize_string("a < b"), "a < b");
    }

    #[test]
    fn test_sanitize_string_keeps_text_of_harmless_elements() {
        assert_eq!(sanitize_string("<title>Quarterly plan</title>"), "Quarterly plan");
        assert_eq!(sanitize_string("<video src=\"x\">Fallback text</video>"), "Fallback text");
        assert_eq!(sanitize_string("<audio controls>Listen</audio>"), "Listen");
        assert_eq!(sanitize_string("<iframe>Framed</iframe>"), "");
    }

    #[test]
    fn test_sanitize_string_keeps_inner_spacing() {
        assert_eq!(
            sanitize_string("Hello <script>alert('xss')</script> World"),
            "Hello  World"
        );
    }

    #[test]
    fn test_sanitize_string_never_emits_tag_openers() {
        let inputs = [
            "&lt;script&gt;alert(1)&lt;/script&gt;",
            "&amp;lt;b&amp;gt;bold&amp;lt;/b&amp;gt;",
            "<scr<script>ipt>alert(1)</script>",
            "x<y",
            "<<b>b>",
            "&lt;!-- comment --&gt;",
        ];

        for input in inputs {
            let output = sanitize_string(input);
            assert!(
                !tag_opener_regex().is_match(&output),
                "{input:?} sanitized to {output:?}"
            );
        }
    }

    #[test]
    fn test_sanitize_string_markup_only_is_empty() {
        let inputs = [
            "<div></div>",
            "<script></script>",
            "<iframe src=\"https://evil.example\"></iframe>",
            "<svg><script>alert(1)</script></svg>",
            "<br><hr>",
        ];

        for input in inputs {
            assert_eq!(sanitize_string(input), "", "{input:?}");
        }
    }

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("hello", "test").unwrap(), "hello");
        assert_eq!(
            validate_required_string("  hello world  ", "test").unwrap(),
            "hello world"
        );
        assert_eq!(validate_required_string("<div>Hello</div>", "field").unwrap(), "Hello");
    }

    #[test]
    fn test_validate_required_string_errors() {
        let err = validate_required_string("", "field").unwrap_err();
        assert_eq!(err.to_string(), "field is required and cannot be empty");

        let err = validate_required_string("   ", "field").unwrap_err();
        assert_eq!(err.to_string(), "field is required and cannot be empty");

        let err = validate_required_string("<script></script>", "field").unwrap_err();
        assert_eq!(err.to_string(), "field contains only invalid characters");

        let err = validate_required_string("<script>alert('xss')</script>", "field").unwrap_err();
        assert_eq!(err.to_string(), "field contains only invalid characters");
    }

    #[test]
    fn test_validate_optional_string() {
        assert_eq!(validate_optional_string(None), None);
        assert_eq!(validate_optional_string(Some("")), None);
        assert_eq!(validate_optional_string(Some("   ")), None);
        assert_eq!(validate_optional_string(Some("<div></div>")), None);
        assert_eq!(validate_optional_string(Some("  hello  ")), Some("hello".to_string()));
        assert_eq!(
            validate_optional_string(Some("<div>Hello</div>")),
            Some("Hello".to_string())
        );
    }

    #[test]
    fn test_validate_max_length_counts_characters() {
        assert!(validate_max_length("ééé", "Title", 3).is_ok());
        assert_eq!(
            validate_max_length("éééé", "Title", 3).unwrap_err(),
            ValidationError::TooLong { field: "Title", max: 3 }
        );
    }

    #[test]
    fn test_parse_assignees() {
        assert_eq!(
            parse_assignees("  John Doe  ,  Jane Smith  "),
            vec!["John Doe".to_string(), "Jane Smith".to_string()]
        );
        assert_eq!(parse_assignees("Alice,,Bob, "), vec!["Alice", "Bob"]);
        assert!(parse_assignees(",,,").is_empty());
        assert!(parse_assignees("").is_empty());
    }

    #[test]
    fn test_format_assignees() {
        let names = vec!["John Doe".to_string(), "Jane Smith".to_string()];
        assert_eq!(format_assignees(&names), "John Doe, Jane Smith");
        assert_eq!(format_assignees(&[]), "");
    }

    #[test]
    fn test_validate_assignee_names() {
        assert!(validate_assignee_names(&["O'Connor", "Jean-Pierre", "José García"]).is_ok());
        assert!(validate_assignee_names::<&str>(&[]).is_ok());

        for bad in [["John123"], ["John@Doe"]] {
            let err = validate_assignee_names(&bad).unwrap_err();
            assert_eq!(err.to_string(), ASSIGNEE_NAME_MESSAGE);
        }
    }

    #[test]
    fn test_validate_due_date() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert!(validate_due_date(today, today).is_ok());
        assert!(validate_due_date(today.succ_opt().unwrap(), today).is_ok());
        assert_eq!(
            validate_due_date(today.pred_opt().unwrap(), today).unwrap_err(),
            ValidationError::DueDateInPast
        );
    }
}
