//! Field validation rules for the lead capture form.
//!
//! Validation is pure: the same `(field, value)` pair always yields the same
//! result. Length limits are checked before format so an over-long value is
//! always reported as too long.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::field::{Field, LeadRecord};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static WEBSITE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$")
        .expect("valid website regex")
});

static SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("valid scheme regex"));

const INSTAGRAM_HOSTS: &[&str] = &["instagram.com", "www.instagram.com"];

/// How the optional Instagram field is checked when non-empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstagramRule {
    /// Only the length limit applies
    #[default]
    Lenient,
    /// The URL must also point at instagram.com
    Strict,
}

/// Validates individual form fields
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    instagram_rule: InstagramRule,
}

impl Validator {
    pub fn new(instagram_rule: InstagramRule) -> Self {
        Self { instagram_rule }
    }

    /// Validator with the strict Instagram host check enabled
    pub fn strict() -> Self {
        Self::new(InstagramRule::Strict)
    }

    pub fn instagram_rule(&self) -> InstagramRule {
        self.instagram_rule
    }

    /// Validate one field value, returning an error message when it fails
    pub fn validate(&self, field: Field, raw: &str) -> Option<String> {
        let value = raw.trim();
        let len = value.chars().count();

        let message = match field {
            Field::FirstName | Field::LastName => name_error(field, len),
            Field::Email => {
                if value.is_empty() {
                    Some("Email address is required")
                } else if len > field.max_length() {
                    Some("Email address is too long")
                } else if !EMAIL_PATTERN.is_match(value) {
                    Some("Please enter a valid email address")
                } else {
                    None
                }
            }
            Field::Website => {
                if value.is_empty() {
                    Some("Website URL is required")
                } else if len > field.max_length() {
                    Some("Website URL is too long")
                } else if !WEBSITE_PATTERN.is_match(value) {
                    Some("Please enter a valid website URL")
                } else {
                    None
                }
            }
            // Empty is a valid terminal state for the optional field
            Field::Instagram => {
                if value.is_empty() {
                    None
                } else if len > field.max_length() {
                    Some("Instagram URL is too long")
                } else if self.instagram_rule == InstagramRule::Strict
                    && !is_instagram_url(value)
                {
                    Some("Please enter a valid Instagram URL")
                } else {
                    None
                }
            }
        };

        message.map(str::to_string)
    }

    /// Validate by wire name; unknown names never produce an error
    pub fn validate_named(&self, name: &str, raw: &str) -> Option<String> {
        let field = name.parse::<Field>().ok()?;
        self.validate(field, raw)
    }

    /// Validate every field of a record
    pub fn validate_record(&self, record: &LeadRecord) -> BTreeMap<Field, String> {
        Field::all()
            .iter()
            .filter_map(|field| {
                self.validate(*field, record.get(*field))
                    .map(|msg| (*field, msg))
            })
            .collect()
    }
}

fn name_error(field: Field, len: usize) -> Option<&'static str> {
    let (required, short, long) = match field {
        Field::FirstName => (
            "First name is required",
            "First name must be at least 2 characters",
            "First name must be less than 50 characters",
        ),
        _ => (
            "Last name is required",
            "Last name must be at least 2 characters",
            "Last name must be less than 50 characters",
        ),
    };

    if len == 0 {
        Some(required)
    } else if len > field.max_length() {
        Some(long)
    } else if len < 2 {
        Some(short)
    } else {
        None
    }
}

fn is_instagram_url(value: &str) -> bool {
    Url::parse(&normalize_url(value))
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .is_some_and(|host| INSTAGRAM_HOSTS.contains(&host.as_str()))
}

/// Trim and strip angle brackets from user input
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

/// Prefix `https://` when the value has no http(s) scheme
pub fn normalize_url(url: &str) -> String {
    let clean = url.trim();
    if clean.is_empty() || SCHEME_PATTERN.is_match(clean) {
        clean.to_string()
    } else {
        format!("https://{clean}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::default()
    }

    #[test]
    fn test_required_fields_reject_empty() {
        let v = validator();
        assert_eq!(
            v.validate(Field::FirstName, ""),
            Some("First name is required".to_string())
        );
        assert_eq!(
            v.validate(Field::LastName, "   "),
            Some("Last name is required".to_string())
        );
        assert_eq!(
            v.validate(Field::Email, ""),
            Some("Email address is required".to_string())
        );
        assert_eq!(
            v.validate(Field::Website, ""),
            Some("Website URL is required".to_string())
        );
    }

    #[test]
    fn test_instagram_empty_is_valid_in_both_modes() {
        assert_eq!(validator().validate(Field::Instagram, ""), None);
        assert_eq!(Validator::strict().validate(Field::Instagram, "  "), None);
    }

    #[test]
    fn test_name_length_bounds() {
        let v = validator();
        assert_eq!(
            v.validate(Field::FirstName, "J"),
            Some("First name must be at least 2 characters".to_string())
        );
        assert_eq!(v.validate(Field::FirstName, " Jo "), None);
        assert_eq!(v.validate(Field::LastName, &"x".repeat(50)), None);
        assert_eq!(
            v.validate(Field::LastName, &"x".repeat(51)),
            Some("Last name must be less than 50 characters".to_string())
        );
    }

    #[test]
    fn test_over_length_reports_too_long_even_when_well_formed() {
        let v = validator();
        let long_email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            v.validate(Field::Email, &long_email),
            Some("Email address is too long".to_string())
        );

        let long_site = format!("https://example.com/{}", "p".repeat(250));
        assert_eq!(
            v.validate(Field::Website, &long_site),
            Some("Website URL is too long".to_string())
        );

        let long_ig = format!("https://instagram.com/{}", "u".repeat(250));
        assert_eq!(
            v.validate(Field::Instagram, &long_ig),
            Some("Instagram URL is too long".to_string())
        );
        assert_eq!(
            Validator::strict().validate(Field::Instagram, &long_ig),
            Some("Instagram URL is too long".to_string())
        );
    }

    #[test]
    fn test_email_format() {
        let v = validator();
        assert_eq!(v.validate(Field::Email, "jo@x.com"), None);
        assert_eq!(
            v.validate(Field::Email, "jo@x"),
            Some("Please enter a valid email address".to_string())
        );
        assert_eq!(
            v.validate(Field::Email, "jo x@x.com"),
            Some("Please enter a valid email address".to_string())
        );
    }

    #[test]
    fn test_website_format() {
        let v = validator();
        assert_eq!(v.validate(Field::Website, "https://x.com"), None);
        assert_eq!(v.validate(Field::Website, "x.com"), None);
        assert_eq!(v.validate(Field::Website, "http://shop.example.co.uk/about"), None);
        assert_eq!(
            v.validate(Field::Website, "not a url"),
            Some("Please enter a valid website URL".to_string())
        );
        assert_eq!(
            v.validate(Field::Website, "ftp://x.com"),
            Some("Please enter a valid website URL".to_string())
        );
    }

    #[test]
    fn test_strict_instagram_checks_host() {
        let strict = Validator::strict();
        assert_eq!(strict.validate(Field::Instagram, "instagram.com/mira"), None);
        assert_eq!(
            strict.validate(Field::Instagram, "https://www.instagram.com/mira"),
            None
        );
        assert_eq!(
            strict.validate(Field::Instagram, "https://facebook.com/mira"),
            Some("Please enter a valid Instagram URL".to_string())
        );
        // Lenient mode accepts anything within the length limit
        assert_eq!(
            validator().validate(Field::Instagram, "https://facebook.com/mira"),
            None
        );
    }

    #[test]
    fn test_validate_named_ignores_unknown_fields() {
        let v = validator();
        assert_eq!(v.validate_named("phone", ""), None);
        assert_eq!(
            v.validate_named("email", ""),
            Some("Email address is required".to_string())
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let v = validator();
        for field in Field::all() {
            for value in ["", "a", "jo@x.com", "https://x.com", "  Jo  "] {
                assert_eq!(v.validate(*field, value), v.validate(*field, value));
            }
        }
    }

    #[test]
    fn test_validate_record_collects_all_errors() {
        let record = LeadRecord {
            first_name: "Jo".to_string(),
            last_name: String::new(),
            email: "bad".to_string(),
            website: "https://x.com".to_string(),
            instagram: String::new(),
        };
        let errors = validator().validate_record(&record);
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec![Field::LastName, Field::Email]
        );
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>Jo</b> "), "bJo/b");
        assert_eq!(sanitize_input("plain"), "plain");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url(" x.com "), "https://x.com");
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
        assert_eq!(normalize_url("https://x.com/a"), "https://x.com/a");
    }
}
