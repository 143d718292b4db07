// File: rusty-forms-orchestrator/src/rules.rs
// Purpose: Declarative validation rules usable as a field's validate capability

use crate::error::{FormError, Result};
use crate::lifecycle::{Validator, Verdict};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Common free email providers rejected by `no_public_domains`
pub static PUBLIC_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "mail.com",
    "protonmail.com",
    "zoho.com",
    "yandex.com",
];

/// Validation rules for a single field
///
/// Rules run in declaration order and the first failure decides the
/// verdict. An empty value passes unless `required` is set.
///
/// ```toml
/// rules = { required = true, email = true, no_public_domains = true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    pub required: bool,

    // Email
    pub email: bool,
    pub no_public_domains: bool,
    pub blocked_domains: Option<Vec<String>>,

    /// "basic", "medium" or "strong"
    pub password: Option<String>,

    // String length (in characters)
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,

    // String matching
    pub contains: Option<String>,
    pub not_contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,

    // Equality
    pub equals: Option<String>,
    pub not_equals: Option<String>,

    pub url: bool,

    /// Regular expression the whole value must match
    pub pattern: Option<String>,

    /// Replaces the built-in failure message
    pub message: Option<String>,
}

impl FieldRules {
    /// Compile the rules into a validator
    ///
    /// Fails with [`FormError::Config`] on an unknown password tier or an
    /// invalid pattern.
    pub fn into_validator(self) -> Result<RuleValidator> {
        if let Some(ref tier) = self.password {
            if !matches!(tier.as_str(), "basic" | "medium" | "strong") {
                return Err(FormError::Config(format!(
                    "Unknown password strength tier: {}",
                    tier
                )));
            }
        }

        let pattern = match self.pattern {
            Some(ref p) => {
                // Anchor so the whole value has to match
                let anchored = format!("^(?:{})$", p);
                Some(Regex::new(&anchored).map_err(|e| {
                    FormError::Config(format!("Invalid pattern '{}': {}", p, e))
                })?)
            }
            None => None,
        };

        Ok(RuleValidator {
            rules: self,
            pattern,
        })
    }

    /// Check a value, returning the failure message if any
    fn check(&self, value: &str, pattern: Option<&Regex>) -> std::result::Result<(), String> {
        if value.trim().is_empty() {
            return if self.required {
                Err(self.message_or("This field is required"))
            } else {
                Ok(())
            };
        }

        if self.email && !is_valid_email(value) {
            return Err(self.message_or("Invalid email address"));
        }

        if self.no_public_domains && is_public_domain(value) {
            return Err(self.message_or("Public email domains not allowed"));
        }

        if let Some(ref blocked) = self.blocked_domains {
            let domain = extract_domain(value).to_lowercase();
            if blocked.iter().any(|d| d.to_lowercase() == domain) {
                return Err(self.message_or("Email domain is blocked"));
            }
        }

        if let Some(ref tier) = self.password {
            check_password(value, tier).map_err(|msg| self.message_or(&msg))?;
        }

        let length = value.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return Err(self.message_or(&format!("Must be at least {} characters", min)));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(self.message_or(&format!("Must be at most {} characters", max)));
            }
        }

        if let Some(ref needle) = self.contains {
            if !value.contains(needle.as_str()) {
                return Err(self.message_or(&format!("Must contain '{}'", needle)));
            }
        }
        if let Some(ref needle) = self.not_contains {
            if value.contains(needle.as_str()) {
                return Err(self.message_or(&format!("Must not contain '{}'", needle)));
            }
        }
        if let Some(ref prefix) = self.starts_with {
            if !value.starts_with(prefix.as_str()) {
                return Err(self.message_or(&format!("Must start with '{}'", prefix)));
            }
        }
        if let Some(ref suffix) = self.ends_with {
            if !value.ends_with(suffix.as_str()) {
                return Err(self.message_or(&format!("Must end with '{}'", suffix)));
            }
        }

        if let Some(ref expected) = self.equals {
            if value != expected {
                return Err(self.message_or(&format!("Must equal '{}'", expected)));
            }
        }
        if let Some(ref forbidden) = self.not_equals {
            if value == forbidden {
                return Err(self.message_or(&format!("Must not equal '{}'", forbidden)));
            }
        }

        if self.url && !is_valid_url(value) {
            return Err(self.message_or("Invalid URL"));
        }

        if let Some(re) = pattern {
            if !re.is_match(value) {
                return Err(self.message_or("Invalid format"));
            }
        }

        Ok(())
    }

    fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Compiled [`FieldRules`]
#[derive(Debug, Clone)]
pub struct RuleValidator {
    rules: FieldRules,
    pattern: Option<Regex>,
}

impl RuleValidator {
    /// Run the rules without going through the async trait
    pub fn check(&self, value: &str) -> Verdict {
        match self.rules.check(value, self.pattern.as_ref()) {
            Ok(()) => Verdict::valid(""),
            Err(message) => Verdict::invalid(message),
        }
    }
}

#[async_trait]
impl Validator for RuleValidator {
    async fn validate(&self, value: &str) -> anyhow::Result<Verdict> {
        Ok(self.check(value))
    }
}

/// Basic structural email check
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.len() > 255 {
        return false;
    }

    if domain.contains('@') || !domain.contains('.') || domain.contains("..") {
        return false;
    }

    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
        return false;
    }

    local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'))
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-'))
}

pub fn is_public_domain(email: &str) -> bool {
    let domain = extract_domain(email).to_lowercase();
    PUBLIC_DOMAINS.iter().any(|&d| d == domain)
}

/// http(s) URL with a dotted host
pub fn is_valid_url(url: &str) -> bool {
    let rest = match url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    host.contains('.') && !host.starts_with('.') && !host.ends_with('.') && !host.contains(' ')
}

/// Password strength tiers
///
/// - `basic`: 6+ characters
/// - `medium`: 8+ characters with uppercase, lowercase and digit
/// - `strong`: medium plus a special character
pub fn check_password(value: &str, tier: &str) -> std::result::Result<(), String> {
    let has_upper = value.chars().any(|c| c.is_uppercase());
    let has_lower = value.chars().any(|c| c.is_lowercase());
    let has_digit = value.chars().any(|c| c.is_numeric());
    let has_special = value
        .chars()
        .any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?/~`".contains(c));
    let length = value.chars().count();

    match tier {
        "basic" if length < 6 => Err("Password must be at least 6 characters".to_string()),
        "basic" => Ok(()),
        "medium" | "strong" if length < 8 => {
            Err("Password must be at least 8 characters".to_string())
        }
        "medium" if !(has_upper && has_lower && has_digit) => {
            Err("Password must contain uppercase, lowercase, and digit".to_string())
        }
        "medium" => Ok(()),
        "strong" if !(has_upper && has_lower && has_digit && has_special) => Err(
            "Password must contain uppercase, lowercase, digit, and special character".to_string(),
        ),
        "strong" => Ok(()),
        _ => Err("Invalid password strength tier".to_string()),
    }
}

fn extract_domain(email: &str) -> &str {
    email.split('@').nth(1).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(rules: FieldRules) -> RuleValidator {
        rules.into_validator().unwrap()
    }

    #[test]
    fn test_required() {
        let v = rules(FieldRules {
            required: true,
            ..Default::default()
        });

        assert_eq!(v.check("   "), Verdict::invalid("This field is required"));
        assert!(v.check("x").valid);
    }

    #[test]
    fn test_empty_optional_value_passes() {
        let v = rules(FieldRules {
            email: true,
            min_length: Some(5),
            ..Default::default()
        });

        assert!(v.check("").valid);
    }

    #[test]
    fn test_email_rules() {
        let v = rules(FieldRules {
            email: true,
            no_public_domains: true,
            blocked_domains: Some(vec!["competitor.com".to_string()]),
            ..Default::default()
        });

        assert!(v.check("user@company.com").valid);
        assert_eq!(v.check("not-an-email"), Verdict::invalid("Invalid email address"));
        assert_eq!(
            v.check("user@GMAIL.com"),
            Verdict::invalid("Public email domains not allowed")
        );
        assert_eq!(
            v.check("user@competitor.com"),
            Verdict::invalid("Email domain is blocked")
        );
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.b.com"));
        assert!(!is_valid_email("a@b..com"));
    }

    #[test]
    fn test_password_tiers() {
        assert!(check_password("abc123", "basic").is_ok());
        assert!(check_password("abc12", "basic").is_err());
        assert!(check_password("Abcd1234", "medium").is_ok());
        assert!(check_password("abcd1234", "medium").is_err());
        assert!(check_password("Abcd123!", "strong").is_ok());
        assert!(check_password("Abcd1234", "strong").is_err());
    }

    #[test]
    fn test_unknown_password_tier_is_config_error() {
        let err = FieldRules {
            password: Some("extreme".to_string()),
            ..Default::default()
        }
        .into_validator()
        .unwrap_err();

        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_length_counts_characters() {
        let v = rules(FieldRules {
            min_length: Some(2),
            max_length: Some(3),
            ..Default::default()
        });

        assert!(v.check("été").valid);
        assert_eq!(v.check("é"), Verdict::invalid("Must be at least 2 characters"));
        assert_eq!(v.check("été!"), Verdict::invalid("Must be at most 3 characters"));
    }

    #[test]
    fn test_matching_and_equality() {
        let v = rules(FieldRules {
            starts_with: Some("SKU-".to_string()),
            not_contains: Some(" ".to_string()),
            not_equals: Some("SKU-0".to_string()),
            ..Default::default()
        });

        assert!(v.check("SKU-42").valid);
        assert_eq!(v.check("42"), Verdict::invalid("Must start with 'SKU-'"));
        assert_eq!(v.check("SKU- 4"), Verdict::invalid("Must not contain ' '"));
        assert_eq!(v.check("SKU-0"), Verdict::invalid("Must not equal 'SKU-0'"));
    }

    #[test]
    fn test_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com:8080/path?q=1"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://localhost"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let v = rules(FieldRules {
            pattern: Some("[0-9]{5}".to_string()),
            ..Default::default()
        });

        assert!(v.check("12345").valid);
        assert_eq!(v.check("123456"), Verdict::invalid("Invalid format"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = FieldRules {
            pattern: Some("(".to_string()),
            ..Default::default()
        }
        .into_validator()
        .unwrap_err();

        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_custom_message() {
        let v = rules(FieldRules {
            email: true,
            message: Some("Please use your work email".to_string()),
            ..Default::default()
        });

        assert_eq!(v.check("nope"), Verdict::invalid("Please use your work email"));
    }

    #[test]
    fn test_rules_from_toml() {
        let parsed: FieldRules =
            toml::from_str("required = true\nmin_length = 3\npassword = \"medium\"").unwrap();

        assert!(parsed.required);
        assert_eq!(parsed.min_length, Some(3));
        assert_eq!(parsed.password.as_deref(), Some("medium"));
        assert!(!parsed.email);
    }
}
