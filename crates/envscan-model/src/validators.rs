//! Reusable validators for descriptor tables.
//!
//! Each function returns a boxed `Validator` so catalog entries read as
//! data: `.validate(validators::url())`. The resolution engine only calls
//! validators with non-empty values.

use crate::descriptor::VariableType;
use crate::validation::Validation;
use crate::validator::{from_fn, BoxedValidator};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@<>]+@[^\s@<>]+\.[^\s@<>]+$").unwrap());

/// Absolute `http`/`https` URL.
pub fn url() -> BoxedValidator {
    from_fn(|value, _| check_url(value))
}

fn check_url(value: &str) -> Validation {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Validation::valid(),
        Ok(parsed) => Validation::invalid(format!(
            "URL must use http or https, got {}",
            parsed.scheme()
        )),
        Err(_) => Validation::invalid("Must be a valid URL, e.g. https://example.com"),
    }
}

/// Plain `http://` is fine locally but not in production builds.
pub fn https_in_production() -> BoxedValidator {
    from_fn(|value, ctx| {
        if ctx.mode().is_production() && !value.starts_with("https://") {
            Validation::invalid("Must use https in production")
        } else {
            Validation::valid()
        }
    })
}

pub fn email() -> BoxedValidator {
    from_fn(|value, _| {
        if EMAIL_PATTERN.is_match(value) {
            Validation::valid()
        } else {
            Validation::invalid("Must be a valid email address")
        }
    })
}

pub fn number() -> BoxedValidator {
    from_fn(|value, _| match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Validation::valid(),
        _ => Validation::invalid("Must be a number"),
    })
}

/// TCP port in 1..=65535.
pub fn port() -> BoxedValidator {
    from_fn(|value, _| match value.parse::<u16>() {
        Ok(p) if p > 0 => Validation::valid(),
        _ => Validation::invalid("Must be a port number between 1 and 65535"),
    })
}

pub fn boolean() -> BoxedValidator {
    from_fn(|value, _| match value {
        "true" | "false" => Validation::valid(),
        _ => Validation::invalid("Must be either true or false"),
    })
}

pub fn one_of<I, S>(allowed: I) -> BoxedValidator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
    from_fn(move |value, _| {
        if allowed.iter().any(|a| a == value) {
            Validation::valid()
        } else {
            Validation::invalid(format!("Must be one of: {}", allowed.join(", ")))
        }
    })
}

/// Value must start with one of `prefixes`; `label` names the expected kind of value.
pub fn starts_with(prefixes: &[&str], label: &str) -> BoxedValidator {
    let prefixes: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
    let message = format!(
        "{} must start with {}",
        label,
        prefixes
            .iter()
            .map(|p| format!("'{}'", p))
            .collect::<Vec<_>>()
            .join(" or ")
    );
    from_fn(move |value, _| {
        if prefixes.iter().any(|p| value.starts_with(p.as_str())) {
            Validation::valid()
        } else {
            Validation::invalid(message.clone())
        }
    })
}

pub fn min_length(min: usize) -> BoxedValidator {
    from_fn(move |value, _| {
        if value.chars().count() >= min {
            Validation::valid()
        } else {
            Validation::invalid(format!("Must be at least {} characters long", min))
        }
    })
}

/// Value must match `pattern`.
///
/// Compiled once here; the returned validator never fails to run.
pub fn matches(pattern: &str, message: impl Into<String>) -> Result<BoxedValidator, regex::Error> {
    let regex = Regex::new(pattern)?;
    let message = message.into();
    Ok(from_fn(move |value, _| {
        if regex.is_match(value) {
            Validation::valid()
        } else {
            Validation::invalid(message.clone())
        }
    }))
}

/// Cross-variable check: value must differ from `other`'s effective value.
pub fn not_equal_to(other: &str, message: impl Into<String>) -> BoxedValidator {
    let other = other.to_string();
    let message = message.into();
    from_fn(move |value, ctx| {
        if ctx.value(&other) == value {
            Validation::invalid(message.clone())
        } else {
            Validation::valid()
        }
    })
}

/// Run every validator and report all issues together.
pub fn all(validators: Vec<BoxedValidator>) -> BoxedValidator {
    from_fn(move |value, ctx| {
        validators
            .iter()
            .fold(Validation::valid(), |acc, v| acc.and(v.evaluate(value, ctx)))
    })
}

/// Validator implied by a declared type, for descriptors that come from data.
///
/// Plain and long strings imply nothing.
pub fn for_type(var_type: VariableType, enum_values: &[String]) -> Option<BoxedValidator> {
    match var_type {
        VariableType::String | VariableType::LongString => None,
        VariableType::Number => Some(number()),
        VariableType::Boolean => Some(boolean()),
        VariableType::Enum => Some(one_of(enum_values.iter().cloned())),
        VariableType::Url => Some(url()),
        VariableType::Email => Some(email()),
    }
}
