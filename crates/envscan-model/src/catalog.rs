//! Built-in descriptor table for the SaaS starter kit.
//!
//! Entries are grouped by category in display order. Provider switches
//! (`NEXT_PUBLIC_BILLING_PROVIDER`, `MAILER_PROVIDER`, `CMS_CLIENT`,
//! `NEXT_PUBLIC_MONITORING_PROVIDER`) gate the variables that only matter
//! for the selected provider.

use crate::descriptor::{ContextualValidation, Dependency, VariableDescriptor, VariableType};
use crate::validation::Validation;
use crate::validator::from_fn;
use crate::validators;

const SITE: &str = "Site";
const THEME: &str = "Theme";
const AUTH: &str = "Authentication";
const SUPABASE: &str = "Supabase";
const BILLING: &str = "Billing";
const MAILER: &str = "Mailer";
const CMS: &str = "CMS";
const FEATURES: &str = "Features";
const MONITORING: &str = "Monitoring";

const BILLING_PROVIDER: &str = "NEXT_PUBLIC_BILLING_PROVIDER";
const MAILER_PROVIDER: &str = "MAILER_PROVIDER";
const CMS_CLIENT: &str = "CMS_CLIENT";
const MONITORING_PROVIDER: &str = "NEXT_PUBLIC_MONITORING_PROVIDER";

/// Every built-in descriptor, in display order.
pub fn builtin_descriptors() -> Vec<VariableDescriptor> {
    let mut all = Vec::new();
    all.extend(site());
    all.extend(theme());
    all.extend(auth());
    all.extend(supabase());
    all.extend(billing());
    all.extend(mailer());
    all.extend(cms());
    all.extend(features());
    all.extend(monitoring());
    all
}

fn site() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new("NEXT_PUBLIC_SITE_URL", SITE, VariableType::Url)
            .describe("Public URL of the deployed site.")
            .required()
            .validate(validators::all(vec![
                validators::url(),
                validators::https_in_production(),
            ])),
        VariableDescriptor::new("NEXT_PUBLIC_PRODUCT_NAME", SITE, VariableType::String)
            .describe("Product name shown in the UI and emails.")
            .required()
            .validate(validators::min_length(1)),
        VariableDescriptor::new("NEXT_PUBLIC_SITE_TITLE", SITE, VariableType::String)
            .describe("Default page title."),
        VariableDescriptor::new("NEXT_PUBLIC_SITE_DESCRIPTION", SITE, VariableType::LongString)
            .describe("Default meta description."),
        VariableDescriptor::new("NEXT_PUBLIC_DEFAULT_LOCALE", SITE, VariableType::String)
            .describe("Locale used when the browser does not request one.")
            .validate(
                validators::matches(r"^[a-z]{2}(-[A-Z]{2})?$", "Must be a locale such as en or en-US")
                    .unwrap_or_else(|_| validators::min_length(2)),
            ),
    ]
}

fn theme() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new("NEXT_PUBLIC_DEFAULT_THEME_MODE", THEME, VariableType::Enum)
            .describe("Initial color scheme.")
            .enum_values(["light", "dark", "system"])
            .validate(validators::one_of(["light", "dark", "system"])),
        VariableDescriptor::new("NEXT_PUBLIC_THEME_COLOR", THEME, VariableType::String)
            .describe("Browser theme color for light mode."),
        VariableDescriptor::new("NEXT_PUBLIC_THEME_COLOR_DARK", THEME, VariableType::String)
            .describe("Browser theme color for dark mode."),
    ]
}

fn auth() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new("NEXT_PUBLIC_CAPTCHA_SITE_KEY", AUTH, VariableType::String)
            .describe("Public captcha site key. Enables captcha on auth forms."),
        VariableDescriptor::new("CAPTCHA_SECRET_TOKEN", AUTH, VariableType::String)
            .describe("Server-side captcha secret.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![Dependency::when_set(
                    "NEXT_PUBLIC_CAPTCHA_SITE_KEY",
                    "CAPTCHA_SECRET_TOKEN is required when NEXT_PUBLIC_CAPTCHA_SITE_KEY is set.",
                )],
                validators::min_length(1),
            )),
        VariableDescriptor::new("NEXT_PUBLIC_AUTH_PASSWORD", AUTH, VariableType::Boolean)
            .describe("Allow email and password sign in.")
            .validate(validators::boolean()),
        VariableDescriptor::new("NEXT_PUBLIC_AUTH_MAGIC_LINK", AUTH, VariableType::Boolean)
            .describe("Allow magic link sign in.")
            .validate(validators::boolean()),
    ]
}

fn supabase() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new("NEXT_PUBLIC_SUPABASE_URL", SUPABASE, VariableType::Url)
            .describe("Supabase project URL.")
            .required()
            .validate(validators::url()),
        VariableDescriptor::new("NEXT_PUBLIC_SUPABASE_ANON_KEY", SUPABASE, VariableType::String)
            .describe("Supabase anonymous key, safe for the browser.")
            .required(),
        VariableDescriptor::new("SUPABASE_SERVICE_ROLE_KEY", SUPABASE, VariableType::String)
            .describe("Supabase service role key. Bypasses row level security.")
            .secret()
            .required()
            .validate(validators::not_equal_to(
                "NEXT_PUBLIC_SUPABASE_ANON_KEY",
                "The service role key must be different from the anon key",
            )),
        VariableDescriptor::new("SUPABASE_DB_WEBHOOK_SECRET", SUPABASE, VariableType::String)
            .describe("Shared secret for database webhooks.")
            .secret(),
    ]
}

fn billing() -> Vec<VariableDescriptor> {
    let stripe_required = |name: &str| {
        Dependency::when_equals(
            BILLING_PROVIDER,
            "stripe",
            format!("{} is required when {} is set to 'stripe'.", name, BILLING_PROVIDER),
        )
    };
    let lemon_required = |name: &str| {
        Dependency::when_equals(
            BILLING_PROVIDER,
            "lemon-squeezy",
            format!(
                "{} is required when {} is set to 'lemon-squeezy'.",
                name, BILLING_PROVIDER
            ),
        )
    };

    vec![
        VariableDescriptor::new(BILLING_PROVIDER, BILLING, VariableType::Enum)
            .describe("Payment provider used for subscriptions.")
            .enum_values(["stripe", "lemon-squeezy"])
            .validate(validators::one_of(["stripe", "lemon-squeezy"])),
        VariableDescriptor::new("NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY", BILLING, VariableType::String)
            .describe("Stripe publishable key.")
            .contextual(ContextualValidation::new(
                vec![stripe_required("NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY")],
                validators::starts_with(&["pk_"], "Stripe publishable key"),
            )),
        VariableDescriptor::new("STRIPE_SECRET_KEY", BILLING, VariableType::String)
            .describe("Stripe secret or restricted key.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![stripe_required("STRIPE_SECRET_KEY")],
                validators::starts_with(&["sk_", "rk_"], "Stripe secret key"),
            )),
        VariableDescriptor::new("STRIPE_WEBHOOK_SECRET", BILLING, VariableType::String)
            .describe("Signing secret of the Stripe webhook endpoint.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![stripe_required("STRIPE_WEBHOOK_SECRET")],
                validators::starts_with(&["whsec_"], "Stripe webhook secret"),
            )),
        VariableDescriptor::new("LEMON_SQUEEZY_SECRET_KEY", BILLING, VariableType::String)
            .describe("Lemon Squeezy API key.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![lemon_required("LEMON_SQUEEZY_SECRET_KEY")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("LEMON_SQUEEZY_SIGNING_SECRET", BILLING, VariableType::String)
            .describe("Signing secret of the Lemon Squeezy webhook.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![lemon_required("LEMON_SQUEEZY_SIGNING_SECRET")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("LEMON_SQUEEZY_STORE_ID", BILLING, VariableType::String)
            .describe("Lemon Squeezy store identifier.")
            .contextual(ContextualValidation::new(
                vec![lemon_required("LEMON_SQUEEZY_STORE_ID")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("STRIPE_PUBLISHABLE_KEY", BILLING, VariableType::String)
            .describe("Former server-side name of the publishable key.")
            .deprecated(
                "The publishable key is read on the client and needs the NEXT_PUBLIC_ prefix",
                Some("NEXT_PUBLIC_STRIPE_PUBLISHABLE_KEY"),
            ),
    ]
}

fn mailer() -> Vec<VariableDescriptor> {
    let smtp_required = |name: &str| {
        Dependency::when_equals(
            MAILER_PROVIDER,
            "nodemailer",
            format!("{} is required when {} is set to 'nodemailer'.", name, MAILER_PROVIDER),
        )
    };

    vec![
        VariableDescriptor::new(MAILER_PROVIDER, MAILER, VariableType::Enum)
            .describe("Transport used to send transactional email.")
            .enum_values(["nodemailer", "resend"])
            .validate(validators::one_of(["nodemailer", "resend"])),
        VariableDescriptor::new("EMAIL_SENDER", MAILER, VariableType::String)
            .describe("Sender shown on outgoing emails, e.g. 'Acme <info@acme.com>'."),
        VariableDescriptor::new("CONTACT_EMAIL", MAILER, VariableType::Email)
            .describe("Recipient of contact form submissions.")
            .validate(validators::email()),
        VariableDescriptor::new("RESEND_API_KEY", MAILER, VariableType::String)
            .describe("Resend API key.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![Dependency::when_equals(
                    MAILER_PROVIDER,
                    "resend",
                    format!("RESEND_API_KEY is required when {} is set to 'resend'.", MAILER_PROVIDER),
                )],
                validators::starts_with(&["re_"], "Resend API key"),
            )),
        VariableDescriptor::new("EMAIL_HOST", MAILER, VariableType::String)
            .describe("SMTP host.")
            .contextual(ContextualValidation::new(
                vec![smtp_required("EMAIL_HOST")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("EMAIL_PORT", MAILER, VariableType::Number)
            .describe("SMTP port.")
            .contextual(ContextualValidation::new(
                vec![smtp_required("EMAIL_PORT")],
                validators::port(),
            )),
        VariableDescriptor::new("EMAIL_USER", MAILER, VariableType::String)
            .describe("SMTP user.")
            .contextual(ContextualValidation::new(
                vec![smtp_required("EMAIL_USER")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("EMAIL_PASSWORD", MAILER, VariableType::String)
            .describe("SMTP password.")
            .secret()
            .contextual(ContextualValidation::new(
                vec![smtp_required("EMAIL_PASSWORD")],
                validators::min_length(1),
            )),
        VariableDescriptor::new("EMAIL_TLS", MAILER, VariableType::Boolean)
            .describe("Use TLS for SMTP.")
            .validate(validators::boolean()),
    ]
}

fn cms() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new(CMS_CLIENT, CMS, VariableType::Enum)
            .describe("Content source for blog and documentation.")
            .enum_values(["keystatic", "wordpress"])
            .validate(validators::one_of(["keystatic", "wordpress"])),
        VariableDescriptor::new("WORDPRESS_API_URL", CMS, VariableType::Url)
            .describe("Base URL of the WordPress REST API.")
            .contextual(ContextualValidation::new(
                vec![Dependency::when_equals(
                    CMS_CLIENT,
                    "wordpress",
                    format!("WORDPRESS_API_URL is required when {} is set to 'wordpress'.", CMS_CLIENT),
                )],
                validators::url(),
            )),
        VariableDescriptor::new("KEYSTATIC_STORAGE_KIND", CMS, VariableType::Enum)
            .describe("Where Keystatic stores content.")
            .enum_values(["local", "cloud", "github"])
            .validate(validators::one_of(["local", "cloud", "github"])),
    ]
}

fn features() -> Vec<VariableDescriptor> {
    let flag = |name: &str, description: &str| {
        VariableDescriptor::new(name, FEATURES, VariableType::Boolean)
            .describe(description)
            .validate(validators::boolean())
    };

    vec![
        flag("NEXT_PUBLIC_ENABLE_THEME_TOGGLE", "Show the light/dark toggle."),
        flag("NEXT_PUBLIC_ENABLE_TEAM_ACCOUNTS", "Enable team accounts."),
        flag("NEXT_PUBLIC_ENABLE_PERSONAL_ACCOUNT_BILLING", "Bill personal accounts."),
        flag("NEXT_PUBLIC_ENABLE_TEAM_ACCOUNTS_BILLING", "Bill team accounts."),
        flag("NEXT_PUBLIC_ENABLE_NOTIFICATIONS", "Enable in-app notifications."),
        VariableDescriptor::new("NEXT_PUBLIC_LANGUAGE_PRIORITY", FEATURES, VariableType::Enum)
            .describe("Whether the user's or the app's language wins.")
            .enum_values(["user", "application"])
            .validate(validators::one_of(["user", "application"])),
    ]
}

fn monitoring() -> Vec<VariableDescriptor> {
    vec![
        VariableDescriptor::new(MONITORING_PROVIDER, MONITORING, VariableType::Enum)
            .describe("Error monitoring provider.")
            .enum_values(["sentry", "baselime"])
            .validate(validators::one_of(["sentry", "baselime"])),
        VariableDescriptor::new("NEXT_PUBLIC_SENTRY_DSN", MONITORING, VariableType::Url)
            .describe("Sentry DSN.")
            .contextual(ContextualValidation::new(
                vec![Dependency::when_equals(
                    MONITORING_PROVIDER,
                    "sentry",
                    format!(
                        "NEXT_PUBLIC_SENTRY_DSN is required when {} is set to 'sentry'.",
                        MONITORING_PROVIDER
                    ),
                )],
                validators::url(),
            )),
        VariableDescriptor::new("NEXT_PUBLIC_BASELIME_KEY", MONITORING, VariableType::String)
            .describe("Baselime public key.")
            .contextual(ContextualValidation::new(
                vec![Dependency::when_equals(
                    MONITORING_PROVIDER,
                    "baselime",
                    format!(
                        "NEXT_PUBLIC_BASELIME_KEY is required when {} is set to 'baselime'.",
                        MONITORING_PROVIDER
                    ),
                )],
                from_fn(|_, _| Validation::valid()),
            )),
    ]
}
