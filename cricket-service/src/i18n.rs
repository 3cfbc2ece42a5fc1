//! User-facing text, kept in Fluent catalogues keyed by locale.

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

const DEFAULT_LOCALE: &str = "en";

const EN_MESSAGES: &str = r#"
# Cricket Chat - English Translations

# Proxy errors
error-question-required = Question is required and must be a string
error-rate-limited = Rate limit exceeded. Please wait a moment before asking another question.
error-connectivity = Unable to connect to the cricket knowledge base. Please check your connection and try again.
error-ai-unavailable = The cricket AI is temporarily unavailable. Please try again in a moment.
error-resource-unavailable = Unable to fetch cricket { $resource } at the moment.
error-internal = An internal error occurred

# Chat client
chat-thinking = Thinking...
chat-ask-empty = Sorry, I couldn't process that question. Please try again!
chat-ask-failed = Oops! Something went wrong. Please try asking again!
chat-quick-empty = Sorry, couldn't fetch that right now!
chat-quick-failed = Oops! Couldn't fetch that cricket { $action }. Please try again!
chat-welcome = Welcome to Cricket AI
chat-welcome-hint = Ask me anything about cricket - from rules and stats to player histories and match analysis!

# Health
health-status-healthy = Service is healthy
"#;

type Bundle = FluentBundle<FluentResource>;

/// Message catalogues, built once and shared read-only
pub struct I18n {
    bundles: HashMap<String, Bundle>,
}

impl I18n {
    /// Catalogues for every embedded locale; a locale that fails to parse is skipped
    pub fn new() -> Self {
        let mut bundles = HashMap::new();
        for (locale, source) in [(DEFAULT_LOCALE, EN_MESSAGES)] {
            match build_bundle(locale, source) {
                Ok(bundle) => {
                    debug!(locale = %locale, "Loaded translations");
                    bundles.insert(locale.to_string(), bundle);
                }
                Err(e) => warn!(locale = %locale, error = %e, "Skipping translations"),
            }
        }
        Self { bundles }
    }

    /// Message text for `key`; the default locale, then the key itself, stand in
    /// when the locale or message is missing
    pub fn get(&self, locale: &str, key: &str, args: Option<&FluentArgs>) -> String {
        self.lookup(locale, key, args)
            .or_else(|| self.lookup(DEFAULT_LOCALE, key, args))
            .unwrap_or_else(|| key.to_string())
    }

    /// [`I18n::get`] with string arguments
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        let fluent_args: FluentArgs = args.iter().map(|(k, v)| (*k, *v)).collect();
        self.get(locale, key, Some(&fluent_args))
    }

    fn lookup(&self, locale: &str, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(locale)?;
        let pattern = bundle.get_message(key)?.value()?;

        let mut errors = vec![];
        let text = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key = %key, errors = ?errors, "Fluent formatting errors");
        }

        Some(text.into_owned())
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

fn build_bundle(locale: &str, source: &str) -> Result<Bundle, String> {
    let lang_id: LanguageIdentifier = locale
        .parse()
        .map_err(|e| format!("Invalid locale '{}': {}", locale, e))?;
    let resource = FluentResource::try_new(source.to_string())
        .map_err(|(_, errors)| format!("Unparseable catalogue: {:?}", errors))?;

    let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
    // Messages end up in JSON bodies and terminal output, not bidi-aware markup
    bundle.set_use_isolating(false);
    bundle
        .add_resource(resource)
        .map_err(|errors| format!("Conflicting messages: {:?}", errors))?;

    Ok(bundle)
}
