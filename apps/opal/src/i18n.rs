//! Bundled translations.

use std::collections::HashMap;

use opal_tray::LabelProvider;

const FALLBACK_LANGUAGE: &str = "en";

const BUNDLES: &[(&str, &str)] = &[
    ("en", include_str!("../i18n/en.toml")),
    ("nl", include_str!("../i18n/nl.toml")),
];

/// Display strings for one language, backed by English.
#[derive(Debug, Clone)]
pub struct Translations {
    language: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translations {
    /// Loads the bundle for `language`, using English if it is unknown.
    pub fn load(language: &str) -> Result<Self, toml::de::Error> {
        let fallback = parse(FALLBACK_LANGUAGE)?;
        let (language, strings) = match bundle(language) {
            Some((code, source)) => (code.to_string(), toml::from_str(source)?),
            None => {
                tracing::warn!(language, "no translations for language, using English");
                (FALLBACK_LANGUAGE.to_string(), fallback.clone())
            }
        };

        Ok(Self {
            language,
            strings,
            fallback,
        })
    }

    /// Language actually in use.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Languages with a bundled table.
    pub fn available() -> impl Iterator<Item = &'static str> {
        BUNDLES.iter().map(|(code, _)| *code)
    }
}

impl LabelProvider for Translations {
    fn label(&self, key: &str) -> String {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Bundled `(code, source)` pair matching `language`, ignoring case.
fn bundle(language: &str) -> Option<(&'static str, &'static str)> {
    BUNDLES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(language))
        .copied()
}

fn parse(language: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    toml::from_str(bundle(language).map(|(_, source)| source).unwrap_or_default())
}
