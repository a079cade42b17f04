use std::fmt;
use std::str::FromStr;

use crate::error::ParleyError;

/// Languages offered by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Hindi,
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Spanish => "es",
            Self::French => "fr",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Spanish => "Spanish",
            Self::French => "French",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for Language {
    type Err = ParleyError;

    /// Accepts either the code or the display name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(wanted) || lang.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParleyError::UnknownLanguage(s.to_string()))
    }
}

/// Ordered (source, target) lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Static pair -> model identifier table.
const BINDINGS: &[(&str, &str, &str)] = &[
    ("en", "hi", "Helsinki-NLP/opus-mt-en-hi"),
    ("hi", "en", "Helsinki-NLP/opus-mt-hi-en"),
    ("en", "es", "Helsinki-NLP/opus-mt-en-es"),
    ("es", "en", "Helsinki-NLP/opus-mt-es-en"),
    ("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
    ("fr", "en", "Helsinki-NLP/opus-mt-fr-en"),
];

/// Immutable view over the supported language pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBindings;

impl ModelBindings {
    /// Model identifier bound to the pair, if any
    pub fn lookup(&self, pair: &LanguagePair) -> Option<&'static str> {
        BINDINGS
            .iter()
            .find(|(source, target, _)| *source == pair.source && *target == pair.target)
            .map(|(_, _, model)| *model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LanguagePair, &'static str)> {
        BINDINGS
            .iter()
            .map(|(source, target, model)| (LanguagePair::new(*source, *target), *model))
    }

    /// Distinct model identifiers, in table order
    pub fn model_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = Vec::new();
        for (_, _, model) in BINDINGS {
            if !ids.contains(model) {
                ids.push(*model);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        BINDINGS.len()
    }

    pub fn is_empty(&self) -> bool {
        BINDINGS.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_by_code_and_name() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" FRENCH ".parse::<Language>().unwrap(), Language::French);
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Spanish);
        assert!(matches!(
            "de".parse::<Language>(),
            Err(ParleyError::UnknownLanguage(code)) if code == "de"
        ));
    }

    #[test]
    fn test_binding_table_has_six_cross_language_entries() {
        let bindings = ModelBindings;
        assert_eq!(bindings.len(), 6);
        assert_eq!(bindings.model_ids().len(), 6);
        for (pair, _) in bindings.iter() {
            assert_ne!(pair.source, pair.target);
        }
    }

    #[test]
    fn test_direction_matters() {
        let bindings = ModelBindings;
        let forward = bindings.lookup(&LanguagePair::new("en", "hi")).unwrap();
        let backward = bindings.lookup(&LanguagePair::new("hi", "en")).unwrap();
        assert!(forward.ends_with("opus-mt-en-hi"));
        assert!(backward.ends_with("opus-mt-hi-en"));
    }

    #[test]
    fn test_unbound_pairs() {
        let bindings = ModelBindings;
        for (source, target) in [("hi", "es"), ("hi", "fr"), ("es", "fr"), ("fr", "es"), ("en", "en"), ("EN", "hi"), ("", "")] {
            assert!(bindings.lookup(&LanguagePair::new(source, target)).is_none(), "{}-{}", source, target);
        }
    }
}
