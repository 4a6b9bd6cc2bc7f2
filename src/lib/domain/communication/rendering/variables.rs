//! Template variable substitution

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(r"\{\{(\w+)\}\}").unwrap();
}

/// Values substituted into `{{name}}` tokens.
///
/// Names are case-insensitive: `{{ClientName}}` and `{{clientname}}` resolve to the same
/// value. A token whose name is missing is left as it is, so optional variables need an
/// explicit default (usually the empty string) in the mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateVariables(HashMap<String, String>);

impl TemplateVariables {
    /// Creates an empty set of variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, replacing any value with the same (case-insensitive) name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.to_lowercase(), value.into());
        self
    }

    /// Builder form of [`TemplateVariables::insert`].
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Looks up a variable by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The number of variables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variables are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substitutes these variables into `source`, see [`substitute`].
    pub fn apply(&self, source: &str) -> String {
        substitute(source, self)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateVariables
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();

        for (name, value) in iter {
            variables.insert(name.as_ref(), value);
        }

        variables
    }
}

/// Replaces every `{{name}}` token in `source` with its value from `variables`.
///
/// Unknown names and malformed tokens (unbalanced braces, non-word characters) are
/// left untouched.
pub fn substitute(source: &str, variables: &TemplateVariables) -> String {
    TOKEN_REGEX
        .replace_all(source, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Returns the distinct token names in `source`, in order of first appearance.
pub fn placeholders(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in TOKEN_REGEX.captures_iter(source) {
        let name = &caps[1];

        if !names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }

    names
}
