//! Message catalog — localized user-facing text.
//!
//! Catalogs are flat JSON objects mapping a message key to a template:
//!
//! ```json
//! { "step_header": "— Step {index}: {agent_name} → {task}" }
//! ```
//!
//! Lookup order for a locale:
//! 1. `<project root>/locales/<lang>.json`
//! 2. the catalog compiled into this crate (`locales/<lang>.json`)
//!
//! A catalog that cannot be loaded falls back to English. Formatting never
//! fails: a missing key renders as the key, a template that cannot be
//! formatted renders unformatted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--lang` flag is given.
pub const LANG_ENV: &str = "AIP_LANG";

const BUILTIN_EN: &str = include_str!("../locales/en.json");
const BUILTIN_RU: &str = include_str!("../locales/ru.json");

/// Supported UI locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Locale {
    /// English (default and fallback).
    #[default]
    En,
    /// Russian.
    Ru,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// Parse a locale label (case-insensitive, tolerant of region tags like `ru_RU`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_', '.']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    /// Pick the locale from an explicit flag, else the environment, else English.
    ///
    /// An unsupported value at the chosen level yields English; it does not
    /// fall through to the next level.
    pub fn resolve(flag: Option<&str>, env: Option<&str>) -> Self {
        flag.or(env).and_then(Self::parse).unwrap_or_default()
    }

    fn builtin_source(self) -> &'static str {
        match self {
            Self::En => BUILTIN_EN,
            Self::Ru => BUILTIN_RU,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named placeholder value, usually built by the [`t!`](crate::t) macro.
#[derive(Debug, Clone)]
pub struct MessageArg {
    pub key: &'static str,
    pub value: String,
}

impl MessageArg {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// A loaded message catalog for one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Load the catalog for `requested`, searching `project_root/locales` first.
    ///
    /// Any failure (unreadable or malformed file) falls back to English.
    pub fn load(requested: Locale, project_root: &Path) -> Self {
        match Self::load_exact(requested, project_root) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("[i18n] {}; falling back to '{}'", e, Locale::En);
                Self::load_exact(Locale::En, project_root).unwrap_or_else(|e| {
                    tracing::warn!("[i18n] {}; using built-in catalog", e);
                    Self::builtin(Locale::En)
                })
            }
        }
    }

    /// The catalog compiled into the crate.
    pub fn builtin(locale: Locale) -> Self {
        Self::from_json(locale, locale.builtin_source()).unwrap_or_else(|_| Self {
            locale,
            messages: HashMap::new(),
        })
    }

    /// Parse a catalog from its JSON source.
    pub fn from_json(locale: Locale, source: &str) -> Result<Self, serde_json::Error> {
        let messages: HashMap<String, String> = serde_json::from_str(source)?;
        Ok(Self { locale, messages })
    }

    fn load_exact(locale: Locale, project_root: &Path) -> Result<Self, String> {
        let path = project_catalog_path(project_root, locale);
        if path.is_file() {
            tracing::debug!("[i18n] Loading catalog from '{}'", path.display());
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read catalog '{}': {}", path.display(), e))?;
            return Self::from_json(locale, &content)
                .map_err(|e| format!("Failed to parse catalog '{}': {}", path.display(), e));
        }
        Self::from_json(locale, locale.builtin_source())
            .map_err(|e| format!("Failed to parse built-in '{}' catalog: {}", locale, e))
    }

    /// The locale this catalog actually serves (after any fallback).
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up `key` and substitute `{name}` placeholders from `args`.
    pub fn t(&self, key: &str, args: &[MessageArg]) -> String {
        let template = self.messages.get(key).map(String::as_str).unwrap_or(key);
        if args.is_empty() {
            return template.to_string();
        }
        format_template(template, args).unwrap_or_else(|| template.to_string())
    }
}

fn project_catalog_path(project_root: &Path, locale: Locale) -> PathBuf {
    project_root
        .join("locales")
        .join(format!("{}.json", locale.as_str()))
}

/// Substitute `{name}` placeholders; `{{` and `}}` are literal braces.
///
/// Returns `None` on an unknown placeholder or an unbalanced brace.
fn format_template(template: &str, args: &[MessageArg]) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return None,
                    }
                }
                let arg = args.iter().find(|a| a.key == name)?;
                out.push_str(&arg.value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return None,
            _ => out.push(c),
        }
    }

    Some(out)
}

/// Format a localized message from a catalog, a key and named arguments.
///
/// ```
/// use aip_core::{t, Catalog, Locale};
///
/// let catalog = Catalog::builtin(Locale::En);
/// assert_eq!(t!(catalog, "file_not_found", path = "a.json"), "File not found: a.json");
/// ```
#[macro_export]
macro_rules! t {
    ($catalog:expr, $key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::i18n::MessageArg> = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $catalog.t($key, &args)
    }};
}
