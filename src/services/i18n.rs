/// Localized tool descriptions and error messages.
///
/// String tables are embedded at build time from `locales/*.json`.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

define_debug_log!("i18n");

const EN_JSON: &str = include_str!("../../locales/en.json");
const JA_JSON: &str = include_str!("../../locales/ja.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ja,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub errors: ErrorTexts,
    pub tools: ToolTexts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTexts {
    pub gemini_not_found: String,
    pub install_gemini: String,
    pub unsupported_file_type: String,
    pub images: String,
    pub text: String,
    pub documents: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolTexts {
    pub google_search: ToolText,
    pub chat: ToolText,
    pub list_sessions: ToolText,
    pub analyze_file: ToolText,
    pub execute_task: ToolText,
}

/// Description of one tool and of each of its parameters (keyed by wire name).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolText {
    pub description: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl ToolText {
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Detect the current language from environment variables.
/// Priority: MCP_LANGUAGE > LANG > default (en)
pub fn detect_language() -> Language {
    let mcp_language = std::env::var("MCP_LANGUAGE").ok();
    let system_lang = std::env::var("LANG").ok();
    language_from(mcp_language.as_deref(), system_lang.as_deref())
}

fn language_from(mcp_language: Option<&str>, system_lang: Option<&str>) -> Language {
    match mcp_language.map(str::to_lowercase).as_deref() {
        Some("ja") | Some("japanese") => return Language::Ja,
        Some("en") | Some("english") => return Language::En,
        _ => {}
    }

    if system_lang.map(str::to_lowercase).is_some_and(|l| l.starts_with("ja")) {
        return Language::Ja;
    }

    Language::En
}

fn parse_locale(source: &str) -> Result<Locale, serde_json::Error> {
    serde_json::from_str(source)
}

/// Load (and cache) the string table for a language.
/// Falls back to English if the table cannot be parsed.
pub fn load_locale(lang: Language) -> &'static Locale {
    static EN: OnceLock<Locale> = OnceLock::new();
    static JA: OnceLock<Locale> = OnceLock::new();

    match lang {
        Language::En => EN.get_or_init(|| {
            parse_locale(EN_JSON).unwrap_or_else(|e| {
                debug_log(&format!("Failed to load English locale: {}", e));
                Locale::default()
            })
        }),
        Language::Ja => match JA.get_or_init(|| parse_locale(JA_JSON).unwrap_or_default()) {
            ja if !ja.errors.gemini_not_found.is_empty() => ja,
            _ => {
                debug_log("Locale 'ja' not found, falling back to English.");
                load_locale(Language::En)
            }
        },
    }
}

/// Locale for the language detected from the environment.
pub fn locale() -> &'static Locale {
    load_locale(detect_language())
}

/// Substitute `{name}` placeholders in a translated string.
pub fn t(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}
