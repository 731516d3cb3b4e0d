use once_cell::sync::Lazy;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_CACHE: Lazy<SyntaxCache> = Lazy::new(SyntaxCache::new);

/// Syntax and theme definitions are expensive to load, so one copy is
/// shared for the lifetime of the process.
pub struct SyntaxCache {
    pub syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl SyntaxCache {
    pub fn global() -> &'static SyntaxCache {
        &SYNTAX_CACHE
    }

    fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    pub fn syntax_for(&self, language: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    pub fn theme(&self) -> &Theme {
        &self.theme_set.themes["base16-ocean.dark"]
    }
}
