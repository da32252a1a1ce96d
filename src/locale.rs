use serde_json::Value;

use crate::persist::PrefsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Uz,
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Uz, Locale::Ru, Locale::En];

    pub const fn code(self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// Exact match against the supported codes.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code() == code)
    }

    pub fn next(self) -> Self {
        match self {
            Locale::Uz => Locale::Ru,
            Locale::Ru => Locale::En,
            Locale::En => Locale::Uz,
        }
    }
}

/// `entity[field_locale]`, else `entity[field]`, else `""`.
pub fn resolve_field(entity: Option<&Value>, field: &str, locale: Locale) -> String {
    let Some(entity) = entity else {
        return String::new();
    };
    let localized = format!("{field}_{}", locale.code());
    display_value(entity.get(&localized))
        .or_else(|| display_value(entity.get(field)))
        .unwrap_or_default()
}

/// Falsy values count as absent: `""`, `0`, `null`, `false`. Objects and arrays
/// have no display form and are skipped too.
fn display_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// The one place the active language lives. Passed to whoever renders.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    locale: Locale,
    store: PrefsStore,
}

impl LocaleResolver {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            store: PrefsStore::in_memory(),
        }
    }

    /// Starts from the persisted choice, falling back to the default language.
    pub fn load(store: PrefsStore) -> Self {
        let locale = store.load_locale().unwrap_or_default();
        Self { locale, store }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn resolve(&self, entity: Option<&Value>, field: &str) -> String {
        resolve_field(entity, field, self.locale)
    }

    pub fn name(&self, entity: Option<&Value>) -> String {
        self.resolve(entity, "name")
    }

    /// Switches language and persists it. Unsupported codes change nothing.
    pub fn set_locale(&mut self, code: &str) -> bool {
        let Some(locale) = Locale::parse(code) else {
            tracing::debug!(code, "rejected unsupported language code");
            return false;
        };
        self.locale = locale;
        if let Err(err) = self.store.save_locale(locale) {
            tracing::warn!(error = %err, "failed to persist language");
        }
        true
    }
}

impl Default for LocaleResolver {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
