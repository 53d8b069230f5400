//! JSON message catalogs

use crate::domain::Localizer;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "en";

const EN: &str = include_str!("../../locales/en.json");

type Catalog = HashMap<String, String>;

/// [`Localizer`] over JSON catalogs, with a per-user locale preference
pub struct JsonLocalizer {
    catalogs: HashMap<String, Catalog>,
    user_locales: RwLock<HashMap<String, String>>,
}

impl JsonLocalizer {
    /// Localizer with the bundled English catalog
    pub fn bundled() -> Result<Self> {
        let mut localizer = Self {
            catalogs: HashMap::new(),
            user_locales: RwLock::new(HashMap::new()),
        };
        localizer.add_catalog(DEFAULT_LOCALE, EN)?;
        Ok(localizer)
    }

    pub fn add_catalog(&mut self, locale: &str, json: &str) -> Result<()> {
        let catalog: Catalog = serde_json::from_str(json)
            .with_context(|| format!("invalid message catalog for locale {locale}"))?;
        self.catalogs.insert(locale.to_string(), catalog);
        Ok(())
    }

    pub fn set_user_locale(&self, user_id: &str, locale: &str) {
        self.user_locales
            .write()
            .insert(user_id.to_string(), locale.to_string());
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(locale)
            .and_then(|c| c.get(key))
            .map(String::as_str)
    }
}

impl Localizer for JsonLocalizer {
    fn translate(&self, user_id: Option<&str>, key: &str, args: &[String]) -> String {
        let locale = user_id
            .and_then(|id| self.user_locales.read().get(id).cloned())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let template = self
            .lookup(&locale, key)
            .or_else(|| self.lookup(DEFAULT_LOCALE, key))
            .unwrap_or(key);

        args.iter()
            .enumerate()
            .fold(template.to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }
}
