//! Locale negotiation and the demo message catalogs.

use std::collections::HashMap;
use std::sync::Arc;

use oxide_forms::{Catalog, Control, Translator};
use oxide_router::Request;
use tracing::debug;

/// Name of the query parameter, form field and cookie carrying the locale.
pub const LOCALE_PARAM: &str = "_LOCALE_";

/// Locales with a catalog, in display order.
pub const SUPPORTED: &[&str] = &["en", "fr", "de", "ru"];

/// Translations keyed by msgid, in `fr`, `de`, `ru` order.
const MESSAGES: &[(&str, [&str; 3])] = &[
    (
        "A number between ${min} and ${max}",
        [
            "Un nombre entre ${min} et ${max}",
            "Eine Zahl zwischen ${min} und ${max}",
            "Число от ${min} до ${max}",
        ],
    ),
    ("Submit", ["Soumettre", "Absenden", "Отправить"]),
    ("Required", ["Requis", "Pflichtfeld", "Обязательное поле"]),
    (
        "There was a problem with your submission",
        [
            "Il y a eu un problème avec votre soumission",
            "Bei Ihrer Eingabe ist ein Problem aufgetreten",
            "При отправке формы возникла проблема",
        ],
    ),
    (
        "Errors have been highlighted below",
        [
            "Les erreurs sont signalées ci-dessous",
            "Fehler sind unten markiert",
            "Ошибки выделены ниже",
        ],
    ),
    (
        "${val} is less than minimum value ${min}",
        [
            "${val} est inférieur à la valeur minimale ${min}",
            "${val} ist kleiner als der Mindestwert ${min}",
            "${val} меньше минимального значения ${min}",
        ],
    ),
    (
        "${val} is greater than maximum value ${max}",
        [
            "${val} est supérieur à la valeur maximale ${max}",
            "${val} ist größer als der Höchstwert ${max}",
            "${val} больше максимального значения ${max}",
        ],
    ),
    (
        "\"${val}\" is not a number",
        [
            "« ${val} » n'est pas un nombre",
            "„${val}“ ist keine Zahl",
            "«${val}» не является числом",
        ],
    ),
    (
        "Shorter than minimum length ${min}",
        [
            "Plus court que la longueur minimale ${min}",
            "Kürzer als die Mindestlänge ${min}",
            "Короче минимальной длины ${min}",
        ],
    ),
    (
        "Longer than maximum length ${max}",
        [
            "Plus long que la longueur maximale ${max}",
            "Länger als die Höchstlänge ${max}",
            "Длиннее максимальной длины ${max}",
        ],
    ),
];

fn catalog(locale: &str) -> Catalog {
    let column = match locale {
        "fr" => 0,
        "de" => 1,
        "ru" => 2,
        _ => return Catalog::new(locale),
    };
    MESSAGES
        .iter()
        .fold(Catalog::new(locale), |catalog, (msgid, translations)| {
            catalog.message(*msgid, translations[column])
        })
}

/// The catalogs of every supported locale plus the fallback locale.
#[derive(Debug, Clone)]
pub struct Locales {
    default: String,
    catalogs: HashMap<String, Arc<Catalog>>,
}

impl Locales {
    /// Loads all catalogs. An unsupported `default` falls back to `en`.
    pub fn new(default: &str) -> Self {
        let default = if SUPPORTED.contains(&default) {
            default
        } else {
            SUPPORTED[0]
        };
        let catalogs = SUPPORTED
            .iter()
            .map(|locale| ((*locale).to_string(), Arc::new(catalog(locale))))
            .collect();
        Self {
            default: default.to_string(),
            catalogs,
        }
    }

    /// The fallback locale.
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Picks the locale for a request.
    ///
    /// Checked in order: the query string, the submitted form, the cookie,
    /// then the default. The first supported value wins.
    pub fn negotiate(&self, req: &Request, controls: &[(String, Control)]) -> String {
        let from_form = controls.iter().find_map(|(name, value)| match value {
            Control::Text(v) if name == LOCALE_PARAM => Some(v.as_str()),
            _ => None,
        });
        let locale = [req.get_query(LOCALE_PARAM), from_form, req.cookie(LOCALE_PARAM)]
            .into_iter()
            .flatten()
            .find(|candidate| self.catalogs.contains_key(*candidate))
            .unwrap_or(&self.default);
        debug!(locale, "Negotiated locale");
        locale.to_string()
    }

    /// Translator for `locale`, or for the default if it has no catalog.
    pub fn translator(&self, locale: &str) -> Arc<dyn Translator> {
        match self
            .catalogs
            .get(locale)
            .or_else(|| self.catalogs.get(&self.default))
        {
            Some(catalog) => catalog.clone(),
            None => Arc::new(Catalog::new(locale)),
        }
    }
}
