//! Localization: supported languages, language negotiation and the message
//! catalog.
//!
//! Messages are keyed by their English source text. English lookups fall
//! back to the key itself, so only messages whose English rendering differs
//! from the key need an English entry.

use axum::http::HeaderMap;
use axum::http::header::ACCEPT_LANGUAGE;

/// Name of the cookie remembering the chosen language.
pub const LANG_COOKIE: &str = "lang";

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// English (default)
    #[default]
    English,
    /// French
    French,
}

impl Language {
    /// Every supported language, in selector order.
    pub const ALL: [Self; 2] = [Self::English, Self::French];

    /// BCP 47 tag
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
        }
    }

    /// Name of the language in itself
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "Français",
        }
    }

    /// Globe shown next to the label
    #[must_use]
    pub const fn world_emoji(self) -> &'static str {
        match self {
            Self::English => "🌎",
            Self::French => "🌍",
        }
    }

    /// Parse an exact tag (`"en"`, `"fr"`, case-insensitive).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag().eq_ignore_ascii_case(tag.trim()))
    }

    /// Match a language range such as `fr-CA` on its primary subtag.
    fn from_range(range: &str) -> Option<Self> {
        range.split(['-', '_']).next().and_then(Self::from_tag)
    }

    /// Translator for this language
    #[must_use]
    pub const fn translator(self) -> Translator {
        Translator { language: self }
    }
}

/// Pick the language for a request: the `lang` cookie if it names a
/// supported language, then the best `Accept-Language` match, then English.
#[must_use]
pub fn negotiate(cookie: Option<&str>, accept_language: Option<&str>) -> Language {
    cookie
        .and_then(Language::from_tag)
        .or_else(|| accept_language.and_then(best_accepted))
        .unwrap_or_default()
}

/// Resolve the language from request headers.
#[must_use]
pub fn negotiate_headers(headers: &HeaderMap) -> Language {
    let cookie = crate::cookies::cookie_value(headers, LANG_COOKIE);
    let accept = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let language = negotiate(cookie, accept);
    tracing::trace!(?cookie, ?accept, language = language.tag(), "Language resolved");
    language
}

/// Highest-weighted supported language in an `Accept-Language` value.
fn best_accepted(header: &str) -> Option<Language> {
    let mut ranges: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let range = parts.next()?.trim();
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (!range.is_empty() && quality > 0.0).then_some((range, quality))
        })
        .collect();

    // Stable: equal weights keep header order.
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranges
        .into_iter()
        .find_map(|(range, _)| Language::from_range(range))
}

/// Message lookup for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    /// Language this translator renders
    #[must_use]
    pub const fn language(self) -> Language {
        self.language
    }

    /// Translate `key`; unknown keys render as themselves.
    #[must_use]
    pub fn text<'a>(self, key: &'a str) -> &'a str {
        let catalog = match self.language {
            Language::English => ENGLISH,
            Language::French => FRENCH,
        };
        catalog
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(key, |&(_, message)| message)
    }

    /// "Showing N todo items." with plural selection.
    #[must_use]
    pub fn showing(self, count: usize) -> String {
        match (self.language, count) {
            (Language::English, 1) => "Showing 1 todo item.".to_string(),
            (Language::English, n) => format!("Showing {n} todo items."),
            (Language::French, 1) => "Affichage de 1 élément à faire.".to_string(),
            (Language::French, n) => format!("Affichage de {n} éléments à faire."),
        }
    }
}

/// English messages that differ from their key.
const ENGLISH: &[(&str, &str)] = &[
    (
        "intro(part)1",
        "This simple todo app demonstrates the effective use of ",
    ),
    (
        "intro(part)2",
        ", a way to enhance interactivity and responsiveness to basic HTML, with fragments rendered on the server.",
    ),
];

const FRENCH: &[(&str, &str)] = &[
    ("site-wide navigation", "navigation sur l'ensemble du site"),
    ("navigation links", "liens de navigation"),
    ("Home", "Accueil"),
    ("Todos", "À faire"),
    ("main header", "en-tête principal"),
    ("main page content", "contenu de la page principale"),
    ("footer", "bas de page"),
    ("new todo form", "nouveau formulaire à faire"),
    ("new todo entry", "nouvelle entrée à faire"),
    ("list of todos", "liste de tâches"),
    ("Filter todos:", "Filtrer les tâches:"),
    ("Select language", "Choisir la langue"),
    ("Todo list", "Liste de choses à faire"),
    ("Todo", "À faire"),
    ("Done?", "Complété?"),
    ("Actions", "Actions"),
    ("New todo", "Nouvelle tâche"),
    ("Show:", "Montrer:"),
    ("All", "Tout"),
    ("Done", "Complété"),
    ("Remaining", "Restant"),
    ("Mark done", "Marquer complété"),
    ("Mark undone", "Marquer inachevé"),
    ("Edit", "Modifier"),
    ("Save", "Enregistrer"),
    ("Cancel", "Annuler"),
    ("Delete", "Supprimer"),
    (
        "intro(part)1",
        "Cette application simple à faire montre l'utilisation efficace de ",
    ),
    (
        "intro(part)2",
        ", un moyen d'améliorer l'interactivité et la réactivité au HTML de base, avec des fragments rendus sur le serveur.",
    ),
    ("What to do …", "Que faire …"),
    ("Add", "Ajouter"),
    ("Copyright", "Droits d'auteur"),
    ("Are you sure?", "Es-tu sûr?"),
    ("Todo text is required", "Le texte de la tâche est obligatoire"),
];
