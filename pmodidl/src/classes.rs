//! Registre des classes UPnP et classification des types MIME.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::object::ObjectKind;

static UPNP_CLASSES: Lazy<HashMap<&'static str, ObjectKind>> = Lazy::new(|| {
    ObjectKind::ALL
        .iter()
        .map(|kind| (kind.upnp_class(), *kind))
        .collect()
});

/// Résout un nom de classe UPnP en variante concrète.
///
/// Recherche exacte d'abord, puis repli hiérarchique en retirant le
/// dernier segment du chemin et en réessayant, abandon (sans résoudre)
/// sous 2 segments. L'échec n'est pas une erreur : l'appelant ignore
/// l'entrée et continue avec ses voisines.
pub fn resolve_class(name: &str) -> Option<ObjectKind> {
    if let Some(kind) = UPNP_CLASSES.get(name) {
        return Some(*kind);
    }

    warn!("upnp class {name:?} not found, trying fallback");
    let mut parts: Vec<&str> = name.split('.').collect();
    parts.pop();
    while parts.len() > 1 {
        if let Some(kind) = UPNP_CLASSES.get(parts.join(".").as_str()) {
            return Some(*kind);
        }
        parts.pop();
    }

    warn!("no fallback for upnp class {name:?} found");
    None
}

/// Choisit une variante d'objet pour un type MIME ou un token de classe
/// (`root`, `item`, `directory`).
///
/// `sub == "music"` promeut l'audio en piste musicale et un répertoire en
/// album musical. Entrée irrésoluble : `None`, à charge de l'appelant —
/// ce n'est pas une erreur.
pub fn classify(mimetype: &str, sub: Option<&str>) -> Option<ObjectKind> {
    let music = sub == Some("music");
    match mimetype {
        "root" => Some(ObjectKind::Container),
        "item" => Some(ObjectKind::Item),
        "directory" => Some(if music {
            ObjectKind::MusicAlbum
        } else {
            ObjectKind::Container
        }),
        "application/ogg" | "application/x-flac" => Some(if music {
            ObjectKind::MusicTrack
        } else {
            ObjectKind::AudioItem
        }),
        m if m.starts_with("image/") => Some(ObjectKind::Photo),
        m if m.starts_with("audio/") => Some(if music {
            ObjectKind::MusicTrack
        } else {
            ObjectKind::AudioItem
        }),
        m if m.starts_with("video/") => Some(ObjectKind::VideoItem),
        _ => None,
    }
}
