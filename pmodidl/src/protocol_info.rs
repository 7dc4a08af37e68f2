//! protocolInfo UPnP : parsing, comparaison et tags DLNA.
//!
//! Un protocolInfo décrit comment une ressource peut être transportée et
//! rendue : `protocole:réseau:format:infos-additionnelles`. Les trois
//! premiers champs acceptent le joker `*` ; le quatrième porte les tags
//! DLNA séparés par `;` (`DLNA.ORG_PN=...`, `DLNA.ORG_FLAGS=...`).

use std::fmt;
use std::str::FromStr;

use bevy_reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::errors::DidlError;

/// Les quatre tags de capacités DLNA standard accolés au tag de profil.
pub const SIMPLE_DLNA_TAGS: [&str; 4] = [
    "DLNA.ORG_OP=01",
    "DLNA.ORG_PS=1",
    "DLNA.ORG_CI=0",
    "DLNA.ORG_FLAGS=01100000000000000000000000000000",
];

/// Masque DLNA.ORG_FLAGS des formats image.
const IMAGE_DLNA_FLAGS: &str = "DLNA.ORG_FLAGS=00900000000000000000000000000000";

/// Bit « playcontainer » du masque DLNA.ORG_FLAGS (32 chiffres hexadécimaux).
const PLAYCONTAINER_FLAG: u128 = 0x1000_0000_0000_0000_0000_0000_0000_0000;

/// Descripteur de transport/rendu à 4 champs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct ProtocolInfo {
    pub protocol: String,
    pub network: String,
    pub content_format: String,
    pub additional_info: String,
}

impl FromStr for ProtocolInfo {
    type Err = DidlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        let [protocol, network, content_format, additional_info] = fields[..] else {
            return Err(DidlError::MalformedProtocolInfo(s.to_string()));
        };
        Ok(Self {
            protocol: protocol.to_string(),
            network: network.to_string(),
            content_format: content_format.to_string(),
            additional_info: additional_info.to_string(),
        })
    }
}

impl fmt::Display for ProtocolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.protocol, self.network, self.content_format, self.additional_info
        )
    }
}

impl ProtocolInfo {
    /// Descripteur tout-joker `*:*:*:*`.
    pub fn any() -> Self {
        Self {
            protocol: "*".to_string(),
            network: "*".to_string(),
            content_format: "*".to_string(),
            additional_info: "*".to_string(),
        }
    }

    /// Teste si cette ressource (côté distant) correspond à une capacité
    /// locale.
    ///
    /// Protocole et réseau se comparent à égalité stricte, `*` acceptant
    /// tout. Le format de contenu correspond si l'un des deux vaut `*`, si
    /// le format distant commence par le format local, ou si le format
    /// local se termine par `*` (joker de sous-type, ex. `audio/*`).
    /// Pas de classement au-delà de oui/non.
    pub fn matches(&self, local: &ProtocolInfo) -> bool {
        field_matches(&self.protocol, &local.protocol)
            && field_matches(&self.network, &local.network)
            && content_format_matches(&self.content_format, &local.content_format)
    }
}

fn field_matches(remote: &str, local: &str) -> bool {
    remote == local || remote == "*" || local == "*"
}

fn content_format_matches(remote: &str, local: &str) -> bool {
    if remote == "*" || local == "*" {
        return true;
    }
    if let Some(prefix) = local.strip_suffix('*') {
        return remote.starts_with(prefix);
    }
    remote.starts_with(local)
}

/// Vrai si le type MIME désigne de l'audio.
///
/// Accepte aussi un protocolInfo complet, dont seul le champ format est
/// alors considéré. `application/ogg` compte comme audio.
pub fn is_audio(mimetype: &str) -> bool {
    let mimetype = content_format_of(mimetype);
    mimetype == "application/ogg" || mimetype.starts_with("audio/")
}

/// Vrai si le type MIME (ou le protocolInfo complet) désigne de la vidéo.
pub fn is_video(mimetype: &str) -> bool {
    content_format_of(mimetype).starts_with("video/")
}

fn content_format_of(s: &str) -> &str {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() == 4 { fields[2] } else { s }
}

/// Construit le 4e champ d'un protocolInfo pour un format de contenu connu.
///
/// Table déterministe format → tag de profil `DLNA.ORG_PN` suivi des
/// [`SIMPLE_DLNA_TAGS`]. Les formats de la famille AVI ne revendiquent
/// aucun profil ; un format inconnu donne `*` tel quel. Avec
/// `play_container`, le bit haut dédié est ajouté au premier tag
/// `DLNA.ORG_FLAGS` rencontré, re-rendu sur 32 chiffres hexadécimaux.
pub fn build_dlna_additional_info(content_format: &str, play_container: bool) -> String {
    let mut tags: Vec<String> = match content_format {
        "audio/mpeg" => with_profile("DLNA.ORG_PN=MP3"),
        "audio/ms-wma" => with_profile("DLNA.ORG_PN=WMABASE"),
        "image/jpeg" => image_profile("DLNA.ORG_PN=JPEG_LRG"),
        "image/png" => image_profile("DLNA.ORG_PN=PNG_LRG"),
        "video/mpeg" => with_profile("DLNA.ORG_PN=MPEG_PS_PAL"),
        "video/mpegts" => with_profile("DLNA.ORG_PN=MPEG_TS_PAL"),
        "video/mp4" | "video/x-m4a" => with_profile("DLNA.ORG_PN=AVC_TS_BL_CIF15_AAC"),
        // Pas de profil revendiqué pour la famille AVI.
        "video/x-msvideo" | "video/avi" | "video/divx" => vec!["*".to_string()],
        "video/x-ms-wmv" => with_profile("DLNA.ORG_PN=WMV_BASE"),
        "*" => SIMPLE_DLNA_TAGS.iter().map(|t| t.to_string()).collect(),
        _ => vec!["*".to_string()],
    };

    if play_container {
        for tag in tags.iter_mut() {
            if let Some(bits) = tag.strip_prefix("DLNA.ORG_FLAGS=") {
                if let Ok(mask) = u128::from_str_radix(bits, 16) {
                    *tag = format!("DLNA.ORG_FLAGS={:032x}", mask | PLAYCONTAINER_FLAG);
                }
                break;
            }
        }
    }

    tags.join(";")
}

fn with_profile(profile: &str) -> Vec<String> {
    let mut tags = vec![profile.to_string()];
    tags.extend(SIMPLE_DLNA_TAGS.iter().map(|t| t.to_string()));
    tags
}

fn image_profile(profile: &str) -> Vec<String> {
    let mut tags = with_profile(profile);
    tags[4] = IMAGE_DLNA_FLAGS.to_string();
    tags
}
