//! Ressources jouables d'un objet de contenu.
//!
//! Une [`Resource`] décrit un rendu d'un objet : un locator opaque, un
//! protocolInfo et quelques attributs optionnels portés tels quels sur le
//! fil. [`Resources`] maintient la liste triée d'un objet et porte la
//! négociation protocolInfo côté serveur.

use std::ops::Deref;

use bevy_reflect::Reflect;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use xmltree::{Element, XMLNode};

use crate::errors::DidlError;
use crate::protocol_info::{ProtocolInfo, SIMPLE_DLNA_TAGS, build_dlna_additional_info};
use crate::quirks::ClientQuirks;

/// Un rendu jouable d'un objet de contenu.
///
/// Les attributs optionnels restent des chaînes : ils sont recopiés du et
/// vers le fil sans interprétation. Une ressource portant `import_uri` est
/// un réceptacle d'upload, jamais proposée à la lecture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct Resource {
    /// Locator de la ressource (URI ou token opaque).
    pub uri: String,
    pub protocol_info: Option<String>,
    pub bitrate: Option<String>,
    pub size: Option<String>,
    pub duration: Option<String>,
    pub nr_audio_channels: Option<String>,
    pub resolution: Option<String>,
    pub import_uri: Option<String>,
}

/// Format cible d'une variante transcodée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub enum TranscodeTarget {
    Mp3,
    Lpcm,
    MpegTs,
}

impl TranscodeTarget {
    /// Suffixe ajouté au locator : `/transcoded/<suffix>`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Lpcm => "lpcm",
            Self::MpegTs => "mpegts",
        }
    }

    fn content_format(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Lpcm => "audio/L16;rate=44100;channels=2",
            Self::MpegTs => "video/mpeg",
        }
    }

    fn profile(self) -> &'static str {
        match self {
            Self::Mp3 => "DLNA.ORG_PN=MP3",
            Self::Lpcm => "DLNA.ORG_PN=LPCM",
            Self::MpegTs => "DLNA.ORG_PN=MPEG_PS_PAL",
        }
    }
}

impl Resource {
    /// Crée une ressource en normalisant le 4e champ du protocolInfo :
    /// `*` est remplacé par les tags DLNA construits pour le format, `#`
    /// par un `*` littéral.
    pub fn new(uri: impl Into<String>, protocol_info: Option<&str>) -> Self {
        let protocol_info = protocol_info.map(|pi| {
            let fields: Vec<&str> = pi.split(':').collect();
            match fields[..] {
                [protocol, network, content_format, "*"] => format!(
                    "{protocol}:{network}:{content_format}:{}",
                    build_dlna_additional_info(content_format, false)
                ),
                [protocol, network, content_format, "#"] => {
                    format!("{protocol}:{network}:{content_format}:*")
                }
                _ => pi.to_string(),
            }
        });
        Self {
            uri: uri.into(),
            protocol_info,
            ..Default::default()
        }
    }

    /// Ressource DLNA « playcontainer » pointant sur un container entier.
    ///
    /// Le locator encode service, container et premier enfant dans une URI
    /// `dlna-playcontainer://` ; le protocolInfo vaut `http-get:*:*:*` par
    /// défaut.
    pub fn play_container(
        udn: &str,
        container_id: &str,
        first_child_id: &str,
        protocol_info: Option<&str>,
    ) -> Self {
        let quote = |v: &str| form_urlencoded::byte_serialize(v.as_bytes()).collect::<String>();
        let args = [
            format!("sid={}", quote("urn:upnp-org:serviceId:ContentDirectory")),
            format!("cid={}", quote(container_id)),
            format!("fid={}", quote(first_child_id)),
            format!("fii={}", quote("0")),
            "sc=".to_string(),
            format!("md={}", quote("0")),
        ];
        Self {
            uri: format!("dlna-playcontainer://{}?{}", quote(udn), args.join("&")),
            protocol_info: Some(protocol_info.unwrap_or("http-get:*:*:*").to_string()),
            ..Default::default()
        }
    }

    /// Champ protocole du protocolInfo, en minuscules.
    pub fn protocol(&self) -> Option<String> {
        self.protocol_info
            .as_ref()
            .and_then(|pi| pi.split(':').next())
            .map(str::to_ascii_lowercase)
    }

    /// Infos additionnelles telles qu'émises pour une famille de clients.
    ///
    /// Le tag `DLNA.ORG_PS=1` n'est jamais émis ; selon les quirks, tout
    /// est remplacé par `*`, ou seulement sur les formats vidéo.
    pub(crate) fn additional_info_for(&self, quirks: &ClientQuirks) -> String {
        let Some(pi) = &self.protocol_info else {
            return "*".to_string();
        };
        let Ok(parsed) = pi.parse::<ProtocolInfo>() else {
            return "*".to_string();
        };

        let additional = if quirks.strip_dlna_tags
            || (quirks.plain_video_profile && parsed.content_format.starts_with("video/"))
        {
            "*".to_string()
        } else {
            parsed.additional_info
        };

        additional
            .split(';')
            .filter(|tag| *tag != "DLNA.ORG_PS=1")
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Encode la ressource en élément `res`, quirks client appliqués
    /// (renommage de formats, infos additionnelles réécrites).
    pub fn to_element(&self, quirks: &ClientQuirks) -> Element {
        let mut root = Element::new("res");

        if let Some(pi) = &self.protocol_info {
            let rendered = match pi.parse::<ProtocolInfo>() {
                Ok(mut parsed) => {
                    for (from, to) in quirks.format_aliases {
                        if parsed.content_format == *from {
                            parsed.content_format = (*to).to_string();
                            break;
                        }
                    }
                    parsed.additional_info = self.additional_info_for(quirks);
                    parsed.to_string()
                }
                Err(_) => pi.clone(),
            };
            root.attributes
                .insert("protocolInfo".to_string(), rendered);
        }

        root.children.push(XMLNode::Text(self.uri.clone()));

        for (name, value) in [
            ("bitrate", &self.bitrate),
            ("size", &self.size),
            ("duration", &self.duration),
            ("nrAudioChannels", &self.nr_audio_channels),
            ("resolution", &self.resolution),
            ("importUri", &self.import_uri),
        ] {
            if let Some(value) = value {
                root.attributes.insert(name.to_string(), value.clone());
            }
        }

        root
    }

    /// Décode un élément `res`. L'attribut `protocolInfo` est obligatoire ;
    /// le protocolInfo du fil est repris tel quel, sans re-normalisation.
    pub fn from_element(elt: &Element) -> Result<Self, DidlError> {
        let protocol_info = elt.attributes.get("protocolInfo").cloned().ok_or(
            DidlError::MalformedMetadata {
                field: "protocolInfo",
                value: String::new(),
            },
        )?;

        Ok(Self {
            uri: elt
                .get_text()
                .map(|t| t.into_owned())
                .unwrap_or_default(),
            protocol_info: Some(protocol_info),
            bitrate: elt.attributes.get("bitrate").cloned(),
            size: elt.attributes.get("size").cloned(),
            duration: elt.attributes.get("duration").cloned(),
            nr_audio_channels: elt.attributes.get("nrAudioChannels").cloned(),
            resolution: elt.attributes.get("resolution").cloned(),
            import_uri: elt.attributes.get("importUri").cloned(),
        })
    }

    /// Variante transcodée de cette ressource, ou `None` si le format est
    /// déjà le format natif de la cible.
    ///
    /// Le locator reçoit le suffixe `/transcoded/<format>`, le tag
    /// `DLNA.ORG_CI` passe à 1, la taille devient inconnue, durée et
    /// résolution sont reportées.
    pub fn transcoded(&self, target: TranscodeTarget) -> Option<Resource> {
        let parsed: ProtocolInfo = self.protocol_info.as_deref()?.parse().ok()?;

        match target {
            TranscodeTarget::Mp3 if parsed.content_format == "audio/mpeg" => return None,
            TranscodeTarget::MpegTs if parsed.content_format == "video/mpeg" => return None,
            _ => {}
        }

        let mut tags: Vec<String> = vec![target.profile().to_string()];
        tags.extend(SIMPLE_DLNA_TAGS.iter().map(|t| t.to_string()));
        tags[3] = "DLNA.ORG_CI=1".to_string();

        Some(Resource {
            uri: format!("{}/transcoded/{}", self.uri, target.suffix()),
            protocol_info: Some(format!(
                "{}:{}:{}:{}",
                parsed.protocol,
                parsed.network,
                target.content_format(),
                tags.join(";")
            )),
            size: None,
            duration: self.duration.clone(),
            resolution: self.resolution.clone(),
            ..Default::default()
        })
    }
}

/// Liste de ressources d'un objet, toujours triée après insertion.
///
/// Ordre total : `http-get` d'abord, `rtsp-rtp-udp` ensuite, tout le reste
/// après, et les ressources sans protocolInfo en dernier. À protocole
/// égal, l'ordre d'insertion est conservé.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct Resources(Vec<Resource>);

impl Resources {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insère une ressource et rétablit l'ordre de tri.
    pub fn push(&mut self, resource: Resource) {
        self.0.push(resource);
        self.0.sort_by_key(Self::rank);
    }

    fn rank(resource: &Resource) -> u8 {
        match resource.protocol().as_deref() {
            Some("http-get") => 0,
            Some("rtsp-rtp-udp") => 1,
            Some(_) => 2,
            None => 3,
        }
    }

    /// Ressources compatibles avec les capacités locales données, dans
    /// l'ordre de la liste.
    ///
    /// Les ressources d'upload (`import_uri`) et celles sans protocolInfo
    /// exploitable sont ignorées ; `protocol_type` restreint en plus au
    /// protocole donné (insensible à la casse). Le premier protocolInfo
    /// local qui correspond retient la ressource, sans dédoublonnage.
    pub fn get_matching(
        &self,
        local_protocol_infos: &[ProtocolInfo],
        protocol_type: Option<&str>,
    ) -> Vec<&Resource> {
        let mut result = Vec::new();
        for res in &self.0 {
            if res.import_uri.is_some() {
                continue;
            }
            let Some(pi) = &res.protocol_info else {
                continue;
            };
            let Ok(remote) = pi.parse::<ProtocolInfo>() else {
                continue;
            };
            if let Some(wanted) = protocol_type {
                if !remote.protocol.eq_ignore_ascii_case(wanted) {
                    continue;
                }
            }
            if local_protocol_infos
                .iter()
                .any(|local| remote.matches(local))
            {
                result.push(res);
            }
        }
        result
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.0.iter()
    }
}

impl Deref for Resources {
    type Target = [Resource];

    fn deref(&self) -> &[Resource] {
        &self.0
    }
}

impl FromIterator<Resource> for Resources {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut resources = Resources::new();
        for resource in iter {
            resources.push(resource);
        }
        resources
    }
}
