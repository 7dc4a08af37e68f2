//! Document DIDL-Lite : enveloppe, namespaces et boucle de décodage.
//!
//! # Architecture
//!
//! Un [`DidlDocument`] rassemble des [`ContentObject`] et les options
//! d'encodage de l'appel en cours. L'encodage produit l'élément racine
//! `DIDL-Lite` avec sa table de namespaces explicite ; le décodage
//! parcourt les enfants de la racine, résout la classe de chacun et
//! ignore ceux dont la classe reste irrésoluble.

use std::io::Cursor;

use tracing::{debug, warn};
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::classes::resolve_class;
use crate::errors::DidlError;
use crate::object::{ContentObject, child_elements, local_name, text_of};
use crate::quirks::EncodeOptions;

pub const DIDL_LITE_NS: &str = "urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/";
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const UPNP_NS: &str = "urn:schemas-upnp-org:metadata-1-0/upnp/";
pub const DLNA_NS: &str = "urn:schemas-dlna-org:metadata-1-0";
pub const PV_NS: &str = "http://www.pv.com/pvns/";
pub const DEVICE_NS: &str = "urn:schemas-dlna-org:device-1-0";
pub const EVENT_NS: &str = "urn:schemas-upnp-org:event-1-0";

/// Table préfixe → URI des namespaces déclarés sur l'enveloppe.
pub fn namespace_prefixes() -> &'static [(&'static str, &'static str)] {
    &[
        ("dc", DC_NS),
        ("upnp", UPNP_NS),
        ("dlna", DLNA_NS),
        ("pv", PV_NS),
        ("dev", DEVICE_NS),
        ("e", EVENT_NS),
    ]
}

/// Document DIDL-Lite en cours de construction ou fraîchement décodé.
#[derive(Debug, Clone, Default)]
pub struct DidlDocument {
    /// Options appliquées à chaque objet lors de l'encodage.
    pub options: EncodeOptions,
    objects: Vec<ContentObject>,
}

impl DidlDocument {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            options,
            objects: Vec::new(),
        }
    }

    pub fn push(&mut self, object: ContentObject) {
        self.objects.push(object);
    }

    /// Ajoute un container avec un `dc:creator` vide, comme l'attendent
    /// certains control points pour distinguer les dossiers navigables.
    pub fn add_container(&mut self, mut container: ContentObject) {
        if container.creator.is_none() {
            container.creator = Some(String::new());
        }
        self.objects.push(container);
    }

    pub fn objects(&self) -> &[ContentObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Construit l'élément racine `DIDL-Lite` avec ses déclarations de
    /// namespaces et un enfant par objet.
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("DIDL-Lite");
        root.attributes
            .insert("xmlns".to_string(), DIDL_LITE_NS.to_string());
        for (prefix, uri) in namespace_prefixes() {
            root.attributes
                .insert(format!("xmlns:{prefix}"), (*uri).to_string());
        }
        for object in &self.objects {
            root.children
                .push(XMLNode::Element(object.to_element(&self.options)));
        }
        root
    }

    /// Sérialise le document en fragment XML sans déclaration `<?xml`.
    pub fn to_string(&self) -> Result<String, DidlError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.to_element().write_with_config(
            &mut buffer,
            EmitterConfig::new().write_document_declaration(false),
        )?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Décode un document DIDL-Lite depuis sa forme texte.
    pub fn parse(xml: &str) -> Result<Self, DidlError> {
        Self::from_bytes(xml.as_bytes())
    }

    /// Décode un document depuis des octets bruts.
    ///
    /// Les octets nuls sont filtrés avant le parsing : certains clients
    /// terminent leur corps SOAP par un NUL.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DidlError> {
        let cleaned: Vec<u8> = data.iter().copied().filter(|b| *b != 0).collect();
        let root = Element::parse(Cursor::new(cleaned))?;
        Self::from_root(&root)
    }

    /// Décode le fragment DIDL-Lite porté par une réponse Browse/Search,
    /// le second membre du couple `(Result, métadonnées)` étant ignoré.
    pub fn from_parts(body: &str, _metadata: &str) -> Result<Self, DidlError> {
        Self::parse(body)
    }

    fn from_root(root: &Element) -> Result<Self, DidlError> {
        let mut document = DidlDocument::default();
        for child in child_elements(root) {
            let class_text = child_elements(child)
                .find(|c| local_name(c) == "class")
                .map(text_of)
                .unwrap_or_default();
            let Some(kind) = resolve_class(class_text.trim()) else {
                warn!("skipping didl entry with unresolvable class {class_text:?}");
                continue;
            };
            debug!("decoding didl entry as {kind:?}");
            document.push(ContentObject::from_element(kind, child)?);
        }
        Ok(document)
    }
}

/// Enveloppe un fragment d'éléments `item`/`container` dans une racine
/// `DIDL-Lite` portant les déclarations de namespaces usuelles.
pub fn wrap_fragment(fragment: &str) -> String {
    format!(
        "<DIDL-Lite xmlns=\"{DIDL_LITE_NS}\" xmlns:dc=\"{DC_NS}\" \
         xmlns:dlna=\"{DLNA_NS}\" xmlns:pv=\"{PV_NS}\" \
         xmlns:upnp=\"{UPNP_NS}\">{fragment}</DIDL-Lite>"
    )
}
