//! Taxonomie des objets de contenu et leur codec élément par élément.
//!
//! La hiérarchie de classes UPnP (`object.item.audioItem.musicTrack`,
//! `object.container.album.musicAlbum`, ...) est aplatie en une variante
//! étiquetée : un [`ObjectKind`] plus des groupes de champs optionnels par
//! famille ([`ItemFields`], [`ContainerFields`]). Chaque variante connaît
//! son chemin de classe canonique et sa chaîne d'héritage ; l'encodage
//! d'une variante étend logiquement celui de son parent.

use bevy_reflect::Reflect;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use xmltree::{Element, XMLNode};

use crate::errors::DidlError;
use crate::protocol_info::{ProtocolInfo, is_audio, is_video};
use crate::quirks::{ClientQuirks, EncodeOptions};
use crate::resource::{Resource, Resources, TranscodeTarget};
use crate::virtual_id::virtualize;

/// Variante concrète d'un objet de contenu.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema, Reflect,
)]
pub enum ObjectKind {
    Item,
    ImageItem,
    Photo,
    AudioItem,
    MusicTrack,
    AudioBroadcast,
    AudioBook,
    VideoItem,
    Movie,
    VideoBroadcast,
    MusicVideoClip,
    PlaylistItem,
    TextItem,
    Container,
    Person,
    MusicArtist,
    PlaylistContainer,
    Album,
    MusicAlbum,
    PhotoAlbum,
    Genre,
    MusicGenre,
    MovieGenre,
    StorageSystem,
    StorageVolume,
    StorageFolder,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 26] = [
        Self::Item,
        Self::ImageItem,
        Self::Photo,
        Self::AudioItem,
        Self::MusicTrack,
        Self::AudioBroadcast,
        Self::AudioBook,
        Self::VideoItem,
        Self::Movie,
        Self::VideoBroadcast,
        Self::MusicVideoClip,
        Self::PlaylistItem,
        Self::TextItem,
        Self::Container,
        Self::Person,
        Self::MusicArtist,
        Self::PlaylistContainer,
        Self::Album,
        Self::MusicAlbum,
        Self::PhotoAlbum,
        Self::Genre,
        Self::MusicGenre,
        Self::MovieGenre,
        Self::StorageSystem,
        Self::StorageVolume,
        Self::StorageFolder,
    ];

    /// Chemin canonique de la classe UPnP.
    pub fn upnp_class(self) -> &'static str {
        match self {
            Self::Item => "object.item",
            Self::ImageItem => "object.item.imageItem",
            Self::Photo => "object.item.imageItem.photo",
            Self::AudioItem => "object.item.audioItem",
            Self::MusicTrack => "object.item.audioItem.musicTrack",
            Self::AudioBroadcast => "object.item.audioItem.audioBroadcast",
            Self::AudioBook => "object.item.audioItem.audioBook",
            Self::VideoItem => "object.item.videoItem",
            Self::Movie => "object.item.videoItem.movie",
            Self::VideoBroadcast => "object.item.videoItem.videoBroadcast",
            Self::MusicVideoClip => "object.item.videoItem.musicVideoClip",
            Self::PlaylistItem => "object.item.playlistItem",
            Self::TextItem => "object.item.textItem",
            Self::Container => "object.container",
            Self::Person => "object.container.person",
            Self::MusicArtist => "object.container.person.musicArtist",
            Self::PlaylistContainer => "object.container.playlistContainer",
            Self::Album => "object.container.album",
            Self::MusicAlbum => "object.container.album.musicAlbum",
            Self::PhotoAlbum => "object.container.album.photoAlbum",
            Self::Genre => "object.container.genre",
            Self::MusicGenre => "object.container.genre.musicGenre",
            Self::MovieGenre => "object.container.genre.movieGenre",
            Self::StorageSystem => "object.container.storageSystem",
            Self::StorageVolume => "object.container.storageVolume",
            Self::StorageFolder => "object.container.storageFolder",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::Person
                | Self::MusicArtist
                | Self::PlaylistContainer
                | Self::Album
                | Self::MusicAlbum
                | Self::PhotoAlbum
                | Self::Genre
                | Self::MusicGenre
                | Self::MovieGenre
                | Self::StorageSystem
                | Self::StorageVolume
                | Self::StorageFolder
        )
    }

    /// Nom de l'élément DIDL-Lite émis pour cette variante.
    pub fn element_name(self) -> &'static str {
        if self.is_container() { "container" } else { "item" }
    }

    /// Variante parente dans la taxonomie, `None` pour les racines
    /// `item`/`container`.
    pub fn parent(self) -> Option<ObjectKind> {
        match self {
            Self::Item | Self::Container => None,
            Self::ImageItem
            | Self::AudioItem
            | Self::VideoItem
            | Self::PlaylistItem
            | Self::TextItem => Some(Self::Item),
            Self::Photo => Some(Self::ImageItem),
            Self::MusicTrack | Self::AudioBroadcast | Self::AudioBook => Some(Self::AudioItem),
            Self::Movie | Self::VideoBroadcast | Self::MusicVideoClip => Some(Self::VideoItem),
            Self::Person
            | Self::PlaylistContainer
            | Self::Album
            | Self::Genre
            | Self::StorageSystem
            | Self::StorageVolume
            | Self::StorageFolder => Some(Self::Container),
            Self::MusicArtist => Some(Self::Person),
            Self::MusicAlbum | Self::PhotoAlbum => Some(Self::Album),
            Self::MusicGenre | Self::MovieGenre => Some(Self::Genre),
        }
    }

    /// Chaîne d'héritage, de la racine (`item`/`container`) vers la
    /// variante.
    pub fn lineage(self) -> Vec<ObjectKind> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

/// Champs propres aux items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct ItemFields {
    /// Identifiant canonique quand l'objet est émis sous un identifiant
    /// virtuel.
    pub ref_id: Option<String>,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub relation: Option<String>,
    pub rights: Option<String>,
    pub rating: Option<String>,
    pub producer: Option<String>,
    pub storage_medium: Option<String>,
    pub playlist: Option<String>,
    pub contributor: Option<String>,
}

/// Champs propres aux containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct ContainerFields {
    pub child_count: Option<u32>,
    pub create_class: Option<String>,
    pub search_classes: Vec<String>,
    pub searchable: Option<bool>,
}

/// Un objet de contenu : item ou container, avec ses métadonnées et ses
/// ressources jouables.
///
/// Les objets sont construits par le backend ContentDirectory avec leurs
/// identifiants réels ; cette couche ne fait que les transformer pour un
/// cycle encodage/décodage, jamais les persister.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema, Reflect)]
pub struct ContentObject {
    pub kind: ObjectKind,
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub creator: Option<String>,
    pub restricted: bool,
    /// Classe telle que vue sur le fil. Le décodage reprend la valeur du
    /// document ; l'encodage émet toujours le chemin canonique de la
    /// variante.
    pub upnp_class: String,
    pub date: Option<String>,
    pub write_status: Option<String>,
    pub album_art_uri: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    /// Occurrences de genre au-delà de la première.
    pub genres: Vec<String>,
    pub album: Option<String>,
    pub original_track_number: Option<u32>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub resources: Resources,
    pub item: ItemFields,
    pub container: ContainerFields,
}

impl ContentObject {
    pub fn new(
        kind: ObjectKind,
        id: impl Into<String>,
        parent_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            parent_id: parent_id.into(),
            title: title.into(),
            creator: None,
            restricted: false,
            upnp_class: kind.upnp_class().to_string(),
            date: None,
            write_status: None,
            album_art_uri: None,
            artist: None,
            genre: None,
            genres: Vec::new(),
            album: None,
            original_track_number: None,
            description: None,
            long_description: None,
            resources: Resources::new(),
            item: ItemFields::default(),
            container: ContainerFields::default(),
        }
    }

    /// Encode l'objet en élément `item`/`container` DIDL-Lite.
    ///
    /// Ordre d'émission : attributs d'identité, titre, classe, creator,
    /// writeStatus, date, pochette, artiste, genres, numéro de piste,
    /// descriptions, champs de variante (de la racine vers la feuille),
    /// puis les ressources dans l'ordre de la liste.
    pub fn to_element(&self, opts: &EncodeOptions) -> Element {
        let quirks = opts.quirks();
        let mut root = Element::new(self.kind.element_name());

        let identity = virtualize(&self.id, &self.parent_id, opts, quirks.suppress_ref_id);
        root.attributes.insert("id".to_string(), identity.id.clone());
        root.attributes
            .insert("parentID".to_string(), identity.parent_id.clone());

        let ref_id = identity.ref_id.clone().or_else(|| {
            if quirks.suppress_ref_id {
                None
            } else {
                self.item.ref_id.clone()
            }
        });
        if let Some(ref_id) = ref_id {
            root.attributes.insert("refID".to_string(), ref_id);
        }

        root.attributes.insert(
            "restricted".to_string(),
            if self.restricted { "1" } else { "0" }.to_string(),
        );

        let title = if identity.root_title {
            "root"
        } else {
            self.title.as_str()
        };
        text_element(&mut root, "dc:title", title);
        text_element(&mut root, "upnp:class", self.emitted_class(opts, &quirks));

        text_element_if_some(&mut root, "dc:creator", &self.creator);
        text_element_if_some(&mut root, "upnp:writeStatus", &self.write_status);

        match &self.date {
            Some(date) => text_element(&mut root, "dc:date", date),
            None => text_element(&mut root, "dc:date", synthetic_date()),
        }

        if let Some(album_art) = &self.album_art_uri {
            let mut art = Element::new("upnp:albumArtURI");
            art.attributes
                .insert("dlna:profileID".to_string(), "JPEG_TN".to_string());
            art.children.push(XMLNode::Text(album_art.clone()));
            root.children.push(XMLNode::Element(art));
        }

        text_element_if_some(&mut root, "upnp:artist", &self.artist);
        text_element_if_some(&mut root, "upnp:genre", &self.genre);
        for genre in &self.genres {
            text_element(&mut root, "upnp:genre", genre);
        }
        if let Some(track) = self.original_track_number {
            text_element(&mut root, "upnp:originalTrackNumber", track.to_string());
        }
        text_element_if_some(&mut root, "dc:description", &self.description);
        text_element_if_some(&mut root, "upnp:longDescription", &self.long_description);

        for step in self.kind.lineage() {
            self.encode_kind_fields(step, &mut root);
        }

        self.append_resources(&mut root, opts, &quirks);

        root
    }

    /// Classe émise : toujours le chemin canonique de la variante, sauf
    /// coercition storageFolder exigée par les quirks client.
    fn emitted_class(&self, opts: &EncodeOptions, quirks: &ClientQuirks) -> &'static str {
        let canonical = self.kind.upnp_class();
        if quirks.force_storage_folder {
            if let Some(parent_container) = opts.parent_container.as_deref() {
                if canonical.starts_with("object.container")
                    && quirks.storage_folder_parents.contains(&parent_container)
                {
                    return ObjectKind::StorageFolder.upnp_class();
                }
            }
            if self.kind == ObjectKind::Container {
                return ObjectKind::StorageFolder.upnp_class();
            }
        }
        canonical
    }

    fn encode_kind_fields(&self, step: ObjectKind, root: &mut Element) {
        match step {
            ObjectKind::Item => {
                text_element_if_some(root, "upnp:director", &self.item.director);
                for actor in &self.item.actors {
                    text_element(root, "dc:actor", actor);
                }
            }
            ObjectKind::ImageItem => {
                text_element_if_some(root, "upnp:rating", &self.item.rating);
                text_element_if_some(root, "upnp:storageMedium", &self.item.storage_medium);
                text_element_if_some(root, "dc:publisher", &self.item.publisher);
                text_element_if_some(root, "dc:rights", &self.item.rights);
            }
            ObjectKind::Photo => {
                text_element_if_some(root, "upnp:album", &self.album);
            }
            ObjectKind::AudioItem => {
                text_element_if_some(root, "dc:publisher", &self.item.publisher);
                text_element_if_some(root, "dc:language", &self.item.language);
                text_element_if_some(root, "dc:relation", &self.item.relation);
                text_element_if_some(root, "dc:rights", &self.item.rights);
            }
            ObjectKind::MusicTrack => {
                text_element_if_some(root, "upnp:album", &self.album);
                text_element_if_some(root, "upnp:playlist", &self.item.playlist);
                text_element_if_some(root, "upnp:storageMedium", &self.item.storage_medium);
                text_element_if_some(root, "dc:contributor", &self.item.contributor);
            }
            ObjectKind::VideoItem => {
                text_element_if_some(root, "upnp:producer", &self.item.producer);
                text_element_if_some(root, "upnp:rating", &self.item.rating);
                text_element_if_some(root, "dc:publisher", &self.item.publisher);
                text_element_if_some(root, "dc:language", &self.item.language);
                text_element_if_some(root, "dc:relation", &self.item.relation);
            }
            ObjectKind::Container => {
                if let Some(count) = self.container.child_count {
                    root.attributes
                        .insert("childCount".to_string(), count.to_string());
                }
                text_element_if_some(root, "upnp:createclass", &self.container.create_class);
                for search_class in &self.container.search_classes {
                    let mut sc = Element::new("upnp:searchClass");
                    sc.attributes
                        .insert("includeDerived".to_string(), "1".to_string());
                    sc.children.push(XMLNode::Text(search_class.clone()));
                    root.children.push(XMLNode::Element(sc));
                }
                if let Some(searchable) = self.container.searchable {
                    root.attributes.insert(
                        "searchable".to_string(),
                        if searchable { "1" } else { "0" }.to_string(),
                    );
                }
            }
            _ => {}
        }
    }

    /// Ajoute les éléments `res`, en proposant des variantes transcodées
    /// de la meilleure ressource `http-get` quand le transcodage est
    /// demandé : mp3 seul pour les clients qui l'exigent, originaux plus
    /// lpcm pour l'audio sinon, originaux plus mpegts pour la vidéo.
    fn append_resources(&self, root: &mut Element, opts: &EncodeOptions, quirks: &ClientQuirks) {
        if opts.transcoding && !self.kind.is_container() {
            let matching = self
                .resources
                .get_matching(&[ProtocolInfo::any()], Some("http-get"));
            if let Some(best) = matching.first() {
                let pi = best.protocol_info.clone().unwrap_or_default();
                if is_audio(&pi) {
                    if quirks.mp3_transcode_only {
                        match best.transcoded(TranscodeTarget::Mp3) {
                            Some(t) => root.children.push(XMLNode::Element(t.to_element(quirks))),
                            None => {
                                root.children.push(XMLNode::Element(best.to_element(quirks)))
                            }
                        }
                    } else {
                        for res in self.resources.iter() {
                            root.children.push(XMLNode::Element(res.to_element(quirks)));
                        }
                        if let Some(t) = best.transcoded(TranscodeTarget::Lpcm) {
                            root.children.push(XMLNode::Element(t.to_element(quirks)));
                        }
                    }
                    return;
                } else if is_video(&pi) {
                    for res in self.resources.iter() {
                        root.children.push(XMLNode::Element(res.to_element(quirks)));
                    }
                    if let Some(t) = best.transcoded(TranscodeTarget::MpegTs) {
                        root.children.push(XMLNode::Element(t.to_element(quirks)));
                    }
                    return;
                }
            }
        }

        for res in self.resources.iter() {
            root.children.push(XMLNode::Element(res.to_element(quirks)));
        }
    }

    /// Décode un élément `item`/`container` en objet de la variante
    /// donnée.
    ///
    /// Les enfants sont appariés sur leur nom local uniquement ; les tags
    /// inconnus sont ignorés. `creator` et `writeStatus`, émis à
    /// l'encodage, ne sont volontairement pas relus ici.
    pub fn from_element(kind: ObjectKind, elt: &Element) -> Result<Self, DidlError> {
        let mut obj = ContentObject::new(
            kind,
            elt.attributes.get("id").cloned().unwrap_or_default(),
            elt.attributes.get("parentID").cloned().unwrap_or_default(),
            String::new(),
        );
        obj.item.ref_id = elt.attributes.get("refID").cloned();
        obj.restricted = is_truthy(elt.attributes.get("restricted"));

        for child in child_elements(elt) {
            match local_name(child) {
                "title" => obj.title = text_of(child),
                "albumArtURI" => obj.album_art_uri = Some(text_of(child)),
                "originalTrackNumber" => {
                    let text = text_of(child);
                    obj.original_track_number = Some(text.trim().parse().map_err(|_| {
                        DidlError::MalformedMetadata {
                            field: "originalTrackNumber",
                            value: text,
                        }
                    })?);
                }
                "description" => obj.description = Some(text_of(child)),
                "longDescription" => obj.long_description = Some(text_of(child)),
                "artist" => obj.artist = Some(text_of(child)),
                "genre" => {
                    let text = text_of(child);
                    if obj.genre.is_none() {
                        obj.genre = Some(text);
                    } else {
                        obj.genres.push(text);
                    }
                }
                "album" => obj.album = Some(text_of(child)),
                "class" => obj.upnp_class = text_of(child),
                "res" => {
                    let res = Resource::from_element(child)?;
                    obj.resources.push(res);
                }
                _ => {}
            }
        }

        for step in kind.lineage() {
            obj.decode_kind_fields(step, elt)?;
        }

        Ok(obj)
    }

    fn decode_kind_fields(&mut self, step: ObjectKind, elt: &Element) -> Result<(), DidlError> {
        match step {
            ObjectKind::Item => {
                for child in child_elements(elt) {
                    match local_name(child) {
                        "refID" => self.item.ref_id = Some(text_of(child)),
                        "director" => self.item.director = Some(text_of(child)),
                        "actor" => self.item.actors.push(text_of(child)),
                        _ => {}
                    }
                }
            }
            ObjectKind::ImageItem => {
                for child in child_elements(elt) {
                    match local_name(child) {
                        "rating" => self.item.rating = Some(text_of(child)),
                        "storageMedium" => self.item.storage_medium = Some(text_of(child)),
                        "publisher" => self.item.publisher = Some(text_of(child)),
                        "rights" => self.item.rights = Some(text_of(child)),
                        _ => {}
                    }
                }
            }
            ObjectKind::AudioItem => {
                for child in child_elements(elt) {
                    match local_name(child) {
                        "publisher" => self.item.publisher = Some(text_of(child)),
                        "language" => self.item.language = Some(text_of(child)),
                        "relation" => self.item.relation = Some(text_of(child)),
                        "rights" => self.item.rights = Some(text_of(child)),
                        _ => {}
                    }
                }
            }
            ObjectKind::MusicTrack => {
                for child in child_elements(elt) {
                    match local_name(child) {
                        "playlist" => self.item.playlist = Some(text_of(child)),
                        "storageMedium" => self.item.storage_medium = Some(text_of(child)),
                        "contributor" => self.item.contributor = Some(text_of(child)),
                        _ => {}
                    }
                }
            }
            ObjectKind::VideoItem => {
                for child in child_elements(elt) {
                    match local_name(child) {
                        "producer" => self.item.producer = Some(text_of(child)),
                        "rating" => self.item.rating = Some(text_of(child)),
                        "publisher" => self.item.publisher = Some(text_of(child)),
                        "language" => self.item.language = Some(text_of(child)),
                        "relation" => self.item.relation = Some(text_of(child)),
                        _ => {}
                    }
                }
            }
            ObjectKind::Container => {
                if let Some(v) = elt.attributes.get("childCount") {
                    self.container.child_count =
                        Some(v.trim().parse().map_err(|_| DidlError::MalformedMetadata {
                            field: "childCount",
                            value: v.clone(),
                        })?);
                }
                self.container.searchable = elt
                    .attributes
                    .get("searchable")
                    .map(|v| is_truthy(Some(v)));

                for child in child_elements(elt) {
                    match local_name(child) {
                        "createclass" => self.container.create_class = Some(text_of(child)),
                        "searchClass" => self.container.search_classes.push(text_of(child)),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn is_truthy(value: Option<&String>) -> bool {
    matches!(
        value.map(String::as_str),
        Some("1" | "true" | "True" | "yes" | "Yes")
    )
}

/// Date synthétique émise quand l'objet n'en porte pas ; valeur fixe pour
/// garder l'encodage déterministe.
fn synthetic_date() -> String {
    NaiveDate::from_ymd_opt(2005, 3, 10)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| "2005-03-10T00:00:00".to_string())
}

fn text_element(parent: &mut Element, name: &str, text: impl Into<String>) {
    let mut child = Element::new(name);
    child.children.push(XMLNode::Text(text.into()));
    parent.children.push(XMLNode::Element(child));
}

fn text_element_if_some(parent: &mut Element, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        text_element(parent, name, value.clone());
    }
}

/// Nom local d'un élément, préfixe éventuel ignoré.
pub(crate) fn local_name(elt: &Element) -> &str {
    elt.name.rsplit(':').next().unwrap_or(&elt.name)
}

pub(crate) fn child_elements(elt: &Element) -> impl Iterator<Item = &Element> {
    elt.children.iter().filter_map(XMLNode::as_element)
}

pub(crate) fn text_of(elt: &Element) -> String {
    elt.get_text().map(|t| t.into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_child<'a>(elt: &'a Element, name: &str) -> Option<&'a Element> {
        child_elements(elt).find(|c| local_name(c) == name)
    }

    fn child_texts(elt: &Element, name: &str) -> Vec<String> {
        child_elements(elt)
            .filter(|c| local_name(c) == name)
            .map(text_of)
            .collect()
    }

    fn music_track() -> ContentObject {
        let mut track = ContentObject::new(ObjectKind::MusicTrack, "64", "7", "Blue in Green");
        track.artist = Some("Miles Davis".to_string());
        track.album = Some("Kind of Blue".to_string());
        track.original_track_number = Some(3);
        track
            .resources
            .push(Resource::new("http://host/64.flac", Some("http-get:*:audio/flac:*")));
        track
    }

    #[test]
    fn test_encode_common_fields() {
        let track = music_track();
        let elt = track.to_element(&EncodeOptions::default());

        assert_eq!(elt.name, "item");
        assert_eq!(elt.attributes.get("id").map(String::as_str), Some("64"));
        assert_eq!(elt.attributes.get("parentID").map(String::as_str), Some("7"));
        assert_eq!(elt.attributes.get("restricted").map(String::as_str), Some("0"));
        assert_eq!(text_of(find_child(&elt, "title").unwrap()), "Blue in Green");
        assert_eq!(
            text_of(find_child(&elt, "class").unwrap()),
            "object.item.audioItem.musicTrack"
        );
        assert_eq!(text_of(find_child(&elt, "album").unwrap()), "Kind of Blue");
        assert_eq!(
            text_of(find_child(&elt, "originalTrackNumber").unwrap()),
            "3"
        );
        assert_eq!(child_texts(&elt, "res").len(), 1);
    }

    #[test]
    fn test_encode_emits_canonical_class_despite_override() {
        let mut track = music_track();
        track.upnp_class = "object.item.bogusClass".to_string();
        let elt = track.to_element(&EncodeOptions::default());
        assert_eq!(
            text_of(find_child(&elt, "class").unwrap()),
            "object.item.audioItem.musicTrack"
        );
    }

    #[test]
    fn test_encode_synthetic_date_when_unset() {
        let track = music_track();
        let elt = track.to_element(&EncodeOptions::default());
        assert_eq!(
            text_of(find_child(&elt, "date").unwrap()),
            "2005-03-10T00:00:00"
        );

        let mut dated = music_track();
        dated.date = Some("2020-01-01".to_string());
        let elt = dated.to_element(&EncodeOptions::default());
        assert_eq!(text_of(find_child(&elt, "date").unwrap()), "2020-01-01");
    }

    #[test]
    fn test_encode_album_art_profile() {
        let mut track = music_track();
        track.album_art_uri = Some("http://host/cover.jpg".to_string());
        let elt = track.to_element(&EncodeOptions::default());
        let art = find_child(&elt, "albumArtURI").unwrap();
        assert_eq!(
            art.attributes.get("dlna:profileID").map(String::as_str),
            Some("JPEG_TN")
        );
        assert_eq!(text_of(art), "http://host/cover.jpg");
    }

    #[test]
    fn test_encode_virtualized_identity() {
        let track = music_track();
        let opts = EncodeOptions {
            requested_id: Some("64@3".to_string()),
            ..Default::default()
        };
        let elt = track.to_element(&opts);
        assert_eq!(elt.attributes.get("id").map(String::as_str), Some("64@3"));
        assert_eq!(elt.attributes.get("parentID").map(String::as_str), Some("3"));
        assert_eq!(elt.attributes.get("refID").map(String::as_str), Some("64"));
    }

    #[test]
    fn test_encode_xbox_suppresses_ref_id() {
        let track = music_track();
        let opts = EncodeOptions {
            client: "XBox".to_string(),
            requested_id: Some("64@3".to_string()),
            ..Default::default()
        };
        let elt = track.to_element(&opts);
        assert_eq!(elt.attributes.get("id").map(String::as_str), Some("64@3"));
        assert_eq!(elt.attributes.get("refID"), None);
    }

    #[test]
    fn test_encode_root_title_forced() {
        let mut root_container = ContentObject::new(ObjectKind::Container, "0", "-1", "Music");
        root_container.restricted = true;
        let opts = EncodeOptions {
            requested_id: Some("0".to_string()),
            ..Default::default()
        };
        let elt = root_container.to_element(&opts);
        assert_eq!(text_of(find_child(&elt, "title").unwrap()), "root");
    }

    #[test]
    fn test_encode_xbox_storage_folder_coercion() {
        let container = ContentObject::new(ObjectKind::Container, "5", "0", "Folder");
        let opts = EncodeOptions {
            client: "XBox".to_string(),
            ..Default::default()
        };
        let elt = container.to_element(&opts);
        assert_eq!(
            text_of(find_child(&elt, "class").unwrap()),
            "object.container.storageFolder"
        );

        let album = ContentObject::new(ObjectKind::MusicAlbum, "5", "14", "Album");
        let opts = EncodeOptions {
            client: "XBox".to_string(),
            parent_container: Some("14".to_string()),
            ..Default::default()
        };
        let elt = album.to_element(&opts);
        assert_eq!(
            text_of(find_child(&elt, "class").unwrap()),
            "object.container.storageFolder"
        );

        // Même album, parent virtuel non concerné: classe canonique.
        let opts = EncodeOptions {
            client: "XBox".to_string(),
            parent_container: Some("99".to_string()),
            ..Default::default()
        };
        let elt = album.to_element(&opts);
        assert_eq!(
            text_of(find_child(&elt, "class").unwrap()),
            "object.container.album.musicAlbum"
        );
    }

    #[test]
    fn test_container_encode_attributes_and_search_classes() {
        let mut album = ContentObject::new(ObjectKind::MusicAlbum, "12", "7", "Albums");
        album.container.child_count = Some(42);
        album.container.searchable = Some(true);
        album
            .container
            .search_classes
            .push("object.item.audioItem.musicTrack".to_string());

        let elt = album.to_element(&EncodeOptions::default());
        assert_eq!(elt.name, "container");
        assert_eq!(elt.attributes.get("childCount").map(String::as_str), Some("42"));
        assert_eq!(elt.attributes.get("searchable").map(String::as_str), Some("1"));
        let sc = find_child(&elt, "searchClass").unwrap();
        assert_eq!(
            sc.attributes.get("includeDerived").map(String::as_str),
            Some("1")
        );
        assert_eq!(text_of(sc), "object.item.audioItem.musicTrack");
    }

    #[test]
    fn test_transcoding_appends_lpcm_for_audio() {
        let track = music_track();
        let opts = EncodeOptions {
            transcoding: true,
            ..Default::default()
        };
        let elt = track.to_element(&opts);
        let res = child_texts(&elt, "res");
        assert_eq!(res.len(), 2);
        assert_eq!(res[1], "http://host/64.flac/transcoded/lpcm");
    }

    #[test]
    fn test_transcoding_xbox_offers_mp3_only() {
        let track = music_track();
        let opts = EncodeOptions {
            client: "XBox".to_string(),
            transcoding: true,
            ..Default::default()
        };
        let elt = track.to_element(&opts);
        let res = child_texts(&elt, "res");
        assert_eq!(res, ["http://host/64.flac/transcoded/mp3"]);
    }

    #[test]
    fn test_transcoding_appends_mpegts_for_video() {
        let mut movie = ContentObject::new(ObjectKind::Movie, "90", "8", "Film");
        movie
            .resources
            .push(Resource::new("http://host/film.avi", Some("http-get:*:video/avi:*")));
        let opts = EncodeOptions {
            transcoding: true,
            ..Default::default()
        };
        let elt = movie.to_element(&opts);
        let res = child_texts(&elt, "res");
        assert_eq!(res.len(), 2);
        assert_eq!(res[1], "http://host/film.avi/transcoded/mpegts");
    }

    #[test]
    fn test_transcoding_without_http_get_resource_is_plain() {
        let mut track = ContentObject::new(ObjectKind::MusicTrack, "1", "0", "t");
        track
            .resources
            .push(Resource::new("rtsp://host/s", Some("rtsp-rtp-udp:*:audio/mpeg:*")));
        let opts = EncodeOptions {
            transcoding: true,
            ..Default::default()
        };
        let elt = track.to_element(&opts);
        assert_eq!(child_texts(&elt, "res"), ["rtsp://host/s"]);
    }

    #[test]
    fn test_decode_round_trip_core_fields() {
        let mut track = music_track();
        // Un 4e champ '#' donne un protocolInfo stable à l'aller-retour.
        track.resources = Resources::new();
        track
            .resources
            .push(Resource::new("http://host/64.mp3", Some("http-get:*:audio/mpeg:#")));

        let elt = track.to_element(&EncodeOptions::default());
        let back = ContentObject::from_element(ObjectKind::MusicTrack, &elt).unwrap();

        assert_eq!(back.id, "64");
        assert_eq!(back.parent_id, "7");
        assert_eq!(back.title, "Blue in Green");
        assert_eq!(back.upnp_class, "object.item.audioItem.musicTrack");
        assert_eq!(back.artist.as_deref(), Some("Miles Davis"));
        assert_eq!(back.album.as_deref(), Some("Kind of Blue"));
        assert_eq!(back.original_track_number, Some(3));
        assert_eq!(back.resources.len(), 1);
        assert_eq!(
            back.resources[0].protocol_info.as_deref(),
            Some("http-get:*:audio/mpeg:*")
        );
        // creator émis mais jamais relu.
        assert_eq!(back.creator, None);
    }

    #[test]
    fn test_decode_genre_accumulation() {
        let mut elt = Element::new("item");
        text_element(&mut elt, "class", "object.item.audioItem.musicTrack");
        text_element(&mut elt, "genre", "Jazz");
        text_element(&mut elt, "genre", "Modal");
        text_element(&mut elt, "genre", "Cool");

        let obj = ContentObject::from_element(ObjectKind::MusicTrack, &elt).unwrap();
        assert_eq!(obj.genre.as_deref(), Some("Jazz"));
        assert_eq!(obj.genres, ["Modal", "Cool"]);
    }

    #[test]
    fn test_decode_malformed_track_number() {
        let mut elt = Element::new("item");
        text_element(&mut elt, "originalTrackNumber", "three");

        let err = ContentObject::from_element(ObjectKind::MusicTrack, &elt).unwrap_err();
        assert!(matches!(
            err,
            DidlError::MalformedMetadata {
                field: "originalTrackNumber",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_container_fields() {
        let mut elt = Element::new("container");
        elt.attributes.insert("id".to_string(), "14".to_string());
        elt.attributes.insert("parentID".to_string(), "0".to_string());
        elt.attributes.insert("childCount".to_string(), "12".to_string());
        elt.attributes
            .insert("searchable".to_string(), "true".to_string());
        text_element(&mut elt, "searchClass", "object.item.audioItem");
        text_element(&mut elt, "searchClass", "object.item.videoItem");
        text_element(&mut elt, "createclass", "object.item.audioItem.musicTrack");

        let obj = ContentObject::from_element(ObjectKind::StorageFolder, &elt).unwrap();
        assert_eq!(obj.container.child_count, Some(12));
        assert_eq!(obj.container.searchable, Some(true));
        assert_eq!(
            obj.container.search_classes,
            ["object.item.audioItem", "object.item.videoItem"]
        );
        assert_eq!(
            obj.container.create_class.as_deref(),
            Some("object.item.audioItem.musicTrack")
        );
    }

    #[test]
    fn test_decode_malformed_child_count() {
        let mut elt = Element::new("container");
        elt.attributes
            .insert("childCount".to_string(), "many".to_string());
        let err = ContentObject::from_element(ObjectKind::Container, &elt).unwrap_err();
        assert!(matches!(
            err,
            DidlError::MalformedMetadata {
                field: "childCount",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_item_specific_tags() {
        let mut elt = Element::new("item");
        text_element(&mut elt, "refID", "64");
        text_element(&mut elt, "director", "S. Kubrick");
        text_element(&mut elt, "actor", "K. Dullea");
        text_element(&mut elt, "actor", "G. Lockwood");

        let obj = ContentObject::from_element(ObjectKind::Movie, &elt).unwrap();
        assert_eq!(obj.item.ref_id.as_deref(), Some("64"));
        assert_eq!(obj.item.director.as_deref(), Some("S. Kubrick"));
        assert_eq!(obj.item.actors, ["K. Dullea", "G. Lockwood"]);
    }

    #[test]
    fn test_decode_restricted_truthy_tokens() {
        for (value, expected) in [
            ("1", true),
            ("true", true),
            ("Yes", true),
            ("0", false),
            ("no", false),
        ] {
            let mut elt = Element::new("item");
            elt.attributes
                .insert("restricted".to_string(), value.to_string());
            let obj = ContentObject::from_element(ObjectKind::Item, &elt).unwrap();
            assert_eq!(obj.restricted, expected, "restricted={value}");
        }
    }

    #[test]
    fn test_decode_ignores_unknown_tags() {
        let mut elt = Element::new("item");
        text_element(&mut elt, "title", "t");
        text_element(&mut elt, "somethingElse", "ignored");
        let obj = ContentObject::from_element(ObjectKind::Item, &elt).unwrap();
        assert_eq!(obj.title, "t");
    }

    #[test]
    fn test_lineage_chains() {
        assert_eq!(
            ObjectKind::MusicTrack.lineage(),
            [ObjectKind::Item, ObjectKind::AudioItem, ObjectKind::MusicTrack]
        );
        assert_eq!(
            ObjectKind::MusicArtist.lineage(),
            [ObjectKind::Container, ObjectKind::Person, ObjectKind::MusicArtist]
        );
        assert_eq!(ObjectKind::Item.lineage(), [ObjectKind::Item]);
    }
}
