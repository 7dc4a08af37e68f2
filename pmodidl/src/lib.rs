//! # pmodidl - DIDL-Lite Parser
//!
//! Parser, générateur et utilitaires pour le format DIDL-Lite utilisé
//! dans UPnP/DLNA : description des objets d'un ContentDirectory (items
//! et containers), de leurs ressources jouables et de la négociation
//! protocolInfo associée.
//!
//! # Architecture
//!
//! - [`protocol_info`] : descripteurs protocolInfo à 4 champs,
//!   comparaison de capacités et construction des tags DLNA ;
//! - [`resource`] : ressources jouables d'un objet, tri, négociation et
//!   variantes transcodées ;
//! - [`object`] : taxonomie aplatie des classes UPnP et codec
//!   item/container ;
//! - [`classes`] : registre des classes et classification des types MIME ;
//! - [`quirks`] : aménagements par famille de clients ;
//! - [`virtual_id`] : identifiants composites `id@parent` pour la
//!   navigation virtuelle ;
//! - [`didl`] : enveloppe `DIDL-Lite`, namespaces et boucle de décodage.
//!
//! Cette couche transforme des objets pour un cycle encodage/décodage,
//! elle ne les stocke jamais : le backend ContentDirectory reste
//! propriétaire des identités naturelles.

pub mod classes;
pub mod didl;
pub mod errors;
pub mod object;
pub mod protocol_info;
pub mod quirks;
pub mod resource;
pub mod virtual_id;

pub use classes::{classify, resolve_class};
pub use didl::{DidlDocument, wrap_fragment};
pub use errors::DidlError;
pub use object::{ContainerFields, ContentObject, ItemFields, ObjectKind};
pub use protocol_info::{ProtocolInfo, build_dlna_additional_info, is_audio, is_video};
pub use quirks::{ClientQuirks, EncodeOptions, quirks_for};
pub use resource::{Resource, Resources, TranscodeTarget};
pub use virtual_id::{DisplayedIdentity, virtualize};
