//! Erreurs de la couche DIDL-Lite.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DidlError {
    /// Un protocolInfo ne se découpe pas en exactement 4 champs `:`.
    ///
    /// La ressource qui le porte est inutilisable pour la négociation.
    #[error("malformed protocolInfo: {0}")]
    MalformedProtocolInfo(String),

    /// Un champ numérique du XML entrant ne se parse pas en entier.
    #[error("malformed metadata in field {field}: {value:?}")]
    MalformedMetadata { field: &'static str, value: String },

    /// XML mal formé: aucun objet partiel n'est retourné.
    #[error("XML parse error: {0}")]
    Parse(#[from] xmltree::ParseError),

    /// Erreur d'émission XML.
    #[error("XML write error: {0}")]
    Write(#[from] xmltree::Error),
}
