//! Particularités par famille de clients UPnP.
//!
//! Certains control points exigent des aménagements du DIDL-Lite émis :
//! classes de containers forcées, tags DLNA supprimés, formats de contenu
//! renommés, refID absent. La table est ouverte : ajouter un client
//! revient à ajouter une entrée ici, le reste du codec ne connaît que les
//! quirks, jamais les identités.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Aménagements appliqués à l'encodage pour une famille de clients.
#[derive(Debug, Clone, Default)]
pub struct ClientQuirks {
    /// Ne jamais émettre d'attribut `refID`.
    pub suppress_ref_id: bool,
    /// Remplacer les infos additionnelles DLNA par `*` sur toutes les
    /// ressources.
    pub strip_dlna_tags: bool,
    /// Remplacer les infos additionnelles par `*` sur les formats vidéo
    /// uniquement.
    pub plain_video_profile: bool,
    /// Émettre `object.container.storageFolder` à la place de
    /// `object.container`.
    pub force_storage_folder: bool,
    /// Parents virtuels dont tous les containers sont présentés en
    /// storageFolder.
    pub storage_folder_parents: &'static [&'static str],
    /// Renommages de format de contenu à l'émission (premier trouvé gagne).
    pub format_aliases: &'static [(&'static str, &'static str)],
    /// Ne proposer que la variante mp3 transcodée pour l'audio.
    pub mp3_transcode_only: bool,
}

fn default_quirks() -> ClientQuirks {
    ClientQuirks {
        format_aliases: &[("video/x-msvideo", "video/divx")],
        ..Default::default()
    }
}

static CLIENT_QUIRKS: Lazy<HashMap<&'static str, ClientQuirks>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "XBox",
        ClientQuirks {
            suppress_ref_id: true,
            strip_dlna_tags: true,
            force_storage_folder: true,
            storage_folder_parents: &["14", "15", "16"],
            format_aliases: &[
                ("video/divx", "video/avi"),
                ("video/x-msvideo", "video/avi"),
                ("audio/x-wav", "audio/wav"),
            ],
            mp3_transcode_only: true,
            ..Default::default()
        },
    );
    table.insert(
        "Philips-TV",
        ClientQuirks {
            strip_dlna_tags: true,
            ..default_quirks()
        },
    );
    table.insert(
        "PLAYSTATION3",
        ClientQuirks {
            plain_video_profile: true,
            ..default_quirks()
        },
    );
    table
});

/// Quirks de l'identité client donnée ; les identités inconnues reçoivent
/// le jeu par défaut.
pub fn quirks_for(client: &str) -> ClientQuirks {
    CLIENT_QUIRKS
        .get(client)
        .cloned()
        .unwrap_or_else(default_quirks)
}

/// Paramètres d'un appel d'encodage.
///
/// Tout est passé explicitement à chaque appel, rien n'est lu d'un état
/// global : identité du client, parent virtuel du browse en cours,
/// identifiant réellement demandé, et activation du transcodage.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Identité du client telle que vue par la couche transport
    /// (chaîne libre, ex. `XBox`).
    pub client: String,
    /// Container parent virtuel du browse en cours.
    pub parent_container: Option<String>,
    /// Identifiant demandé par le client, s'il diffère de l'identifiant
    /// naturel de l'objet.
    pub requested_id: Option<String>,
    /// Proposer des variantes transcodées des ressources.
    pub transcoding: bool,
}

impl EncodeOptions {
    /// Quirks de la famille de clients de cet appel.
    pub fn quirks(&self) -> ClientQuirks {
        quirks_for(&self.client)
    }
}
