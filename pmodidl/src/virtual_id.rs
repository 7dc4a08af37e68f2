//! Virtualisation des identifiants d'objets.
//!
//! Un même objet peut apparaître sous plusieurs parents de navigation via
//! un identifiant composite `id@parent`. L'objet réel n'est jamais
//! modifié : seule la représentation émise change, `refID` pointant alors
//! vers l'identifiant canonique.

use tracing::debug;

use crate::quirks::EncodeOptions;

/// Identité affichée d'un objet pour un encodage donné.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedIdentity {
    pub id: String,
    pub parent_id: String,
    pub ref_id: Option<String>,
    /// Le titre émis doit être le titre racine littéral.
    pub root_title: bool,
}

/// Calcule l'identité affichée à partir de l'identité naturelle.
///
/// Au plus une des deux règles s'applique par encodage, l'identifiant
/// demandé étant prioritaire sur le parent virtuel :
///
/// - identifiant demandé : `"0"` force le titre racine ; s'il diffère de
///   l'identifiant naturel, celui-ci devient `refID`, l'identifiant
///   demandé est affiché et le parent est extrait du segment après le
///   premier `@` s'il existe ;
/// - parent virtuel : s'il est non-nul et diffère du parent naturel,
///   l'identifiant affiché devient `id@parent` et le parent affiché le
///   parent virtuel, `refID` pointant sur l'identifiant naturel.
///
/// `suppress_ref_id` retire le `refID` des deux règles (quirk client).
pub fn virtualize(
    natural_id: &str,
    natural_parent_id: &str,
    opts: &EncodeOptions,
    suppress_ref_id: bool,
) -> DisplayedIdentity {
    let mut identity = DisplayedIdentity {
        id: natural_id.to_string(),
        parent_id: natural_parent_id.to_string(),
        ref_id: None,
        root_title: false,
    };

    if let Some(requested) = opts.requested_id.as_deref() {
        if requested == "0" {
            identity.root_title = true;
        }
        if requested != natural_id {
            if !suppress_ref_id {
                identity.ref_id = Some(natural_id.to_string());
            }
            identity.id = requested.to_string();
            if let Some((_, parent)) = requested.split_once('@') {
                identity.parent_id = parent.to_string();
            }
            debug!(
                "changing id from {natural_id:?} to {:?}, with parentID {:?}",
                identity.id, identity.parent_id
            );
        }
    } else if let Some(parent_container) = opts.parent_container.as_deref() {
        if parent_container != "0" && parent_container != natural_parent_id {
            if !suppress_ref_id {
                identity.ref_id = Some(natural_id.to_string());
            }
            identity.id = format!("{natural_id}@{parent_container}");
            identity.parent_id = parent_container.to_string();
            debug!(
                "changing id from {natural_id:?} to {:?}, with parentID from \
                 {natural_parent_id:?} to {parent_container:?}",
                identity.id
            );
        }
    }

    identity
}
