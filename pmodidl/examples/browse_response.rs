//! Construit une réponse Browse complète, l'affiche puis la redécode.
//!
//! Lancer avec `cargo run -p pmodidl --example browse_response`.

use pmodidl::{
    ContentObject, DidlDocument, EncodeOptions, ObjectKind, Resource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let options = EncodeOptions {
        client: "XBox".to_string(),
        parent_container: Some("3".to_string()),
        transcoding: true,
        ..Default::default()
    };
    let mut doc = DidlDocument::new(options);

    let mut album = ContentObject::new(ObjectKind::MusicAlbum, "12", "7", "Kind of Blue");
    album.artist = Some("Miles Davis".to_string());
    album.container.child_count = Some(5);
    album.resources.push(Resource::play_container(
        "uuid:12345678-aaaa-bbbb-cccc-1234567890ab",
        "12",
        "64",
        None,
    ));
    doc.add_container(album);

    let mut track = ContentObject::new(ObjectKind::MusicTrack, "64", "12", "Blue in Green");
    track.artist = Some("Miles Davis".to_string());
    track.album = Some("Kind of Blue".to_string());
    track.original_track_number = Some(3);
    track.resources.push(Resource::new(
        "http://192.168.1.10:8200/media/64.flac",
        Some("http-get:*:audio/flac:*"),
    ));
    doc.push(track);

    let xml = doc.to_string()?;
    println!("{xml}");

    let decoded = DidlDocument::parse(&xml)?;
    println!();
    for object in decoded.objects() {
        println!(
            "{:?} id={} title={:?} resources={}",
            object.kind,
            object.id,
            object.title,
            object.resources.len()
        );
    }

    Ok(())
}
