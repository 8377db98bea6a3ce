//! First-photo-becomes-cover, as an explicit step after photo creation.

use super::{GatewayError, RecordGateway, Result};
use crate::catalog::{AlbumUpdate, NewPhoto, PhotoRecord};
use log::{debug, warn};

/// Set the album's cover to its oldest photo, unless it already has one.
///
/// Returns whether a cover was assigned. Calling it again is a no-op, and an
/// album without photos keeps no cover.
pub fn assign_cover_if_absent(gateway: &impl RecordGateway, album_id: &str) -> Result<bool> {
    let album = gateway
        .fetch_album_by_id(album_id)?
        .ok_or_else(|| GatewayError::album_not_found(album_id))?;
    if album.cover_image_url.is_some() {
        return Ok(false);
    }

    let photos = gateway.fetch_photos_for_album(album_id)?;
    let Some(first) = photos.first() else {
        return Ok(false);
    };

    gateway
        .update_album(album_id, &AlbumUpdate::cover(first.url.clone()))?
        .ok_or_else(|| GatewayError::album_not_found(album_id))?;
    debug!("album {album_id} cover set to {}", first.url);
    Ok(true)
}

/// Create a photo row, then run the cover step.
///
/// A failing cover step is logged and swallowed: the photo already exists and
/// the cover can be assigned on a later call.
pub fn record_photo(gateway: &impl RecordGateway, data: NewPhoto) -> Result<PhotoRecord> {
    let photo = gateway.create_photo(data)?;
    if let Err(e) = assign_cover_if_absent(gateway, &photo.album_id) {
        warn!("Could not set cover for album {}: {}", photo.album_id, e);
    }
    Ok(photo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewAlbum;
    use crate::gateway::MemoryGateway;
    use crate::test_helpers::new_photo;

    fn gateway_with_album() -> (MemoryGateway, String) {
        let gateway = MemoryGateway::default();
        let album = gateway
            .create_album(NewAlbum {
                title: "Sports Day".into(),
                category: "sports".into(),
                ..Default::default()
            })
            .unwrap();
        (gateway, album.id)
    }

    fn cover(gateway: &MemoryGateway, id: &str) -> Option<String> {
        gateway.fetch_album_by_id(id).unwrap().unwrap().cover_image_url
    }

    #[test]
    fn first_photo_becomes_cover() {
        let (gateway, id) = gateway_with_album();
        record_photo(&gateway, new_photo(&id, "/p/first.jpg")).unwrap();
        record_photo(&gateway, new_photo(&id, "/p/second.jpg")).unwrap();

        assert_eq!(cover(&gateway, &id).as_deref(), Some("/p/first.jpg"));
    }

    #[test]
    fn existing_cover_is_kept() {
        let (gateway, id) = gateway_with_album();
        gateway
            .update_album(&id, &AlbumUpdate::cover("/p/chosen.jpg"))
            .unwrap();

        record_photo(&gateway, new_photo(&id, "/p/new.jpg")).unwrap();
        assert_eq!(cover(&gateway, &id).as_deref(), Some("/p/chosen.jpg"));
    }

    #[test]
    fn assign_is_idempotent() {
        let (gateway, id) = gateway_with_album();
        gateway.create_photo(new_photo(&id, "/p/a.jpg")).unwrap();

        assert!(assign_cover_if_absent(&gateway, &id).unwrap());
        assert!(!assign_cover_if_absent(&gateway, &id).unwrap());
        assert_eq!(cover(&gateway, &id).as_deref(), Some("/p/a.jpg"));
    }

    #[test]
    fn album_without_photos_keeps_no_cover() {
        let (gateway, id) = gateway_with_album();
        assert!(!assign_cover_if_absent(&gateway, &id).unwrap());
        assert_eq!(cover(&gateway, &id), None);
    }

    #[test]
    fn missing_album_is_not_found() {
        let gateway = MemoryGateway::default();
        let err = assign_cover_if_absent(&gateway, "nope").unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { kind: "album", .. }));
    }

    #[test]
    fn record_photo_fails_when_insert_fails() {
        let gateway = MemoryGateway::default();
        let result = record_photo(&gateway, new_photo("missing", "/p/x.jpg"));
        assert!(result.is_err());
    }
}
