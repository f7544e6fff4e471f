//! The media library collaborator contract and the save flow.
//!
//! The remote library (a CMS media endpoint) is an external collaborator:
//! its client implementation, credentials, and transport live outside the
//! core. The core sees it only through the [`MediaLibrary`] trait, passed
//! in explicitly - there is no ambient session state to reach for. The
//! [`EncodedImage`] payload is the sole thing crossing the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{encode, EncodeError, EncodedImage, MimeType};
use crate::render::{render, RenderError};
use crate::session::EditSession;

/// Errors reported by the media library collaborator.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The remote request failed (transport, auth, server error).
    #[error("Media library request failed: {0}")]
    Request(String),

    /// The referenced item does not exist remotely.
    #[error("Media item not found: {0}")]
    NotFound(String),
}

/// A media library item as reported by the remote collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub mime: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// The remote media library contract.
///
/// `upload` with `as_new = false` overwrites the item the session was
/// opened from; `as_new = true` creates a fresh item and leaves the
/// original untouched.
pub trait MediaLibrary {
    fn list(&self) -> Result<Vec<MediaItem>, MediaError>;
    fn upload(&mut self, image: &EncodedImage, as_new: bool) -> Result<MediaItem, MediaError>;
    fn delete(&mut self, id: &str) -> Result<bool, MediaError>;
}

/// Failures of the save flow, aggregating its three stages.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// The save / save-as-new trigger: render the session's current state,
/// encode it, and upload it to the library.
pub fn save_to_library(
    session: &EditSession,
    library: &mut dyn MediaLibrary,
    mime: MimeType,
    as_new: bool,
) -> Result<MediaItem, SaveError> {
    let buffer = render(session.source(), &session.snapshot())?;
    let encoded = encode(&buffer, mime)?;
    Ok(library.upload(&encoded, as_new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::SourceImage;
    use crate::geometry::Axis;

    /// In-memory collaborator standing in for the remote client.
    #[derive(Default)]
    struct RecordingLibrary {
        uploads: Vec<(EncodedImage, bool)>,
        fail_next: bool,
    }

    impl MediaLibrary for RecordingLibrary {
        fn list(&self) -> Result<Vec<MediaItem>, MediaError> {
            Ok(vec![])
        }

        fn upload(&mut self, image: &EncodedImage, as_new: bool) -> Result<MediaItem, MediaError> {
            if self.fail_next {
                return Err(MediaError::Request("503".to_string()));
            }
            self.uploads.push((image.clone(), as_new));
            Ok(MediaItem {
                id: self.uploads.len().to_string(),
                title: "edited".to_string(),
                url: "https://cms.example/media/1".to_string(),
                mime: image.mime.as_str().to_string(),
                width: Some(image.width),
                height: Some(image.height),
            })
        }

        fn delete(&mut self, id: &str) -> Result<bool, MediaError> {
            Err(MediaError::NotFound(id.to_string()))
        }
    }

    fn session_100x80() -> EditSession {
        let source = SourceImage::new(100, 80, vec![90u8; 100 * 80 * 3]);
        EditSession::new(source, 1)
    }

    #[test]
    fn test_save_uploads_rendered_output() {
        let mut session = session_100x80();
        session.set_aspect_locked(false);
        session.resize_axis(Axis::Width, 50);
        session.resize_axis(Axis::Height, 40);

        let mut library = RecordingLibrary::default();
        let item = save_to_library(&session, &mut library, MimeType::Jpeg, false).unwrap();

        assert_eq!(library.uploads.len(), 1);
        let (payload, as_new) = &library.uploads[0];
        assert!(!as_new);
        // The payload carries the target dimensions, not the source's.
        assert_eq!((payload.width, payload.height), (50, 40));
        assert_eq!(payload.mime, MimeType::Jpeg);
        assert_eq!(item.width, Some(50));
    }

    #[test]
    fn test_save_as_new_flag_passes_through() {
        let session = session_100x80();
        let mut library = RecordingLibrary::default();
        save_to_library(&session, &mut library, MimeType::Png, true).unwrap();

        assert!(library.uploads[0].1);
        assert_eq!(library.uploads[0].0.mime, MimeType::Png);
    }

    #[test]
    fn test_collaborator_failure_propagates() {
        let session = session_100x80();
        let mut library = RecordingLibrary {
            fail_next: true,
            ..Default::default()
        };

        let result = save_to_library(&session, &mut library, MimeType::Jpeg, false);
        assert!(matches!(result, Err(SaveError::Media(MediaError::Request(_)))));
    }

    #[test]
    fn test_save_does_not_mutate_session() {
        let session = session_100x80();
        let before = session.snapshot();

        let mut library = RecordingLibrary::default();
        save_to_library(&session, &mut library, MimeType::Jpeg, false).unwrap();

        assert_eq!(session.snapshot(), before);
    }
}
