//! One-shot "generate" command: create a single design and save it.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::core::image::ImageRef;
use crate::core::session::{Session, SubmitOutcome};
use crate::export::DirectorySaver;

pub const GENERATE_USAGE: &str = "Usage: ispace generate <description…> [--image <path>] [--out <dir>]";

/// Creates one design from `prompt` (and an optional room photo) and writes
/// it into `out_dir`. Returns the saved file's path.
pub async fn run_generate(
    session: &Session,
    prompt: &str,
    image: Option<&Path>,
    out_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let image = image.map(ImageRef::from_file).transpose()?;
    if prompt.trim().is_empty() && image.is_none() {
        return Err(GENERATE_USAGE.into());
    }

    match session.submit_prompt(prompt, image).await {
        SubmitOutcome::Generated(_) => {}
        SubmitOutcome::Failed(err) => return Err(Box::new(err)),
        SubmitOutcome::Ignored => return Err(GENERATE_USAGE.into()),
    }

    let saver = DirectorySaver::new(out_dir);
    session
        .export_current(&saver)?
        .ok_or_else(|| "No design was produced".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GenerationError, GenerationRequest};
    use crate::utils::test_utils::{create_test_session, test_image};
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_generated_design_to_out_dir() {
        let dir = tempdir().unwrap();
        let (session, gateway) = create_test_session();
        gateway.push_image(test_image("office"));

        let path = run_generate(&session, "A minimalist office", None, dir.path())
            .await
            .unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(fs::read(&path).unwrap(), b"office");
    }

    #[tokio::test]
    async fn sends_attached_photo_as_reference() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("before.jpg");
        fs::write(&photo, b"before").unwrap();
        let (session, gateway) = create_test_session();
        gateway.push_image(test_image("after"));

        run_generate(&session, "", Some(&photo), &dir.path().join("out"))
            .await
            .unwrap();

        match &gateway.calls()[0] {
            GenerationRequest::Create { prompt, reference } => {
                assert!(prompt.is_empty());
                let reference = reference.as_ref().expect("reference image");
                assert_eq!(reference.as_data().unwrap().mime(), "image/jpeg");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[tokio::test]
    async fn surfaces_backend_failure() {
        let dir = tempdir().unwrap();
        let (session, gateway) = create_test_session();
        gateway.push_failure(GenerationError::Api {
            status: 400,
            message: "API key not valid".into(),
        });

        let err = run_generate(&session, "A loft", None, dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_request_is_a_usage_error() {
        let dir = tempdir().unwrap();
        let (session, gateway) = create_test_session();
        let err = run_generate(&session, "  ", None, dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERATE_USAGE);
        assert!(gateway.calls().is_empty());
    }
}
