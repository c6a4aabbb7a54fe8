//! Loading and committing the profile document

use skillify_core::{ErrorContext, MissingDocumentPolicy, SkillifyError, SkillifyResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// The profile document as read from disk (or created from the default)
#[derive(Debug, Clone)]
pub struct ProfileDocument {
    path: PathBuf,
    content: String,
    created: bool,
}

impl ProfileDocument {
    /// Read the document at `path`. A missing file either fails or yields
    /// `default_text`, depending on `policy`. Nothing is written here.
    pub async fn load(
        path: impl AsRef<Path>,
        policy: MissingDocumentPolicy,
        default_text: &str,
    ) -> SkillifyResult<Self> {
        let path = path.as_ref().to_path_buf();

        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "Loaded profile document");
                Ok(Self {
                    path,
                    content,
                    created: false,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => match policy {
                MissingDocumentPolicy::Fail => Err(SkillifyError::DocumentState {
                    path: path.display().to_string(),
                    message: "document does not exist".to_string(),
                    context: ErrorContext::new("profile_document")
                        .with_operation("load")
                        .with_suggestion(
                            "Create the file or set profile.missing_document = \"create_default\"",
                        ),
                }),
                MissingDocumentPolicy::CreateDefault => {
                    info!(path = %path.display(), "Profile document missing, starting from default");
                    Ok(Self {
                        path,
                        content: default_text.to_string(),
                        created: true,
                    })
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the document did not exist on disk when loaded
    pub fn is_new(&self) -> bool {
        self.created
    }

    /// Replace the document on disk with `new_content`.
    ///
    /// The text is written to a temporary file next to the target and then
    /// renamed over it, so readers never see a partial document.
    pub async fn commit(&mut self, new_content: String) -> SkillifyResult<()> {
        let path = self.path.clone();
        let content = new_content.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &content))
            .await
            .map_err(|err| SkillifyError::Io(std::io::Error::other(err)))??;

        info!(path = %self.path.display(), bytes = new_content.len(), "Profile document written");
        self.content = new_content;
        self.created = false;
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &str) -> SkillifyResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;

    // temp files are created owner-only
    let permissions = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }

    file.persist(path).map_err(|err| SkillifyError::Io(err.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}
