use super::ImportError;
use crate::config::ImportConfig;
use actix_multipart::Multipart;
use futures_util::StreamExt;
use log::{debug, info, warn};
use md5::Context;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;

/// A CSV upload stored under its MD5 hash.
#[derive(Debug)]
pub(crate) struct StoredUpload {
    pub upload_id: String,
    pub text: String,
}

/// Reads the multipart `file` field, rejecting anything that is not a `.csv`
/// file of valid UTF-8 within the configured size, and stores it as
/// `{md5}.csv` in the upload directory.
pub(crate) async fn receive_csv(mut payload: Multipart, config: &ImportConfig) -> Result<StoredUpload, ImportError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut md5_hasher = Context::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ImportError::Upload(format!("Invalid upload: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_lowercase()))
            .unwrap_or_default();
        if !filename.ends_with(".csv") {
            return Err(ImportError::Upload("The file must end with .csv".to_string()));
        }

        let mut buf = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ImportError::Upload(format!("Invalid upload: {}", e)))?;
            if buf.len() + chunk.len() > config.max_upload_bytes {
                return Err(ImportError::Upload(format!(
                    "The file is larger than {} bytes",
                    config.max_upload_bytes
                )));
            }
            md5_hasher.consume(&chunk);
            buf.extend_from_slice(&chunk);
        }
        bytes = Some(buf);
    }

    let bytes = bytes.ok_or_else(|| ImportError::Upload("Missing file".to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| ImportError::Upload("The file is not valid UTF-8".to_string()))?;
    let upload_id = format!("{:x}", md5_hasher.finalize());

    fs::create_dir_all(&config.upload_dir)?;
    let path = config.upload_dir.join(format!("{}.csv", upload_id));
    if path.exists() {
        debug!("Upload {} already stored", upload_id);
    } else {
        fs::write(&path, &text)?;
        info!("Stored upload {} ({} bytes)", upload_id, text.len());
    }

    Ok(StoredUpload { upload_id, text })
}

fn is_upload_id(upload_id: &str) -> bool {
    upload_id.len() == 32 && upload_id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Location of a stored upload. Ids that are not MD5 hex digests never reach
/// the filesystem.
pub(crate) fn upload_path(config: &ImportConfig, upload_id: &str) -> Result<PathBuf, ImportError> {
    if !is_upload_id(upload_id) {
        return Err(ImportError::UploadNotFound(upload_id.to_string()));
    }
    let path = config.upload_dir.join(format!("{}.csv", upload_id.to_lowercase()));
    if !path.is_file() {
        return Err(ImportError::UploadNotFound(upload_id.to_string()));
    }
    Ok(path)
}

pub(crate) fn read_upload(config: &ImportConfig, upload_id: &str) -> Result<String, ImportError> {
    let path = upload_path(config, upload_id)?;
    Ok(fs::read_to_string(path)?)
}

fn claim_path(config: &ImportConfig, upload_id: &str) -> PathBuf {
    config.upload_dir.join(format!("{}.importing", upload_id.to_lowercase()))
}

/// Marks an upload as being imported. The marker is created with
/// `create_new`, so of two concurrent claims exactly one succeeds.
pub(crate) fn claim_upload(config: &ImportConfig, upload_id: &str) -> Result<(), ImportError> {
    upload_path(config, upload_id)?;
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(claim_path(config, upload_id))
    {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(ImportError::AlreadyImporting(upload_id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Removes the upload and its claim marker once its import has ended,
/// whatever the outcome.
pub(crate) fn release_upload(config: &ImportConfig, upload_id: &str) {
    if !is_upload_id(upload_id) {
        return;
    }
    let csv = config.upload_dir.join(format!("{}.csv", upload_id.to_lowercase()));
    for path in [csv, claim_path(config, upload_id)] {
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Could not remove upload file {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::scratch_config;

    #[test]
    fn only_hex_digests_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let import = &config.import;

        assert!(matches!(
            upload_path(import, "../portal"),
            Err(ImportError::UploadNotFound(_))
        ));

        let id = "0123456789abcdef0123456789abcdef";
        assert!(matches!(upload_path(import, id), Err(ImportError::UploadNotFound(_))));

        fs::create_dir_all(&import.upload_dir).unwrap();
        fs::write(import.upload_dir.join(format!("{}.csv", id)), "a,b\n").unwrap();
        assert_eq!(read_upload(import, id).unwrap(), "a,b\n");
    }

    #[test]
    fn an_upload_can_only_be_claimed_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let import = &config.import;
        let id = "0123456789abcdef0123456789abcdef";
        fs::create_dir_all(&import.upload_dir).unwrap();
        fs::write(import.upload_dir.join(format!("{}.csv", id)), "a,b\n").unwrap();

        claim_upload(import, id).unwrap();
        assert!(matches!(
            claim_upload(import, id),
            Err(ImportError::AlreadyImporting(_))
        ));

        release_upload(import, id);
        assert!(matches!(upload_path(import, id), Err(ImportError::UploadNotFound(_))));
        assert!(!claim_path(import, id).exists());
        // releasing twice is harmless
        release_upload(import, id);
    }
}
