//! Five-minute read: a random file from the reading folder.

use crate::i18n::t;
use crate::menu::Reply;
use daykeeper_core::{config::ReadingConfig, config::shellexpand, traits::Channel};
use rand::seq::SliceRandom;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of looking for something to read.
#[derive(Debug, PartialEq, Eq)]
pub enum Pick {
    MissingDir,
    Empty,
    File(PathBuf),
}

/// Choose a random file in `dir` whose extension matches, ignoring case.
pub async fn pick(dir: &Path, extension: &str) -> io::Result<Pick> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Pick::MissingDir),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && tokio::fs::metadata(&path).await?.is_file() {
            files.push(path);
        }
    }

    let mut rng = rand::thread_rng();
    Ok(files
        .choose(&mut rng)
        .cloned()
        .map_or(Pick::Empty, Pick::File))
}

/// Send a random file to `target`. Returns a notice when nothing was sent.
pub async fn send_random(
    channel: &dyn Channel,
    target: &str,
    config: &ReadingConfig,
    lang: &str,
) -> Option<Reply> {
    let dir = PathBuf::from(shellexpand(&config.dir));
    let path = match pick(&dir, &config.extension).await {
        Ok(Pick::File(path)) => path,
        Ok(Pick::MissingDir) => {
            return Some(Reply::with_menu(t("reading_dir_missing", lang), lang));
        }
        Ok(Pick::Empty) => return Some(Reply::with_menu(t("reading_empty", lang), lang)),
        Err(e) => {
            error!("reading: cannot list {}: {e}", dir.display());
            return Some(Reply::with_menu(t("reading_failed", lang), lang));
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("reading.{}", config.extension));

    let payload = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("reading: cannot read {}: {e}", path.display());
            return Some(Reply::with_menu(t("reading_failed", lang), lang));
        }
    };

    match channel.send_document(target, payload, &filename).await {
        Ok(()) => {
            info!("{target}: sent reading {filename}");
            None
        }
        Err(e) => {
            error!("{target}: failed to send reading {filename}: {e}");
            Some(Reply::with_menu(t("reading_failed", lang), lang))
        }
    }
}
