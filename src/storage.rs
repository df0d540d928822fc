use crate::dom::Document;
use crate::errors::PageError;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_page(path: &Path) -> Document {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no page snapshot at {}, starting from the tracker page", path.display());
            return Document::tracker_page();
        }
        Err(err) => {
            error!(
                "page snapshot {} is unreadable ({err}), starting from the tracker page",
                path.display()
            );
            return Document::tracker_page();
        }
    };

    match Document::from_snapshot(&bytes) {
        Ok(doc) => doc,
        Err(err) => {
            error!(
                "page snapshot {} is corrupt ({err}), starting from the tracker page",
                path.display()
            );
            Document::tracker_page()
        }
    }
}

pub async fn persist_page(path: &Path, doc: &Document) -> Result<(), PageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let payload = doc.to_snapshot()?;
    fs::write(path, payload).await?;
    Ok(())
}
