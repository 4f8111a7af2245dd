use super::AppContext;
use crate::models::record::RawPayload;
use anyhow::Context;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Parse an already-decoded payload, skipping acquisition entirely
pub async fn run(ctx: &AppContext, file: &Path, region: Option<&str>) -> anyhow::Result<()> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read payload from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?
    };

    let payload = RawPayload::new(text).context("payload is empty")?;
    let session = ctx.session(region)?;
    session.handle_payload(&payload)?;
    Ok(())
}
