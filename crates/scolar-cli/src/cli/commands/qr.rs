//! QR badge export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use scolar_client::ApiClient;

/// Logs in, fetches the student's QR badge PNG, and writes it to disk.
pub async fn export(
    client: &ApiClient,
    student_id: u64,
    out: Option<PathBuf>,
    username: &str,
    password: &str,
) -> Result<()> {
    let outcome = client.login(username, password).await?;
    if !outcome.is_success() {
        anyhow::bail!("Login rejected (HTTP {}): {}", outcome.code(), outcome.message());
    }

    let bytes = client.student_qr_png(student_id).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(format!("student-{student_id}-qr.png")));
    std::fs::write(&out, &bytes)
        .with_context(|| format!("write QR badge to {}", out.display()))?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}
