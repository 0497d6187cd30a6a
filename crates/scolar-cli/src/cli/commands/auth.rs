//! Auth command handlers.
//!
//! Sessions live in process memory only, so `scolar login` is a
//! credential check: it reports whether the API accepts the pair (and
//! completes a first login when asked), then exits.

use anyhow::Result;
use scolar_client::ApiClient;

pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
    new_password: Option<&str>,
) -> Result<()> {
    let outcome = match new_password {
        Some(new_password) => client.first_login(username, password, new_password).await?,
        None => client.login(username, password).await?,
    };

    if outcome.is_success() {
        println!("Credentials accepted for {username}.");
        Ok(())
    } else {
        anyhow::bail!("Login rejected (HTTP {}): {}", outcome.code(), outcome.message())
    }
}
