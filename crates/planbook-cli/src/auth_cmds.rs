//! Handlers for `planbook login`, `planbook logout` and `planbook settings`.

use anyhow::Result;

use planbook_core::{Session, SessionError};

use crate::config;

pub async fn cmd_login(
    session: &mut Session,
    email: &str,
    name: &str,
    school: Option<&str>,
) -> Result<()> {
    if email.trim().is_empty() || name.trim().is_empty() {
        anyhow::bail!("--email and --name must not be empty");
    }
    let user = session.sign_in(email, name, school).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn cmd_logout(session: &mut Session) -> Result<()> {
    let was_signed_in = session.user().is_some();
    session.sign_out().await?;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

/// Print the read-only profile view.
pub fn cmd_settings(session: &mut Session) -> Result<()> {
    let data_dir = session.store().data_dir().to_path_buf();
    let user = match session.show_settings() {
        Ok(user) => user,
        Err(SessionError::NotSignedIn) => {
            anyhow::bail!("not signed in; run `planbook login --email <email> --name <name>` first")
        }
        Err(e) => return Err(e.into()),
    };

    println!("Profile");
    println!("  Name:    {}", user.name);
    println!("  Email:   {}", user.email);
    println!("  School:  {}", user.school.as_deref().unwrap_or("-"));
    println!();
    println!("Storage");
    println!("  Data:    {}", data_dir.display());
    println!("  Config:  {}", config::config_path().display());
    Ok(())
}
