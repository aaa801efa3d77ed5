use colored::Colorize;
use domain_session::model::entity::{Session, SessionUser};

use crate::{infrastructure::ServiceProvider, render};

pub async fn login(
    provider: &ServiceProvider,
    token: String,
    refresh_token: Option<String>,
    username: Option<String>,
) -> anyhow::Result<()> {
    let session = provider
        .session
        .login(Session {
            access_token: Some(token.trim().to_owned()),
            refresh_token,
            otp_token: None,
            user: username.map(|username| SessionUser {
                id: None,
                username,
                role: None,
            }),
        })
        .await?;
    provider.cache.clear();
    println!("{}", render::session(&session));
    Ok(())
}

pub async fn logout(provider: &ServiceProvider) -> anyhow::Result<()> {
    let was_active = provider.session.is_active().await;
    provider.session.logout(provider.gateway.as_ref()).await?;
    provider.cache.clear();
    if was_active {
        println!("{}", "Logged out.".green());
    } else {
        println!("{}", "No active session.".dimmed());
    }
    Ok(())
}

pub async fn whoami(provider: &ServiceProvider) -> anyhow::Result<()> {
    println!("{}", render::session(&provider.session.snapshot().await));
    Ok(())
}
