use crate::{infrastructure::ServiceProvider, render};

pub async fn agents(provider: &ServiceProvider) -> anyhow::Result<()> {
    let agents = provider.transcriber.agents().await?;
    print!("{}", render::agents(&agents));
    Ok(())
}

pub async fn agent(provider: &ServiceProvider, name: &str) -> anyhow::Result<()> {
    let detail = provider.transcriber.agent(name).await?;
    print!("{}", render::agent(&detail));
    Ok(())
}

pub async fn transcript(provider: &ServiceProvider, id: &str) -> anyhow::Result<()> {
    let record = provider.transcriber.transcript(id).await?;
    print!("{}", render::transcript(&record));
    Ok(())
}
