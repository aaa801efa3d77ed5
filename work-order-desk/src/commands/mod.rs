mod browse;
mod session;
mod transcriber;
mod work_order;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{args::Command, infrastructure::ServiceProvider};

pub async fn run(provider: &ServiceProvider, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login {
            token,
            refresh_token,
            username,
        } => session::login(provider, token, refresh_token, username).await,
        Command::Logout => session::logout(provider).await,
        Command::Whoami => session::whoami(provider).await,
        Command::List(args) => work_order::list(provider, args).await,
        Command::Browse(filters) => browse::run(provider, filters).await,
        Command::Get { id } => work_order::get(provider, &id).await,
        Command::Find { number } => work_order::find(provider, &number).await,
        Command::Create { number, draft } => work_order::create(provider, number, draft).await,
        Command::Update { id, draft } => work_order::update(provider, &id, draft).await,
        Command::Status {
            id,
            status,
            job_status,
        } => work_order::status(provider, id, status, job_status).await,
        Command::Delete { id, yes } => work_order::delete(provider, &id, yes).await,
        Command::BulkUpdate(args) => work_order::bulk_update(provider, args).await,
        Command::History { id } => work_order::history(provider, &id).await,
        Command::Stats => work_order::stats(provider).await,
        Command::Export(args) => work_order::export(provider, args).await,
        Command::Agents => transcriber::agents(provider).await,
        Command::Agent { name } => transcriber::agent(provider, &name).await,
        Command::Transcript { id } => transcriber::transcript(provider, &id).await,
    }
}

/// Ask a yes/no question on the terminal; anything but `y`/`yes` is a no.
async fn confirm(question: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{question} [y/N] ").as_bytes()).await?;
    stdout.flush().await?;
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
