use anyhow::Result;
use rc_chat::client::ChatClient;
use rc_chat::config::Config;
use rc_chat::identity::IdentityStore;
use rc_chat::session::ChatSession;
use rc_chat::ui::TerminalUI;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so they never land in the transcript paint.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let client = ChatClient::new(&config);
    let store = IdentityStore::open();
    let session = ChatSession::start(client, store)?;

    let mut ui = TerminalUI::new(session)?;
    ui.run().await?;

    Ok(())
}
