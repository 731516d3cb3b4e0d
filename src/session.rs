use crate::client::ChatClient;
use crate::identity::{Identity, IdentityStore};
use crate::models::{Error, Result};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

/// Shown when the server reports an application-level error. The detail is
/// never surfaced to the user.
pub const TROUBLE_MESSAGE: &str = "I'm having trouble connecting right now.";
/// Shown when the request never completed.
pub const NETWORK_ERROR_MESSAGE: &str = "Network connection error. Please try again.";

/// One entry of the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A chat bubble. `is_markup` is true only for trusted server replies,
    /// which are rendered as markdown at display time; everything else is
    /// literal text.
    Message {
        content: String,
        is_user: bool,
        is_markup: bool,
    },
    /// Placeholder shown while a request is outstanding, keyed by a
    /// timestamp-derived id.
    Loading { id: String },
}

/// Append-only view state of the conversation. Entries are never reordered;
/// the loading placeholder is the only entry that is ever removed.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Literal text path. Content is displayed verbatim, never interpreted
    /// as markup.
    pub fn push_text(&mut self, content: impl Into<String>, is_user: bool) {
        self.entries.push(Entry::Message {
            content: content.into(),
            is_user,
            is_markup: false,
        });
    }

    /// Trusted markup path, assistant replies only. Kept separate from
    /// `push_text` so the trust boundary stays visible.
    pub fn push_markup(&mut self, content: impl Into<String>) {
        self.entries.push(Entry::Message {
            content: content.into(),
            is_user: false,
            is_markup: true,
        });
    }

    fn begin_loading(&mut self, id: String) {
        self.entries.push(Entry::Loading { id });
    }

    fn end_loading(&mut self, id: &str) {
        self.entries
            .retain(|entry| !matches!(entry, Entry::Loading { id: entry_id } if entry_id == id));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// What a submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    /// A request was already outstanding; nothing happened.
    Busy,
    /// The server replied and the answer is on the transcript.
    Replied,
    /// The request failed; a fixed error message is on the transcript.
    Failed,
}

/// The request/response lifecycle and its transient state: identity, the
/// conversation view, and the at-most-one pending request.
pub struct ChatSession {
    client: ChatClient,
    store: IdentityStore,
    identity: Identity,
    transcript: Transcript,
    pending: Option<String>,
}

impl ChatSession {
    pub fn start(client: ChatClient, store: IdentityStore) -> Result<Self> {
        let identity = store.bootstrap()?;
        Ok(Self {
            client,
            store,
            identity,
            transcript: Transcript::default(),
            pending: None,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True while a request is outstanding. Input controls stay disabled
    /// for that window.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The submit cycle: trim, guard, append the user bubble and a loading
    /// placeholder, await the one request, then settle the transcript.
    pub async fn submit(&mut self, input: &str) -> Outcome {
        let text = input.trim();
        if text.is_empty() {
            return Outcome::Ignored;
        }
        if self.pending.is_some() {
            return Outcome::Busy;
        }

        self.transcript.push_text(text, true);

        let loading_id = loading_id();
        self.transcript.begin_loading(loading_id.clone());
        self.pending = Some(loading_id.clone());

        let result = self.client.send_message(text, &self.identity).await;

        self.transcript.end_loading(&loading_id);
        self.pending = None;

        match result {
            Ok(reply) => {
                self.transcript.push_markup(reply);
                Outcome::Replied
            }
            Err(Error::Server(_)) => {
                self.transcript.push_text(TROUBLE_MESSAGE, false);
                Outcome::Failed
            }
            Err(err) => {
                error!(error = %err, "chat request failed");
                self.transcript.push_text(NETWORK_ERROR_MESSAGE, false);
                Outcome::Failed
            }
        }
    }

    /// Drops the session identity and all view state. The user identity
    /// persists across resets.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear_session()?;
        self.identity = self.store.bootstrap()?;
        self.transcript.clear();
        self.pending = None;
        Ok(())
    }
}

fn loading_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("loading-{millis}")
}
