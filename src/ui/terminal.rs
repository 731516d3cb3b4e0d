use super::commands::{Command, COMMAND_BOX};
use crate::models::Result;
use crate::renderer::MarkdownRenderer;
use crate::session::{ChatSession, Entry};
use colored::*;
use rustyline::{config::Configurer, error::ReadlineError, DefaultEditor};
use std::io::{self, Write};
use std::path::PathBuf;
use terminal_size::{terminal_size, Width};

const WELCOME_MESSAGE: &str = "Welcome to Relationship Companion.\n\n\
I'm here to listen and help you think through whatever is on\n\
your mind. Type a message to get started.";

const RESET_PROMPT: &str = "Start a new conversation? This will clear the current chat view.";

pub struct TerminalUI {
    session: ChatSession,
    renderer: MarkdownRenderer,
    editor: DefaultEditor,
    history_file: PathBuf,
}

impl TerminalUI {
    pub fn new(session: ChatSession) -> Result<Self> {
        let width = match terminal_size() {
            Some((Width(w), _)) => w as usize - 2,
            None => 80,
        };

        let mut editor = DefaultEditor::new()?;
        editor.set_max_history_size(100)?;

        let history_file = dirs::home_dir()
            .map(|mut path| {
                path.push(".rc_chat_history");
                path
            })
            .unwrap_or_else(|| ".rc_chat_history".into());

        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(Self {
            session,
            renderer: MarkdownRenderer::new(width),
            editor,
            history_file,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.repaint()?;

        // The prompt only comes back after a submission settles, so
        // requests are strictly serialized through this loop.
        loop {
            let prompt = format!("{}", "> ".blue().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let command = line
                        .parse::<Command>()
                        .unwrap_or_else(|_| Command::Message(line));
                    match command {
                        Command::Exit => {
                            let _ = self.editor.save_history(&self.history_file);
                            break;
                        }
                        Command::Clear => self.repaint()?,
                        Command::New => self.handle_reset()?,
                        Command::Message(input) => {
                            if !input.trim().is_empty() {
                                self.editor.add_history_entry(&input)?;
                                self.handle_message(&input).await?;
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'exit' to quit");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_message(&mut self, input: &str) -> Result<()> {
        print!("{} {}", "AI ›".green().bold(), "● ● ●".dimmed());
        io::stdout().flush()?;

        self.session.submit(input).await;
        self.repaint()?;
        Ok(())
    }

    fn handle_reset(&mut self) -> Result<()> {
        let prompt = format!("{} [y/N] ", RESET_PROMPT.yellow());
        let confirmed = match self.editor.readline(&prompt) {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        };
        if !confirmed {
            return Ok(());
        }

        self.session.reset()?;
        self.repaint()?;
        println!("{}", "Starting a fresh conversation...".green());
        Ok(())
    }

    /// Repaints the whole transcript, newest entry last.
    fn repaint(&self) -> Result<()> {
        clearscreen::clear()?;
        println!("{}", COMMAND_BOX.green());
        println!();

        if self.session.transcript().is_empty() {
            print!("{}", self.renderer.render(WELCOME_MESSAGE).cyan());
            println!("\n");
        }

        for entry in self.session.transcript().entries() {
            self.paint_entry(entry);
        }
        io::stdout().flush()?;
        Ok(())
    }

    fn paint_entry(&self, entry: &Entry) {
        match entry {
            Entry::Message {
                content,
                is_user: true,
                ..
            } => {
                println!("{} {}", "You ›".blue().bold(), content);
                println!();
            }
            Entry::Message {
                content,
                is_markup: true,
                ..
            } => {
                println!("{}", "AI ›".green().bold());
                print!("{}", self.renderer.render(content).cyan());
                println!("\n");
            }
            // Literal assistant text (the fixed error messages).
            Entry::Message { content, .. } => {
                println!("{} {}", "AI ›".green().bold(), content.cyan());
                println!();
            }
            Entry::Loading { .. } => {
                println!("{} {}", "AI ›".green().bold(), "● ● ●".dimmed());
                println!();
            }
        }
    }
}
