use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Local;
use wellness_core::resources::{
    crisis_alert_text, disclaimer_text, resources_text, CRISIS_ALERT_ACK, FOOTER,
    NOT_MEDICAL_ADVICE,
};
use wellness_core::{reduce, Action, AppState, Effect, ResponseResolver};
use wellness_schema::MoodLevel;

const HELP: &str = "Commands: /mood <1-5>, /insight, /resources, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Empty,
    Mood(MoodLevel),
    Insight,
    Resources,
    Message(String),
}

pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    match line {
        "" => return Ok(ReplCommand::Empty),
        "quit" | "exit" => return Ok(ReplCommand::Quit),
        "/insight" => return Ok(ReplCommand::Insight),
        "/resources" => return Ok(ReplCommand::Resources),
        _ => {}
    }

    if let Some(arg) = line.strip_prefix("/mood") {
        let value: u8 = arg
            .trim()
            .parse()
            .map_err(|_| "Usage: /mood <1-5>".to_string())?;
        let mood = MoodLevel::try_from(value).map_err(|e| e.to_string())?;
        return Ok(ReplCommand::Mood(mood));
    }
    if line.starts_with('/') {
        return Err(format!("Unknown command. {HELP}"));
    }
    Ok(ReplCommand::Message(line.to_string()))
}

struct Session<R, W> {
    input: R,
    out: W,
    state: AppState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let state = std::mem::take(&mut self.state);
        let (next, effect) = reduce(state, action);
        self.state = next;
        effect
    }

    /// `None` on end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn acknowledge_crisis(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", crisis_alert_text())?;
        write!(self.out, "[Enter] {CRISIS_ALERT_ACK} ")?;
        self.out.flush()?;
        self.read_line()?;
        self.dispatch(Action::DismissCrisisAlert);
        Ok(())
    }
}

/// Line REPL over the same reducer the terminal UI uses.
pub async fn run_repl<R: BufRead, W: Write>(
    resolver: &ResponseResolver,
    assistant_name: &str,
    input: R,
    out: W,
) -> Result<()> {
    let mut session = Session {
        input,
        out,
        state: AppState::new(),
    };

    writeln!(session.out, "{}", disclaimer_text())?;
    write!(session.out, "Press Enter to acknowledge and continue. ")?;
    session.out.flush()?;
    if session.read_line()?.is_none() {
        return Ok(());
    }
    session.dispatch(Action::AcknowledgeDisclaimer);

    writeln!(session.out, "\nWellness Companion REPL. Type 'quit' to exit.")?;
    writeln!(session.out, "{NOT_MEDICAL_ADVICE}")?;
    writeln!(session.out, "{HELP}")?;
    if !resolver.is_online() {
        writeln!(session.out, "(offline mode: no API key configured)")?;
    }
    writeln!(session.out, "---")?;

    loop {
        write!(session.out, "> ")?;
        session.out.flush()?;
        let Some(line) = session.read_line()? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(session.out, "{message}")?;
                continue;
            }
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Insight => {
                writeln!(session.out, "{}", session.state.insight())?;
            }
            ReplCommand::Resources => {
                writeln!(session.out, "{}", resources_text())?;
                writeln!(session.out, "{FOOTER}")?;
            }
            ReplCommand::Mood(mood) => {
                session.dispatch(Action::LogMood {
                    mood,
                    at: Local::now(),
                });
                if let Some(notice) = session.state.messages.last() {
                    writeln!(session.out, "{} {}", mood.emoji(), notice.text)?;
                }
            }
            ReplCommand::Message(text) => {
                let Some(Effect::RequestReply(text)) = session.dispatch(Action::Submit(text))
                else {
                    continue;
                };

                let pending = {
                    let resolver = resolver.clone();
                    tokio::spawn(async move { resolver.resolve(&text).await })
                };
                if session.state.crisis_alert {
                    session.acknowledge_crisis()?;
                }

                let reply = pending.await?;
                session.dispatch(Action::ReplyReceived(reply.text.clone()));
                writeln!(session.out, "{assistant_name}: {}", reply.text)?;
            }
        }
    }

    Ok(())
}
