//! Line-oriented front end over [`EventsViewModel`].
use crate::util::format_events;
use crate::view_model::EventsViewModel;
use anyhow::{anyhow, Result};
use std::future::Future;
use std::io::BufRead;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const HELP: &str = "\
commands:
  list                  show the current list
  all                   clear the search and reload every event
  search <text>         show events with a band member matching <text>
  delete <id>           delete an event
  rate <id> <0-5>       set an event's star rating
  comment <id> <text>   set an event's comment
  help                  show this help
  quit                  leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    All,
    Search(String),
    Delete(i64),
    Rate { id: i64, stars: i32 },
    Comment { id: i64, text: String },
    Help,
    Quit,
}

/// Fail if any words are left after the command's arguments.
fn no_more<'a>(mut words: impl Iterator<Item = &'a str>, usage: &str) -> Result<()> {
    match words.next() {
        Some(extra) => Err(anyhow!("unexpected argument '{}' (usage: {})", extra, usage)),
        None => Ok(()),
    }
}

fn parse_id(word: Option<&str>) -> Result<i64> {
    let w = word.ok_or_else(|| anyhow!("missing event id"))?;
    w.parse::<i64>().map_err(|_| anyhow!("invalid event id '{}'", w))
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };
        let mut words = rest.split_whitespace();
        let parsed = match cmd.to_ascii_lowercase().as_str() {
            "list" | "ls" => {
                no_more(words, "list")?;
                ShellCommand::List
            }
            "all" => {
                no_more(words, "all")?;
                ShellCommand::All
            }
            "search" => {
                if rest.is_empty() {
                    return Err(anyhow!("usage: search <text>"));
                }
                ShellCommand::Search(rest.to_string())
            }
            "delete" | "rm" => {
                let id = parse_id(words.next())?;
                no_more(words, "delete <id>")?;
                ShellCommand::Delete(id)
            }
            "rate" => {
                let id = parse_id(words.next())?;
                let s = words.next().ok_or_else(|| anyhow!("usage: rate <id> <0-5>"))?;
                let stars = s.parse::<i32>().map_err(|_| anyhow!("invalid star count '{}'", s))?;
                no_more(words, "rate <id> <0-5>")?;
                ShellCommand::Rate { id, stars }
            }
            "comment" => {
                let id = parse_id(words.next())?;
                let text = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, t)| t.trim().to_string())
                    .unwrap_or_default();
                ShellCommand::Comment { id, text }
            }
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(anyhow!("unknown command '{}' (try 'help')", other)),
        };
        Ok(Some(parsed))
    }
}

/// Run one command against the view-model and return the text to show.
pub async fn execute(vm: &mut EventsViewModel, cmd: ShellCommand) -> Result<String> {
    let out = match cmd {
        ShellCommand::List => format_events(vm.events()),
        ShellCommand::All => format_events(vm.show_all().await?),
        ShellCommand::Search(text) => {
            vm.set_search_query(text);
            vm.search().await?;
            format_events(vm.events())
        }
        ShellCommand::Delete(id) => {
            vm.delete_event(id).await?;
            format!("Deleted event {}.\n{}", id, format_events(vm.events()))
        }
        ShellCommand::Rate { id, stars } => {
            vm.update_stars(id, stars).await?;
            format_events(vm.events())
        }
        ShellCommand::Comment { id, text } => {
            vm.update_comment(id, &text).await?;
            format_events(vm.events())
        }
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    };
    Ok(out)
}

/// Read lines from a blocking reader on a dedicated thread.
///
/// The thread is never joined: a read blocked on stdin must not keep the
/// process alive after the session ends. It stops at end of input or once the
/// receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run commands from `lines` until `quit`, end of input or `shutdown` resolves.
/// Command failures are reported to `output` and the session continues.
pub async fn run_shell<W, S>(
    vm: &mut EventsViewModel,
    mut lines: mpsc::Receiver<String>,
    mut output: W,
    shutdown: S,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    output.write_all(format_events(vm.events()).as_bytes()).await?;
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let line = tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!("shell interrupted");
                output.write_all(b"\n").await?;
                break;
            }
            line = lines.recv() => match line {
                Some(l) => l,
                None => break,
            },
        };
        let cmd = match ShellCommand::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                output.write_all(format!("error: {}\n", e).as_bytes()).await?;
                continue;
            }
        };
        if cmd == ShellCommand::Quit {
            break;
        }
        match execute(vm, cmd).await {
            Ok(text) => output.write_all(text.as_bytes()).await?,
            Err(e) => {
                warn!("shell command failed: {:#}", e);
                output.write_all(format!("error: {:#}\n", e).as_bytes()).await?;
            }
        }
    }
    output.flush().await?;
    Ok(())
}
