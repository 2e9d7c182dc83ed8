use anyhow::Result;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::session::{Finder, View};
use crate::words::LookupMode;

pub const HELP_TEXT: &str = "\
Commands:
  <word>              show words that rhyme with <word>
  rhymes <word>       same as above (alias: r)
  synonyms <word>     show words with a similar meaning (alias: s)
  save <n>            save item n of the current list
  save <word>         save any word
  saved               show saved words
  help                show this help
  quit                leave (alias: exit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup { word: String, mode: LookupMode },
    SaveItem(usize),
    SaveWord(String),
    Saved,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("nothing entered")]
    Empty,
    #[error("`{0}` needs an argument")]
    MissingArgument(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseCommandError::Empty);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let needs_arg = |name: &str| -> Result<String, ParseCommandError> {
            if rest.is_empty() {
                Err(ParseCommandError::MissingArgument(name.to_string()))
            } else {
                Ok(rest.to_string())
            }
        };

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "saved" => Ok(Command::Saved),
            "save" => {
                let arg = needs_arg("save")?;
                Ok(match arg.parse::<usize>() {
                    Ok(position) => Command::SaveItem(position),
                    Err(_) => Command::SaveWord(arg),
                })
            }
            "rhymes" | "rhyme" | "r" => Ok(Command::Lookup {
                word: needs_arg(head)?,
                mode: LookupMode::Rhymes,
            }),
            "synonyms" | "synonym" | "s" => Ok(Command::Lookup {
                word: needs_arg(head)?,
                mode: LookupMode::Synonyms,
            }),
            // A bare entry behaves like pressing Enter in the input box
            _ => Ok(Command::Lookup {
                word: line.to_string(),
                mode: LookupMode::Rhymes,
            }),
        }
    }
}

/// Text block for a view: description line, then the list
pub fn render_view(view: &View) -> String {
    let mut out = String::new();
    out.push_str(&view.description);
    out.push('\n');
    out.push_str(&view.display.to_string());
    out
}

/// Apply one command to the finder. Returns the text to print, or `None` to quit.
pub async fn execute(finder: &mut Finder, command: Command) -> Option<String> {
    let output = match command {
        Command::Quit => return None,
        Command::Help => HELP_TEXT.to_string(),
        Command::Saved => format!("Saved words: {}", finder.saved().joined()),
        Command::Lookup { word, mode } => {
            println!("{}", crate::display::loading_description());
            match finder.show(&word, mode).await {
                Ok(view) => render_view(view),
                Err(e) => format!("❌ {}", e),
            }
        }
        Command::SaveItem(position) => match finder.save_item(position) {
            Ok(saved) => format!("Saved words: {}", saved.joined()),
            Err(e) => format!("❌ {}", e),
        },
        Command::SaveWord(word) => match finder.save(&word) {
            Ok(saved) => format!("Saved words: {}", saved.joined()),
            Err(e) => format!("❌ {}", e),
        },
    };
    Some(output)
}

/// Interactive loop over stdin until `quit` or end of input
pub async fn run(mut finder: Finder) -> Result<()> {
    println!("🎵 Rhyme Finder - type a word, or `help`\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseCommandError::Empty) => continue,
            Err(e) => {
                println!("❌ {}", e);
                continue;
            }
        };

        match execute(&mut finder, command).await {
            Some(output) => println!("{}", output),
            None => break,
        }
    }

    tracing::debug!(saved = finder.saved().len(), "session ended");
    Ok(())
}
