//! Console command parsing. Each input line becomes zero or more `Msg`s.

use std::path::PathBuf;

use pdfchat_core::{ActiveView, AppViewModel, Msg, Route};

pub const UPLOAD_FIRST: &str = "Upload documents first";

pub const HELP_TEXT: &str = "\
Commands:
  files <path>...   choose PDFs for the next upload
  upload            upload the chosen files
  chat | home       switch between the chat and upload views
  ask <question>    ask about the uploaded documents
  select <name|#n>  show a document from the catalog
  cite <n>          open the n-th citation shown in the chat log
  next | prev       step one page
  page <n>          jump to a page
  help              show this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Files(Vec<PathBuf>),
    Upload,
    Navigate(Route),
    Ask(String),
    Select(String),
    Cite(String),
    Step(i32),
    Page(String),
    Help,
    Quit,
}

/// What the main loop should do with a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "files" => Command::Files(rest.split_whitespace().map(PathBuf::from).collect()),
        "upload" => Command::Upload,
        "chat" => Command::Navigate(Route::Chat),
        "home" => Command::Navigate(Route::Upload),
        "ask" => Command::Ask(rest.to_string()),
        "select" if !rest.is_empty() => Command::Select(rest.to_string()),
        "cite" if !rest.is_empty() => Command::Cite(rest.to_string()),
        "next" => Command::Step(1),
        "prev" => Command::Step(-1),
        "page" => Command::Page(rest.to_string()),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "select" | "cite" => return Err(format!("'{word}' needs an argument")),
        "" => return Err("Empty command; type 'help'".to_string()),
        other => return Err(format!("Unknown command '{other}'; type 'help'")),
    };
    Ok(command)
}

impl Command {
    /// Commands that drive the chat or the viewer.
    fn needs_conversation(&self) -> bool {
        matches!(
            self,
            Command::Ask(_)
                | Command::Select(_)
                | Command::Cite(_)
                | Command::Step(_)
                | Command::Page(_)
        )
    }
}

/// Resolves indices against what the user currently sees. Chat and viewer
/// commands are refused until the conversation view is showing.
pub fn resolve(command: Command, view: &AppViewModel) -> Result<Action, String> {
    if command.needs_conversation() && view.active_view != ActiveView::Conversation {
        return Err(UPLOAD_FIRST.to_string());
    }
    let msgs = match command {
        Command::Files(paths) => vec![Msg::FilesSelected(paths)],
        Command::Upload => vec![Msg::UploadClicked],
        Command::Navigate(route) => vec![Msg::NavigateTo(route)],
        Command::Ask(question) => vec![Msg::QuestionChanged(question), Msg::QuestionSubmitted],
        Command::Select(target) => vec![Msg::DocumentSelected(select_target(&target, view)?)],
        Command::Cite(index) => {
            let n = parse_index(&index)?;
            let citation = view
                .chat
                .citations()
                .nth(n - 1)
                .cloned()
                .ok_or_else(|| format!("No citation [{n}]"))?;
            vec![Msg::CitationClicked(citation)]
        }
        Command::Step(offset) => vec![Msg::PageStepped(offset)],
        Command::Page(text) => vec![Msg::PageInput(text)],
        Command::Help => return Ok(Action::Help),
        Command::Quit => return Ok(Action::Quit),
    };
    Ok(Action::Dispatch(msgs))
}

fn select_target(target: &str, view: &AppViewModel) -> Result<String, String> {
    match target.strip_prefix('#') {
        Some(index) => {
            let n = parse_index(index)?;
            view.viewer
                .catalog
                .get(n - 1)
                .cloned()
                .ok_or_else(|| format!("No document #{n} in the catalog"))
        }
        None => Ok(target.to_string()),
    }
}

fn parse_index(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{text}' is not a positive number")),
    }
}
