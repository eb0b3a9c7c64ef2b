use elablecrop_core::config::CropConfig;
use elablecrop_core::controller::{CropController, ManualField, SelectedFile};
use elablecrop_core::error::CropError;
use elablecrop_core::render::DocumentRenderer;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::output;

const HELP: &str = "\
Commands:
  choose <path>          select a file (any type)
  drop <path>            select a file, PDF only
  auto                   crop the preset region and download it
  toggle                 show or hide the manual fields
  set <field> <value>    set tlx, tly, brx or bry
  manual                 crop the manual region and display it
  download               save the last cropped region
  status                 show the current state
  help                   show this help
  quit                   leave the session";

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Choose(PathBuf),
    Drop(PathBuf),
    Auto,
    Toggle,
    Set(ManualField, String),
    Manual,
    Download,
    Status,
    Help,
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(config: &CropConfig, input_file: Option<PathBuf>) -> Result<(), CropError> {
    let mut controller = CropController::with_config(config.renderer(), config);
    if let Some(path) = input_file {
        controller.choose_file(SelectedFile::from_path(&path)?);
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    drive(&mut controller, stdin.lock(), io::stdout().lock(), prompt)
}

/// Feed commands from `input` to the controller until `quit` or end of input.
fn drive<R, I, W>(
    controller: &mut CropController<R>,
    input: I,
    mut out: W,
    prompt: bool,
) -> Result<(), CropError>
where
    R: DocumentRenderer,
    I: BufRead,
    W: Write,
{
    if let Some(name) = controller.selected_name() {
        writeln!(out, "Selected: {}", name)?;
    }

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "Error: {}", msg)?;
                continue;
            }
        };

        match execute(controller, command, &mut out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is_user_notice() => writeln!(out, "Notice: {}", e)?,
            Err(e) => {
                log::warn!("command '{}' failed: {}", line.trim(), e);
                writeln!(out, "Error: {}", e)?;
            }
        }
    }

    Ok(())
}

fn execute<R: DocumentRenderer, W: Write>(
    controller: &mut CropController<R>,
    command: SessionCommand,
    out: &mut W,
) -> Result<Flow, CropError> {
    match command {
        SessionCommand::Choose(path) => {
            controller.choose_file(SelectedFile::from_path(&path)?);
            print_selected(controller, out)?;
        }
        SessionCommand::Drop(path) => {
            controller.drop_file(SelectedFile::from_path(&path)?)?;
            print_selected(controller, out)?;
        }
        SessionCommand::Auto => {
            let presented = controller.auto_crop()?;
            writeln!(out, "{}", output::text::format_presented(&presented))?;
        }
        SessionCommand::Toggle => {
            let visible = controller.toggle_manual_fields();
            writeln!(
                out,
                "Manual fields {}",
                if visible { "shown" } else { "hidden" }
            )?;
        }
        SessionCommand::Set(field, value) => {
            writeln!(out, "{} = {:?}", field, value)?;
            controller.set_manual_field(field, value);
        }
        SessionCommand::Manual => {
            let presented = controller.manual_crop()?;
            writeln!(out, "{}", output::text::format_presented(&presented))?;
        }
        SessionCommand::Download => {
            if let Some(path) = controller.download()? {
                writeln!(out, "Downloaded {}", path.display())?;
            }
        }
        SessionCommand::Status => {
            writeln!(out, "{}", output::text::format_status(&controller.status()))?;
        }
        SessionCommand::Help => writeln!(out, "{}", HELP)?,
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_selected<R: DocumentRenderer, W: Write>(
    controller: &CropController<R>,
    out: &mut W,
) -> io::Result<()> {
    if let Some(name) = controller.selected_name() {
        writeln!(out, "Selected: {}", name)?;
    }
    Ok(())
}

/// Blank lines and `#` comments parse to `None`.
fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let path_arg = |name: &str| {
        if rest.is_empty() {
            Err(format!("usage: {} <path>", name))
        } else {
            Ok(PathBuf::from(rest))
        }
    };

    let command = match word.to_lowercase().as_str() {
        "choose" => SessionCommand::Choose(path_arg("choose")?),
        "drop" => SessionCommand::Drop(path_arg("drop")?),
        "auto" => SessionCommand::Auto,
        "toggle" => SessionCommand::Toggle,
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: set <tlx|tly|brx|bry> <value>".into());
            }
            SessionCommand::Set(field.parse()?, value.to_string())
        }
        "manual" => SessionCommand::Manual,
        "download" => SessionCommand::Download,
        "status" => SessionCommand::Status,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    Ok(Some(command))
}
