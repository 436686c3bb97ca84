use std::env;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use crossterm::cursor::{MoveTo, SetCursorStyle};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event as TermEvent, KeyCode, KeyEventKind,
    KeyModifiers,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthChar;

use vims::config::{self, CursorStyle};
use vims::host::SharedStatus;
use vims::input::key_token;
use vims::{Dispatcher, Editor, MemoryEditor, Position, Selection};

fn print_version() {
    println!("vims {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("vims - A modal, chord-based editing engine");
    eprintln!();
    eprintln!("Usage: vims [OPTIONS] [KEYS...]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [KEYS...]            Key tokens to run, e.g. `c w X Y Z escape`");
    eprintln!("                       Without keys an interactive session starts");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help           Print this help message");
    eprintln!("  -V, --version        Print version information");
    eprintln!("      --config PATH    Read configuration from PATH");
    eprintln!("      --text TEXT      Start with TEXT in the buffer");
    eprintln!("      --file PATH      Start with the contents of PATH (Ctrl+S saves)");
    eprintln!("      --cursor L:C     Place the cursor at line L, column C (1-based)");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  VIMS_LOG             Log filter, e.g. `vims=debug`");
    eprintln!("  VIMS_CONFIG_DIR      Directory holding config.toml");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  vims --text 'hello world' d w");
    eprintln!("  vims --text 'one two' --cursor 1:5 c w X Y Z escape");
    eprintln!("  vims --file notes.txt");
}

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    text: Option<String>,
    file: Option<PathBuf>,
    cursor: Option<Position>,
    keys: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value_of(arg, &mut iter)?)),
            "--text" => options.text = Some(value_of(arg, &mut iter)?),
            "--file" => options.file = Some(PathBuf::from(value_of(arg, &mut iter)?)),
            "--cursor" => options.cursor = Some(parse_cursor(&value_of(arg, &mut iter)?)?),
            "--" => options.keys.extend(iter.by_ref().cloned()),
            other => options.keys.push(other.to_string()),
        }
    }
    if options.text.is_some() && options.file.is_some() {
        bail!("--text and --file cannot be used together");
    }
    Ok(options)
}

fn value_of(name: &str, iter: &mut std::slice::Iter<'_, String>) -> Result<String> {
    iter.next()
        .cloned()
        .with_context(|| format!("{} needs a value", name))
}

fn parse_cursor(s: &str) -> Result<Position> {
    let (line, column) = s
        .split_once(':')
        .with_context(|| format!("invalid cursor `{}`, expected LINE:COL", s))?;
    let line: usize = line.trim().parse().context("invalid cursor line")?;
    let column: usize = column.trim().parse().context("invalid cursor column")?;
    Ok(Position::new(line.saturating_sub(1), column.saturating_sub(1)))
}

fn init_logging(interactive: bool) {
    // Logs would draw over the screen of an interactive session.
    let fallback = if interactive { "off" } else { "warn" };
    let filter = EnvFilter::try_from_env("VIMS_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    let options = parse_args(&args)?;
    let interactive = options.keys.is_empty();
    init_logging(interactive);

    let cfg = match &options.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {:#}", e);
            config::Config::default()
        }),
    };

    let text = match (&options.text, &options.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) if path.exists() => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => String::new(),
    };
    let mut editor = MemoryEditor::new(&text);
    if let Some(cursor) = options.cursor {
        editor.set_selections(vec![Selection::cursor(cursor)]);
    }

    let rt = Builder::new_current_thread()
        .build()
        .context("failed to initialize tokio runtime")?;
    let status = SharedStatus::new();
    let mut dispatcher = Dispatcher::new(editor, cfg).with_status(status.clone());
    rt.block_on(dispatcher.start());

    if interactive {
        run_interactive(&rt, dispatcher, &status, options.file)
    } else {
        run_script(&rt, dispatcher, &options.keys)
    }
}

/// Runs the key tokens given on the command line and prints the result.
fn run_script(rt: &Runtime, mut dispatcher: Dispatcher<MemoryEditor>, keys: &[String]) -> Result<()> {
    let tokens: Vec<String> = keys
        .iter()
        .flat_map(|k| vims_chord::tokenize(k))
        .collect();
    rt.block_on(async {
        for token in &tokens {
            dispatcher.input(token).await;
        }
        dispatcher.commit_input().await;
    });

    println!("{}", dispatcher.editor().to_marked());
    println!("mode: {}", dispatcher.mode().as_str());
    Ok(())
}

struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetCursorStyle::DefaultUserShape,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

fn run_interactive(
    rt: &Runtime,
    mut dispatcher: Dispatcher<MemoryEditor>,
    status: &SharedStatus,
    file: Option<PathBuf>,
) -> Result<()> {
    let mut guard = TerminalGuard::new()
        .context("failed to initialize terminal; are you running in a real TTY?")?;
    let mut top = 0;
    let mut message = String::new();

    loop {
        draw(&mut guard.stdout, &dispatcher, status, &mut top, &message)?;
        match event::read()? {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Char('q') if ctrl => break,
                    KeyCode::Char('s') if ctrl => {
                        message = match &file {
                            Some(path) => match std::fs::write(path, dispatcher.editor().text()) {
                                Ok(()) => format!("written {}", path.display()),
                                Err(e) => format!("write failed: {}", e),
                            },
                            None => "no file to write; start with --file".to_string(),
                        };
                    }
                    _ => {
                        if let Some(token) = key_token(&key) {
                            message.clear();
                            rt.block_on(dispatcher.input(&token));
                        }
                    }
                }
            }
            TermEvent::Paste(text) => {
                rt.block_on(dispatcher.type_text(&text));
            }
            _ => {}
        }
    }
    Ok(())
}

fn draw(
    out: &mut Stdout,
    dispatcher: &Dispatcher<MemoryEditor>,
    status: &SharedStatus,
    top: &mut usize,
    message: &str,
) -> Result<()> {
    let (width, height) = terminal::size()?;
    let rows = usize::from(height.saturating_sub(1)).max(1);
    let editor = dispatcher.editor();
    let cursor = editor
        .selections()
        .first()
        .map(|s| s.active)
        .unwrap_or_default();

    if cursor.line < *top {
        *top = cursor.line;
    } else if cursor.line >= *top + rows {
        *top = cursor.line + 1 - rows;
    }

    queue!(out, Clear(ClearType::All))?;
    for row in 0..rows {
        let line = *top + row;
        if line >= editor.line_count() {
            break;
        }
        let text = clip(&editor.line_text(line), usize::from(width));
        queue!(out, MoveTo(0, row as u16), Print(text))?;
    }

    let state = status.snapshot();
    let bar = if message.is_empty() {
        state.hint.clone()
    } else {
        format!("{}  {}", state.hint, message)
    };
    queue!(
        out,
        MoveTo(0, height.saturating_sub(1)),
        SetAttribute(Attribute::Reverse),
        Print(clip(&bar, usize::from(width))),
        SetAttribute(Attribute::Reset)
    )?;

    let column: usize = editor
        .line_text(cursor.line)
        .chars()
        .take(cursor.character)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    queue!(
        out,
        cursor_shape(state.cursor_style),
        MoveTo(column as u16, (cursor.line - *top) as u16)
    )?;
    out.flush()?;
    Ok(())
}

fn clip(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

fn cursor_shape(style: CursorStyle) -> SetCursorStyle {
    match style {
        CursorStyle::Block | CursorStyle::BlockOutline => SetCursorStyle::SteadyBlock,
        CursorStyle::Line | CursorStyle::LineThin => SetCursorStyle::SteadyBar,
        CursorStyle::Underline | CursorStyle::UnderlineThin => SetCursorStyle::SteadyUnderScore,
    }
}
