use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use steply_tabular::app::{App, ExitReason};
use steply_tabular::tabular::EditorOptions;
use steply_tabular::terminal::Terminal;
use steply_tabular::{Document, DocumentEditor, DocumentMode, Schema};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "steply-tabular",
    about = "Edit a JSON document as schema-driven tables"
)]
struct Cli {
    /// Schema file (`.json`, anything else is read as YAML)
    #[arg(long)]
    schema: PathBuf,
    /// JSON document to edit; starts empty when omitted
    #[arg(long)]
    data: Option<PathBuf>,
    /// Root editor; defaults to the shape of the data, else array
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Where the document is written on save (stdout by default)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Log file; nothing is logged without it
    #[arg(long)]
    log: Option<PathBuf>,
    /// Extra class carried on the root editor
    #[arg(long)]
    class_name: Option<String>,
    /// Leading icon for every row
    #[arg(long)]
    icon: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Object,
    Array,
}

impl From<Mode> for DocumentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Object => DocumentMode::Object,
            Mode::Array => DocumentMode::Array,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let schema = Schema::from_path(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    let document = load_document(cli.data.as_deref(), cli.mode.map(DocumentMode::from))?;
    tracing::info!(
        fields = schema.len(),
        mode = ?document.mode(),
        "editor starting"
    );

    let mut options = EditorOptions {
        class_name: cli.class_name.clone(),
        icon: None,
    };
    if let Some(icon) = cli.icon.clone() {
        options.icon = Some(Arc::new(move || icon.clone()));
    }
    let label = cli
        .data
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let editor = DocumentEditor::new("document", label, schema, document).with_options(options);
    let mut app = App::new(editor);

    let mut terminal = Terminal::new().context("opening terminal")?;
    terminal.enter().context("entering raw mode")?;
    let result = app.run(&mut terminal);
    terminal.exit().context("restoring terminal")?;
    let reason = result.context("event loop failed")?;

    if reason == ExitReason::Save {
        write_output(&app.editor().to_json(), cli.output.as_deref())?;
    }
    tracing::info!(?reason, "editor closed");
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_document(path: Option<&Path>, mode: Option<DocumentMode>) -> Result<Document> {
    let Some(path) = path else {
        return Ok(Document::empty(mode.unwrap_or(DocumentMode::Array)));
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading data {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing data {}", path.display()))?;
    let document = Document::from_json(json, mode)
        .with_context(|| format!("data {} does not fit the editor", path.display()))?;
    Ok(document)
}

fn write_output(json: &serde_json::Value, path: Option<&Path>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(json).context("serializing document")?;
    text.push('\n');
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?
        }
        None => io::stdout()
            .write_all(text.as_bytes())
            .context("writing document to stdout")?,
    }
    Ok(())
}
