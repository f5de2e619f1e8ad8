//! Reads markdown on stdin and writes HTML (or the parsed tree as JSON) to stdout.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use marktree::{HtmlRenderer, Parser, ParserSettings};

#[derive(clap::Parser)]
#[command(name = "marktree", version, about)]
struct Cli {
    /// Treat `~~text~~` as strikethrough.
    #[arg(long)]
    strikethrough: bool,

    /// Load parser settings from a JSON file.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Print the document tree as JSON instead of HTML.
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> Result<String, String> {
    let mut settings = match &cli.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            ParserSettings::from_json(&json).map_err(|err| err.to_string())?
        }
        None => ParserSettings::default(),
    };
    if cli.strikethrough {
        settings = settings.strikethrough_tilde(true);
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| format!("failed to read stdin: {err}"))?;

    let document = Parser::with_settings(settings)
        .parse(&input)
        .map_err(|err| err.to_string())?;
    if cli.json {
        serde_json::to_string_pretty(&document).map_err(|err| err.to_string())
    } else {
        Ok(HtmlRenderer::new().render(&document))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
