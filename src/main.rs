mod cli;

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use runcell::{
    config::Config,
    editor::BufferEditor,
    languages,
    piston::PistonClient,
    prefs::{FilePrefs, MemoryPrefs, PrefStore},
    session::SessionManager,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = cli::Cli::parse();

    if args.list_languages {
        for lang in languages::LANGUAGES {
            match lang.runtime {
                Some(rt) => {
                    println!("{:<12} {} ({} {})", lang.id, lang.display_name, rt.name, rt.version)
                }
                None => println!("{:<12} {} (no runtime configured)", lang.id, lang.display_name),
            }
        }
        return Ok(());
    }

    let cfg = Config::load();
    let prefs: Box<dyn PrefStore> = if args.ephemeral {
        Box::new(MemoryPrefs::new())
    } else {
        Box::new(FilePrefs::new(cfg.prefs_path()))
    };
    let client = PistonClient::from_config(&cfg)?;
    let mut session = SessionManager::new(client, prefs);

    if let Some(lang) = args.language.as_deref() {
        session.set_language(lang);
    }
    if let Some(theme) = args.theme.as_deref() {
        session.set_theme(theme);
    }
    if let Some(size) = args.font_size {
        session.set_font_size(size);
    }

    // Attach after any language switch so the saved blob for the selected
    // language is the one restored.
    session.attach_editor(Box::new(BufferEditor::new()));

    let mut have_snippet = false;
    if let Some(path) = args.file.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {path}"))?;
        session.set_code(&text);
        have_snippet = true;
    } else if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        session.set_code(&buf);
        have_snippet = true;
    }

    // Pure preference updates don't trigger a run.
    let setter_only = !have_snippet
        && (args.language.is_some() || args.theme.is_some() || args.font_size.is_some());
    if setter_only {
        return Ok(());
    }

    session.run().await;

    let state = session.state();
    if let Some(err) = &state.error {
        eprintln!("{}", err.red());
        std::process::exit(1);
    }
    if !state.output.is_empty() {
        println!("{}", state.output);
    }
    Ok(())
}
