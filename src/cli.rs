use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "runcell", about = "Run code snippets against the Piston execution service", version)]
pub struct Cli {
    /// Snippet file to run. Reads piped stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Switch the session language before running (persists across sessions).
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Set and persist the editor theme.
    #[arg(long)]
    pub theme: Option<String>,

    /// Set and persist the editor font size.
    #[arg(long = "font-size", value_parser = clap::value_parser!(u32).range(1..))]
    pub font_size: Option<u32>,

    /// List supported languages and their runtime versions.
    #[arg(long = "list-languages")]
    pub list_languages: bool,

    /// Discard saved preferences for this invocation (in-memory session).
    #[arg(long)]
    pub ephemeral: bool,
}
