use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tagsync")]
#[command(about = "Reconcile tags on externally managed resources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to tagsync.toml (overrides TAGSYNC_CONFIG env var)
    #[arg(short, long, global = true, env = "TAGSYNC_CONFIG")]
    pub config: Option<String>,

    /// Additional tag as key=value, layered over configured tags (repeatable)
    #[arg(short = 't', long = "additional", global = true, value_parser = parse_tag)]
    pub additional: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a reconciliation pass and print the updated target
    Reconcile(ReconcileArgs),
    /// Show which additional tags would be created, updated or deleted
    Diff(DiffArgs),
    /// Inspect the effective configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ReconcileArgs {
    /// Path to the target resource JSON (reads from stdin if omitted)
    #[arg(long)]
    pub target: Option<String>,
    /// Path to the existing resource JSON (omit when creating)
    #[arg(long)]
    pub existing: Option<String>,
}

#[derive(clap::Args)]
pub struct DiffArgs {
    /// Path to the existing resource JSON
    #[arg(long)]
    pub existing: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective config after file and environment overrides
    Show,
}

/// Parse a `key=value` tag argument.
pub fn parse_tag(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid tag \"{s}\", expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid tag \"{s}\", key must not be empty"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("owner=platform"),
            Ok(("owner".to_string(), "platform".to_string()))
        );
        assert_eq!(parse_tag("url=a=b"), Ok(("url".to_string(), "a=b".to_string())));
        assert_eq!(parse_tag("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_tag("novalue").is_err());
        assert!(parse_tag("=v").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_tags() {
        let cli = Cli::try_parse_from([
            "tagsync",
            "reconcile",
            "--target",
            "t.json",
            "-t",
            "a=1",
            "--additional",
            "b=2",
        ])
        .unwrap();

        assert_eq!(cli.additional.len(), 2);
        match cli.command {
            Commands::Reconcile(args) => {
                assert_eq!(args.target.as_deref(), Some("t.json"));
                assert!(args.existing.is_none());
            }
            _ => panic!("expected reconcile command"),
        }
    }

    #[test]
    fn test_cli_parses_diff_existing_flag() {
        let cli = Cli::try_parse_from(["tagsync", "diff", "--existing", "e.json"]).unwrap();
        match cli.command {
            Commands::Diff(args) => assert_eq!(args.existing, "e.json"),
            _ => panic!("expected diff command"),
        }

        assert!(Cli::try_parse_from(["tagsync", "diff", "e.json"]).is_err());
        assert!(Cli::try_parse_from(["tagsync", "diff"]).is_err());
    }
}
