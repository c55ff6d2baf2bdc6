//! CLI module for the blog panel

pub mod serve;

use clap::{Parser, Subcommand};

/// Blog Panel - multi-tenant blog hosting control panel
#[derive(Parser)]
#[command(name = "blog-panel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the control panel HTTP server
    Serve(serve::ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["blog-panel", "serve"]).unwrap();
        let Command::Serve(args) = cli.command;
        assert_eq!(args.port, None);
        assert_eq!(args.db, None);
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli =
            Cli::try_parse_from(["blog-panel", "serve", "--port", "8080", "--db", "/tmp/x.db"])
                .unwrap();
        let Command::Serve(args) = cli.command;
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.db.as_deref(), Some("/tmp/x.db"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["blog-panel"]).is_err());
    }
}
