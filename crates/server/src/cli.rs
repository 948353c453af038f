//! CLI argument parsing.

use clap::{Parser, Subcommand};

/// doclift: document conversion, chunking, and vector-store indexing service.
#[derive(Parser, Debug)]
#[command(name = "doclift-server", version, about)]
pub struct Cli {
    /// Configuration profile; keys are read as {PROFILE}_{KEY} first.
    #[arg(long, global = true, env = "DOCLIFT_PROFILE", default_value = "")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP service (default).
    Serve,
    /// Create the chunk collection in Weaviate, replacing any existing one.
    InitCollection {
        /// Leave an existing collection untouched instead of recreating it.
        #[arg(long)]
        keep_existing: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["doclift-server"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn init_collection_flags() {
        let cli = Cli::try_parse_from(["doclift-server", "init-collection", "--keep-existing"]).unwrap();
        assert_eq!(cli.command(), Command::InitCollection { keep_existing: true });

        let cli = Cli::try_parse_from(["doclift-server", "--profile", "prod", "init-collection"]).unwrap();
        assert_eq!(cli.profile, "prod");
        assert_eq!(cli.command(), Command::InitCollection { keep_existing: false });
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["doclift-server", "import-dir"]).is_err());
    }
}
