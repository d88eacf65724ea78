use clap::{Parser, Subcommand};

/// `chatbridge` - WhatsApp webhook backed by per-sender LLM conversations.
#[derive(Parser, Debug)]
#[command(name = "chatbridge")]
#[command(version = "0.1.0")]
#[command(about = "Answer WhatsApp messages through an LLM, one conversation per sender.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.chatbridge/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the effective configuration with secrets masked
    Config,
}
