use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use morse_tree::{Codec, CodecConfig, CodecOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEMO_TEXT: &str = "What hath God wrought";

#[derive(Parser, Debug)]
#[command(name = "morse-tree", about = "Text/Morse transcoder backed by an AVL tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Clone, Copy)]
struct Limits {
    /// Longest message accepted or produced, in characters.
    #[arg(long, default_value_t = morse_tree::codec::DEFAULT_MAX_MESSAGE_LEN)]
    max_len: usize,
}

impl Limits {
    fn codec(&self) -> Result<Codec> {
        let config = CodecConfig::with_max_message_len(self.max_len)
            .context("invalid --max-len")?;
        Codec::with_config(config).context("failed to build morse tree")
    }
}

#[derive(Args, Debug, Clone, Copy)]
struct Framing {
    /// Use single-space character gaps and double-space word gaps.
    #[arg(long)]
    no_separators: bool,
    /// Wrap encoded messages in the CT/SK prosigns.
    #[arg(long)]
    prosigns: bool,
    #[command(flatten)]
    limits: Limits,
}

impl Framing {
    fn options(&self) -> CodecOptions {
        CodecOptions::new()
            .with_separators(!self.no_separators)
            .with_prosigns(self.prosigns)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode text into Morse code.
    Encode {
        /// Text to encode.
        text: String,
        #[command(flatten)]
        framing: Framing,
    },
    /// Decode Morse code into text.
    Decode {
        /// Dots, dashes and spaces.
        morse: String,
        #[command(flatten)]
        framing: Framing,
    },
    /// Encode with prosigns, print, then decode and print the text back.
    Roundtrip {
        /// Text to send.
        #[arg(default_value = DEMO_TEXT)]
        text: String,
        #[command(flatten)]
        limits: Limits,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { text, framing } => run_encode(&text, framing)?,
        Commands::Decode { morse, framing } => run_decode(&morse, framing)?,
        Commands::Roundtrip { text, limits } => run_roundtrip(&text, limits)?,
    }

    Ok(())
}

fn run_encode(text: &str, framing: Framing) -> Result<()> {
    let codec = framing.limits.codec()?;
    let morse = codec
        .encode(text, framing.options())
        .with_context(|| format!("failed to encode {text:?}"))?;
    println!("{morse}");
    Ok(())
}

fn run_decode(morse: &str, framing: Framing) -> Result<()> {
    let codec = framing.limits.codec()?;
    println!("{}", codec.decode(morse, framing.options()));
    Ok(())
}

fn run_roundtrip(text: &str, limits: Limits) -> Result<()> {
    let codec = limits.codec()?;
    let options = CodecOptions::separated();

    let morse = codec
        .encode(text, options.with_prosigns(true))
        .with_context(|| format!("failed to encode {text:?}"))?;
    println!("{morse}");

    let decoded = codec.decode(&morse, options);
    println!("'{decoded}'");

    debug!(sent = text, received = %decoded, "round trip complete");
    codec.teardown();
    Ok(())
}
