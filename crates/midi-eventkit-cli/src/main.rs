use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use midi_eventkit::{
    config, decode, encode_batch, describe, EnglishLocalizer, Event, Localizer, MidiStatus,
    PacketListBuffer, PayloadFormat, StatusEvent, SystemClock, TableLocalizer,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Encode(args) => execute_encode(args),
        Commands::Decode(args) => execute_decode(args),
        Commands::Describe(args) => execute_describe(args),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Encode and inspect MIDI 1.0 messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON list of events into a packet list.
    Encode(EncodeArgs),
    /// Decode hex-encoded messages.
    Decode(DecodeArgs),
    /// Print the description of a hex-encoded message.
    Describe(DescribeArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Path to a JSON array of events.
    events: PathBuf,
    /// Codec settings file. Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write only the bytes each status calls for.
    #[arg(long)]
    compact: bool,
    /// Override the packet list capacity in bytes.
    #[arg(long)]
    capacity: Option<usize>,
}

#[derive(Args)]
struct DecodeArgs {
    /// One message per argument, e.g. `903C64` or `90:3c:64`.
    #[arg(required = true)]
    messages: Vec<String>,
    /// Treat the single argument as a whole packet list.
    #[arg(long)]
    packet_list: bool,
}

#[derive(Args)]
struct DescribeArgs {
    message: String,
    /// JSON object mapping description keys to text.
    #[arg(long)]
    strings: Option<PathBuf>,
}

fn execute_encode(args: EncodeArgs) -> Result<()> {
    let list = encode_file(&args)?;
    println!("{}", to_hex(list.as_bytes()));
    Ok(())
}

fn encode_file(args: &EncodeArgs) -> Result<PacketListBuffer> {
    let mut codec = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    if args.compact {
        codec.payload = PayloadFormat::Compact;
    }
    if let Some(capacity) = args.capacity {
        codec.packet_list_capacity = capacity;
    }

    let data = fs::read_to_string(&args.events)
        .with_context(|| format!("failed to read events file {}", args.events.display()))?;
    let events: Vec<Event> = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a valid events file", args.events.display()))?;

    Ok(encode_batch(&events, &codec, &SystemClock::new())?)
}

fn execute_decode(args: DecodeArgs) -> Result<()> {
    for line in decode_lines(&args)? {
        println!("{line}");
    }
    Ok(())
}

fn decode_lines(args: &DecodeArgs) -> Result<Vec<String>> {
    if args.packet_list {
        let [hex] = args.messages.as_slice() else {
            bail!("--packet-list takes exactly one argument");
        };
        let list = PacketListBuffer::from_bytes(parse_hex(hex)?)?;
        return Ok(list
            .decode()?
            .into_iter()
            .map(|(timestamp, message)| format!("@{timestamp} {}", summarize(&message)))
            .collect());
    }

    args.messages
        .iter()
        .map(|hex| -> Result<String> {
            let message =
                decode(&parse_hex(hex)?).with_context(|| format!("cannot decode {hex}"))?;
            Ok(summarize(&message))
        })
        .collect()
}

fn execute_describe(args: DescribeArgs) -> Result<()> {
    let message = decode(&parse_hex(&args.message)?)?;
    let id = describe(&message);
    let text = match &args.strings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read strings file {}", path.display()))?;
            let table = TableLocalizer::from_json(&json)
                .with_context(|| format!("{} is not a valid strings file", path.display()))?;
            for key in table.unknown_keys() {
                tracing::warn!(key, "strings file has an unknown key");
            }
            table.localize(id).into_owned()
        }
        None => EnglishLocalizer.localize(id).into_owned(),
    };
    println!("{}\t{}", id.key(), text);
    Ok(())
}

fn summarize(message: &MidiStatus) -> String {
    let channel = message
        .channel()
        .map(|channel| format!(" ch {}", channel.get() + 1))
        .unwrap_or_default();
    format!(
        "{}  {}{}",
        to_hex(&message.compact_bytes()),
        EnglishLocalizer.localize(message.string_id()),
        channel
    )
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if digits.len() % 2 != 0 {
        bail!("{input:?} has an odd number of hex digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16).with_context(|| format!("{byte:?} is not a hex byte"))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
