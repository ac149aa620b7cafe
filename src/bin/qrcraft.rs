//! qrcraft command-line front end.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use qrcraft::config::{validate_pixel_size, Settings};
use qrcraft::error::ShareError;
use qrcraft::export::{to_svg_string, to_terminal_string, UnsupportedShare};
use qrcraft::history::{FileStorage, History};
use qrcraft::logging::{init_logging, LogConfig};
use qrcraft::logo::Logo;
use qrcraft::matrix::Matrix;
use qrcraft::payload::{ContactCard, Payload, SmsMessage, WifiCredentials, WifiEncryption};
use qrcraft::style::Rgb;
use qrcraft::studio::Studio;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "qrcraft", version, about = "Build, style and export QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, global = true, value_name = "PATH", default_value = "qrcraft.json")]
    config: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Website address.
    Url {
        url: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Plain text.
    Text {
        text: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Email address (mailto:).
    Email {
        address: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Phone number (tel:).
    Phone {
        number: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Prefilled text message.
    Sms {
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Wi-Fi network credentials.
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, value_enum, default_value = "wpa")]
        encryption: EncryptionArg,
        #[arg(long)]
        hidden: bool,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Contact card (vCard 3.0).
    Vcard {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Show or clear recent exports.
    History {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory the PNG is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Code color, e.g. #000000.
    #[arg(long, value_name = "HEX")]
    fg: Option<Rgb>,

    /// Background color, e.g. #ffffff.
    #[arg(long, value_name = "HEX")]
    bg: Option<Rgb>,

    /// Image side in pixels (200-1000, steps of 50).
    #[arg(long, value_name = "PX")]
    size: Option<u32>,

    /// Center logo: an image file or a data: URI.
    #[arg(long, value_name = "PATH|URI")]
    logo: Option<String>,

    /// Also write an SVG of the bare code.
    #[arg(long)]
    svg: bool,

    /// Print the encoded payload and exit without rendering.
    #[arg(long)]
    print: bool,

    /// Draw the code in the terminal.
    #[arg(long)]
    preview: bool,

    /// Offer the image to the platform share action.
    #[arg(long)]
    share: bool,
}

#[derive(Args)]
struct CardArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    organization: String,
    #[arg(long, default_value = "")]
    position: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    website: String,
    #[arg(long, default_value = "")]
    address: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncryptionArg {
    Wpa,
    Wep,
    None,
}

impl From<EncryptionArg> for WifiEncryption {
    fn from(arg: EncryptionArg) -> Self {
        match arg {
            EncryptionArg::Wpa => WifiEncryption::Wpa,
            EncryptionArg::Wep => WifiEncryption::Wep,
            EncryptionArg::None => WifiEncryption::None,
        }
    }
}

impl From<CardArgs> for ContactCard {
    fn from(args: CardArgs) -> Self {
        ContactCard {
            first_name: args.first_name,
            last_name: args.last_name,
            organization: args.organization,
            position: args.position,
            phone: args.phone,
            email: args.email,
            website: args.website,
            address: args.address,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.config);
    let (payload, out) = match cli.command {
        Command::History { clear } => return run_history(&settings, clear),
        Command::Url { url, out } => (Payload::Url(url), out),
        Command::Text { text, out } => (Payload::Text(text), out),
        Command::Email { address, out } => (Payload::Email(address), out),
        Command::Phone { number, out } => (Payload::Phone(number), out),
        Command::Sms { phone, message, out } => (Payload::Sms(SmsMessage { phone, message }), out),
        Command::Wifi {
            ssid,
            password,
            encryption,
            hidden,
            out,
        } => (
            Payload::Wifi(WifiCredentials {
                ssid,
                password,
                encryption: encryption.into(),
                hidden,
            }),
            out,
        ),
        Command::Vcard { card, out } => (Payload::VCard(card.into()), out),
    };

    if out.print {
        println!("{}", payload.encode());
        return Ok(());
    }
    run_export(settings, &cli.config, payload, out)
}

fn run_export(mut settings: Settings, config: &Path, payload: Payload, out: OutputArgs) -> Result<()> {
    if let Some(fg) = out.fg {
        settings.foreground = fg;
    }
    if let Some(bg) = out.bg {
        settings.background = bg;
    }
    if let Some(size) = out.size {
        validate_pixel_size(size)?;
        settings.pixel_size = size;
    }
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", config.display()))?;

    let storage = FileStorage::new(settings.history_file.clone());
    let mut studio = Studio::new(settings.clone(), storage);
    studio
        .set_payload(payload)
        .context("payload does not fit in a QR code")?;

    if let Some(logo) = out.logo.as_deref() {
        if logo.starts_with("data:") {
            studio.set_logo_data_uri(logo)?;
        } else {
            let loaded = Logo::from_path(logo)
                .inspect_err(|err| tracing::debug!("logo not loaded: {err}"))
                .ok();
            studio.set_logo(loaded)?;
        }
    }

    let path = studio.download(&out.out_dir, Utc::now())?;
    println!("{}", path.display());

    if out.svg || out.preview {
        let matrix = Matrix::encode(&studio.payload().qr_text(), studio.style().error_correction)?;
        if out.svg {
            let svg_path = path.with_extension("svg");
            std::fs::write(&svg_path, to_svg_string(&matrix, settings.foreground, settings.background))
                .with_context(|| format!("failed to write {}", svg_path.display()))?;
            println!("{}", svg_path.display());
        }
        if out.preview {
            print!("{}", to_terminal_string(&matrix));
        }
    }

    if out.share {
        match studio.share(&UnsupportedShare) {
            Ok(()) => {}
            Err(ShareError::Unsupported) => eprintln!("{}", ShareError::Unsupported),
            Err(other) => return Err(other.into()),
        }
    }
    Ok(())
}

fn run_history(settings: &Settings, clear: bool) -> Result<()> {
    let storage = FileStorage::new(settings.history_file.clone());
    let mut history = History::load_with_capacity(storage, settings.history_capacity);
    if clear {
        history.clear()?;
        return Ok(());
    }
    for entry in history.entries() {
        let when = chrono::DateTime::from_timestamp_millis(entry.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        println!("{when}  {:<6}  {}", entry.kind.display_name(), entry.label);
    }
    Ok(())
}
