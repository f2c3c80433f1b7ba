use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use ytdlp_bridge::fetcher::deps::{Executables, ProvisionOptions};
use ytdlp_bridge::utils;
use ytdlp_bridge::{AudioBitrate, AudioDownload, VideoDownload, VideoField, VideoQuality, YtDlp};

/// Defaults read from `config.toml`, overridden by command-line flags.
#[derive(Deserialize, Serialize, Default, Debug)]
#[serde(default)]
struct Config {
    yt_dlp: Option<PathBuf>,
    ffmpeg: Option<PathBuf>,
    destination: Option<PathBuf>,
}

#[derive(Parser, Clone)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the yt-dlp binary.
    #[arg(long = "yt-dlp", global = true)]
    pub yt_dlp: Option<PathBuf>,

    /// Path to the ffmpeg binary.
    #[arg(long = "ffmpeg", global = true)]
    pub ffmpeg: Option<PathBuf>,

    #[arg(
        long = "verbosity",
        short,
        global = true,
        default_value = "info",
        value_parser = clap::builder::PossibleValuesParser::new([
            "info", "debug", "error", "none"
        ])
    )]
    pub verbosity: String,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Download the yt-dlp binary.
    Install {
        #[arg(long = "dir", short)]
        dir: Option<PathBuf>,

        #[arg(
            long = "platform",
            value_parser = clap::builder::PossibleValuesParser::new(["win32", "linux", "darwin"])
        )]
        platform: Option<String>,

        /// Check the binary against the published SHA-256 checksum.
        #[arg(long = "verify", action = clap::ArgAction::SetTrue)]
        verify: bool,
    },
    /// Print video metadata as JSON.
    Metadata {
        url: String,

        #[arg(long = "field", short, default_values = ["id", "title", "duration"])]
        fields: Vec<String>,
    },
    /// List the available video qualities.
    Qualities { url: String },
    /// Download the audio as mp3.
    Audio {
        url: String,

        #[arg(
            long = "bitrate",
            short,
            default_value = "192k",
            value_parser = clap::builder::PossibleValuesParser::new(["48k", "128k", "192k", "256k", "320k"])
        )]
        bitrate: String,

        #[arg(long = "output", short)]
        output: Option<PathBuf>,

        #[arg(long = "keep", action = clap::ArgAction::SetTrue)]
        keep: bool,
    },
    /// Download the video as mp4.
    Video {
        url: String,

        #[arg(
            long = "quality",
            short,
            default_value = "720p",
            value_parser = clap::builder::PossibleValuesParser::new([
                "144p", "240p", "360p", "480p", "720p", "1080p", "1440p", "2160p"
            ])
        )]
        quality: String,

        #[arg(long = "output", short)]
        output: Option<PathBuf>,

        #[arg(long = "keep", action = clap::ArgAction::SetTrue)]
        keep: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    let multi = init_logger(&args.verbosity)?;
    let config = load_config()?;

    let verbose = args.verbosity != "error" && args.verbosity != "none";

    match args.command.clone() {
        Command::Install {
            dir,
            platform,
            verify,
        } => {
            let bar = multi.add(ProgressBar::new(0));
            bar.set_style(ProgressStyle::with_template(
                "{spinner} [{bar:40}] {bytes}/{total_bytes} ({eta})",
            )?);

            let progress_bar = bar.clone();
            let mut options = ProvisionOptions::default()
                .with_checksum(verify)
                .with_progress(move |downloaded, total| {
                    if total > 0 {
                        progress_bar.set_length(total);
                    }
                    progress_bar.set_position(downloaded);
                });

            if let Some(dir) = dir.or_else(|| config_dir_of(config.yt_dlp.as_deref())) {
                options = options.with_destination(dir);
            }
            if let Some(platform) = platform {
                options = options.with_platform(platform);
            }

            let path = YtDlp::download_binary(options).await;
            bar.finish_and_clear();

            let path = path.inspect_err(|e| error!("Error while downloading yt-dlp: {}", e))?;
            info!("yt-dlp installed at {}", path.display());
        }
        Command::Metadata { url, fields } => {
            let fetcher = fetcher(&args, &config);
            let fields: Vec<VideoField> = fields.iter().map(|f| VideoField::from(f.as_str())).collect();

            let metadata = fetcher.fetch_metadata(&url, &fields).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Qualities { url } => {
            let fetcher = fetcher(&args, &config);

            let qualities = fetcher.fetch_available_qualities(&url).await?;
            if qualities.is_empty() {
                warn!("No video qualities found for {}", url);
            }
            for quality in qualities {
                println!("{}", quality);
            }
        }
        Command::Audio {
            url,
            bitrate,
            output,
            keep,
        } => {
            let fetcher = fetcher(&args, &config);
            let bitrate: AudioBitrate = bitrate.parse()?;

            let mut options = AudioDownload::new(url, bitrate)
                .with_verbose(verbose)
                .with_keep_intermediate(keep);
            if let Some(destination) = output.or(config.destination.clone()) {
                options = options.with_destination(destination);
            }

            let path = fetcher.download_audio(options).await?;
            println!("{}", path.display());
        }
        Command::Video {
            url,
            quality,
            output,
            keep,
        } => {
            let fetcher = fetcher(&args, &config);
            let quality: VideoQuality = quality.parse()?;

            let mut options = VideoDownload::new(url, quality)
                .with_verbose(verbose)
                .with_keep_intermediate(keep);
            if let Some(destination) = output.or(config.destination.clone()) {
                options = options.with_destination(destination);
            }

            let path = fetcher.download_video(options).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn init_logger(
    verbosity: &str,
) -> Result<MultiProgress, Box<dyn std::error::Error + Send + Sync>> {
    let level = match verbosity {
        "debug" => log::LevelFilter::Debug,
        "error" => log::LevelFilter::Error,
        "none" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    };

    let logger = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_target(false)
        .build();
    let multi = MultiProgress::new();

    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(level);

    Ok(multi)
}

fn fetcher(args: &Cli, config: &Config) -> YtDlp {
    let downloader = args
        .yt_dlp
        .clone()
        .or_else(|| config.yt_dlp.clone())
        .unwrap_or_else(|| PathBuf::from("bin").join(utils::find_executable("yt-dlp")));
    let transcoder = args
        .ffmpeg
        .clone()
        .or_else(|| config.ffmpeg.clone())
        .unwrap_or_else(|| PathBuf::from(utils::find_executable("ffmpeg")));

    YtDlp::new(Executables::new(downloader, transcoder))
}

fn config_dir_of(executable: Option<&Path>) -> Option<PathBuf> {
    executable?.parent().map(Path::to_path_buf)
}

fn load_config() -> Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };

    let config_path = config_dir.join("ytdlp-bridge").join("config.toml");
    if !config_path.is_file() || fs::metadata(&config_path)?.len() == 0 {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Malformed config file {}: {}", config_path.display(), e);
            Err(Box::new(e))
        }
    }
}
