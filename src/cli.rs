use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe, translate and re-voice a single video
    Process {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language, e.g. "French" or "Chinese (Simplified)"
        #[arg(short, long)]
        language: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process every video file in a directory, one job per file
    Batch {
        /// Input directory containing video files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Target language for every video
        #[arg(short, long)]
        language: String,
    },

    /// Report a video's duration and how it would be segmented
    Probe {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List target languages with a dedicated translation model
    Languages,

    /// Check that ffmpeg, ffprobe and whisper can be invoked
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "revoice.toml")]
        output: PathBuf,
    },
}
