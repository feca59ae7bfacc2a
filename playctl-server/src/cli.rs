//! CLI arguments (grounded on termusic's `server/src/cli.rs`).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "playctl-server", author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML file with the timeline/options to demo; with none
    /// given, a short built-in timeline is simulated.
    pub media_path: Option<PathBuf>,

    /// Override `hr_seek` (off|default|on).
    #[arg(long)]
    pub hr_seek: Option<String>,

    /// Override `keep_open` (never|if-no-next|always).
    #[arg(long)]
    pub keep_open: Option<String>,

    /// Override `loop_file` count; pass 0 for no loop, or "inf".
    #[arg(long)]
    pub loop_file: Option<String>,

    /// Path to a layered config TOML overriding `PlaybackOptions` defaults.
    #[arg(long, env = "PLAYCTL_CONFIG")]
    pub config: Option<PathBuf>,

    #[clap(flatten)]
    pub log_options: LogOptions,
}

#[derive(Debug, Parser, Clone, PartialEq)]
pub struct LogOptions {
    /// Enable logging to a file, in addition to stderr.
    #[arg(long = "log-to-file", env = "PLAYCTL_LOGTOFILE")]
    pub log_to_file: bool,

    /// Set the logging file path.
    #[arg(long = "log-file", default_value_os_t = default_logfile_path(), env = "PLAYCTL_LOGFILE")]
    pub log_file: PathBuf,

    /// Use colored logging for files too (handy for `tail -f`).
    #[arg(long = "log-filecolor", env = "PLAYCTL_LOGFILE_COLOR")]
    pub file_color_log: bool,
}

fn default_logfile_path() -> PathBuf {
    std::env::temp_dir().join("playctl-server.log")
}
