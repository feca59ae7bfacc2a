//! Layered config (grounded on `ServerConfigVersionedDefaulted::from_file` /
//! `ServerOverlay` in termusic's `lib/src/config`): a `figment` TOML
//! layer with CLI overrides folded on top, landing in the plain
//! `playctl_core::PlaybackOptions` the core understands.

use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Format, Toml};
use figment::Figment;
use playctl_core::{HrSeekMode, KeepOpen, LoopFile, PlaybackOptions};

use crate::cli::Args;

/// Overlay on top of the resolved [`PlaybackOptions`], the way
/// `ServerOverlay` wraps `ServerSettings` with CLI-only fields that never
/// get persisted back to disk.
pub struct ServerOverlay {
    pub options: PlaybackOptions,
}

pub fn load(args: &Args) -> Result<ServerOverlay> {
    let mut options = if let Some(path) = &args.config {
        load_from_file(path).with_context(|| format!("loading config {}", path.display()))?
    } else {
        PlaybackOptions::default()
    };

    if let Some(hr_seek) = &args.hr_seek {
        options.hr_seek = parse_hr_seek(hr_seek)?;
    }
    if let Some(keep_open) = &args.keep_open {
        options.keep_open = parse_keep_open(keep_open)?;
    }
    if let Some(loop_file) = &args.loop_file {
        options.loop_file = parse_loop_file(loop_file)?;
    }

    Ok(ServerOverlay { options })
}

fn load_from_file(path: &Path) -> Result<PlaybackOptions> {
    if !path.exists() {
        return Ok(PlaybackOptions::default());
    }
    let options: PlaybackOptions = Figment::new()
        .merge(Toml::file(path))
        .extract()
        .context("parsing TOML config")?;
    Ok(options)
}

fn parse_hr_seek(value: &str) -> Result<HrSeekMode> {
    match value {
        "off" => Ok(HrSeekMode::Off),
        "default" => Ok(HrSeekMode::Default),
        "on" => Ok(HrSeekMode::On),
        other => anyhow::bail!("unrecognized --hr-seek value: {other}"),
    }
}

fn parse_keep_open(value: &str) -> Result<KeepOpen> {
    match value {
        "never" => Ok(KeepOpen::Never),
        "if-no-next" => Ok(KeepOpen::IfNoNext),
        "always" => Ok(KeepOpen::Always),
        other => anyhow::bail!("unrecognized --keep-open value: {other}"),
    }
}

fn parse_loop_file(value: &str) -> Result<LoopFile> {
    match value {
        "0" => Ok(LoopFile::Off),
        "inf" => Ok(LoopFile::Infinite),
        n => n
            .parse::<u64>()
            .map(LoopFile::Count)
            .map_err(|_| anyhow::anyhow!("unrecognized --loop-file value: {n}")),
    }
}
