//! Logger setup, ported from termusic's `server/src/logger.rs`.

use std::backtrace::Backtrace;

use colored::{Color, Colorize};
use flexi_logger::{style, DeferredNow, FileSpec, Logger, LoggerHandle, Record};

use crate::cli::Args;

#[inline]
pub fn setup(args: &Args) -> LoggerHandle {
    let handle = {
        let mut logger = Logger::try_with_env_or_str("info")
            .expect("flexi_logger should parse env or string")
            .adaptive_format_for_stderr(flexi_logger::AdaptiveFormat::Custom(
                log_format,
                color_log_format,
            ))
            .panic_if_error_channel_is_broken(false)
            .log_to_stderr();

        if args.log_options.log_to_file {
            if args.log_options.file_color_log {
                logger = logger.format_for_files(color_log_format);
            } else {
                logger = logger.format_for_files(log_format);
            }

            let filespec = FileSpec::try_from(&args.log_options.log_file)
                .expect("logging file path should parse correctly");
            logger = logger
                .log_to_file(filespec)
                .append()
                .duplicate_to_stderr(flexi_logger::Duplicate::All);
        }

        logger
            .start()
            .expect("flexi_logger should be able to start")
    };

    if args.log_options.log_to_file {
        println!(
            "Logging to file \"{}\"",
            args.log_options.log_file.to_string_lossy()
        );
    }

    handle.flush();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        // This works because Rust runs the panic hook before unwinding.
        let backtrace = Backtrace::capture();
        log::error!("Panic occured:\n{panic}\n{backtrace}");
        original_hook(panic);
    }));

    handle
}

pub fn log_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record<'_>,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "[{} {} {}]: {}",
        now.format_rfc3339(),
        record.level(),
        record.module_path().unwrap_or("<unnamed module>"),
        &record.args()
    )
}

pub fn color_log_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record<'_>,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "[{} {} {}]: {}",
        now.format_rfc3339().color(Color::BrightBlack),
        style(level).paint(format!("{level:5}")),
        record.module_path().unwrap_or("<unnamed module>"),
        &record.args()
    )
}
