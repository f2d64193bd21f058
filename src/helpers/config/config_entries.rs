use super::*;
use std::convert::TryFrom;

fn describe(source: Option<&str>) -> &str {
    source.unwrap_or("default value")
}

/// One year. Anything longer is almost certainly a typo.
const MAX_SECONDS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Converts seconds from the config into a Duration
fn seconds_to_duration(seconds: f64, source: Option<&str>) -> Result<Duration, Box<dyn Error>> {
    if seconds.is_finite() && (0.0..=MAX_SECONDS).contains(&seconds) {
        Ok(Duration::from_secs_f64(seconds))
    } else {
        Err(format!(
            "{} is not a valid number of seconds (should be between 0 and {})",
            describe(source),
            MAX_SECONDS
        )
        .into())
    }
}

/// These entries will be applied in order of returned vec (NOT in the order the user specifies the
/// entry). All entries will always be applied.
pub fn config_entries() -> Vec<ConfigEntry> {
    vec![
        ConfigEntry::new_bool(
            "help",
            "show this help and exit",
            false,
            |conf, help, _| {
                conf.happy_exit = help;
                Ok(())
            },
        ),
        ConfigEntry::new_float(
            "tick_seconds",
            "seconds between each tick of the clock",
            1.0,
            |conf, seconds, source| {
                if seconds > 0.0 {
                    conf.emitter.tick = seconds_to_duration(seconds, source)?;
                    Ok(())
                } else {
                    Err(format!("{} should be greater than 0", describe(source)).into())
                }
            },
        ),
        ConfigEntry::new_float(
            "min_sleep_seconds",
            concat!(
                "the clock always waits at least this long between ticks, ",
                "even when callbacks take longer than a tick"
            ),
            0.0,
            |conf, seconds, source| {
                conf.emitter.min_sleep = seconds_to_duration(seconds, source)?;
                Ok(())
            },
        ),
        ConfigEntry::new_float(
            "run_seconds",
            "seconds to run before exiting, or 0 to run until interrupted",
            5.0,
            |conf, seconds, source| {
                conf.run_time = if seconds == 0.0 {
                    None
                } else {
                    Some(seconds_to_duration(seconds, source)?)
                };
                Ok(())
            },
        ),
        ConfigEntry::new_int(
            "stopwatches",
            "number of stopwatches attached to the clock",
            2,
            |conf, count, source| {
                conf.stopwatches = usize::try_from(count)
                    .map_err(|_| format!("{} should not be negative", describe(source)))?;
                Ok(())
            },
        ),
        ConfigEntry::new_bool(
            "stop_on_callback_error",
            "stop the clock the first time a callback fails instead of logging and continuing",
            false,
            |conf, stop, _| {
                conf.emitter.stop_on_callback_error = stop;
                Ok(())
            },
        ),
        ConfigEntry::new_enum(
            "output",
            "format of the summary printed on exit",
            vec![
                ConfigEntry::new_enum_variant("text", "human readable lines", |conf| {
                    conf.output = OutputFormat::Text
                }),
                ConfigEntry::new_enum_variant("json", "a single JSON object", |conf| {
                    conf.output = OutputFormat::Json
                }),
            ],
        ),
    ]
}
