#[macro_use(new_key_type)]
extern crate slotmap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate derivative;

use std::{
    collections::HashSet,
    error::Error,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering::SeqCst},
        mpsc::{channel, Receiver, RecvTimeoutError, Sender},
        Arc, Mutex, Weak,
    },
    time::{Duration, Instant},
};

mod dispatch;
mod helpers;

use dispatch::*;
use helpers::*;

/// What the clock did while the program ran
#[derive(Debug)]
struct Summary {
    ticks: u64,
    failed_ticks: u64,
    stopwatches: Vec<(String, u64)>,
}

fn format_summary(summary: &Summary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut text = format!(
                "clock ticked {} times ({} with failed callbacks)\n",
                summary.ticks, summary.failed_ticks
            );
            for (name, count) in &summary.stopwatches {
                text.push_str(&format!("  {}: {}\n", name, count));
            }
            text
        }
        OutputFormat::Json => {
            let stopwatches: serde_json::Map<String, serde_json::Value> = summary
                .stopwatches
                .iter()
                .map(|(name, count)| (name.clone(), serde_json::json!(count)))
                .collect();
            let json = serde_json::json!({
                "ticks": summary.ticks,
                "failed_ticks": summary.failed_ticks,
                "stopwatches": stopwatches,
            });
            format!("{}\n", json)
        }
    }
}

fn run(conf: &MasterConfig) -> Result<Summary, Box<dyn Error>> {
    let emitter = Emitter::new("clock", conf.emitter.clone());

    let stopwatches: Vec<Stopwatch> = (0..conf.stopwatches)
        .map(|i| Stopwatch::new(&format!("stopwatch_{}", i)))
        .collect();
    for stopwatch in &stopwatches {
        stopwatch.attach(&emitter);
    }

    let ticks = Arc::new(Property::new("ticks", 0u64));
    let tick_logger = ticks.on_change(|change| {
        info!("{} is now {}", change.name, change.value);
        Ok(())
    });
    debug!("{} is {:?}", ticks.name(), ticks.id());
    let ticks_writer = ticks.clone();
    emitter.subscribe_fn(move || {
        ticks_writer
            .set(ticks_writer.get() + 1)
            .or_log_warn("failed to notify tick listeners");
    });

    let (quit_tx, quit_rx) = channel();
    let handler_tx = quit_tx.clone();
    ctrlc::set_handler(move || {
        handler_tx.send(()).or_log_error("failed to send quit signal");
    })
    .or_log_warn("failed to install Ctrl+C handler");

    emitter.start()?;
    match conf.run_time {
        Some(run_time) => match quit_rx.recv_timeout(run_time) {
            Ok(()) => info!("interrupted"),
            Err(_) => info!("ran for {:?}", run_time),
        },
        None => {
            info!("running until interrupted");
            quit_rx.recv().or_log_warn("no quit signal available");
        }
    }
    if !emitter.is_running() {
        warn!("{} stopped before the run ended", emitter.name());
    }
    emitter.stop();
    ticks.remove_listener(tick_logger);
    drop(quit_tx);

    Ok(Summary {
        ticks: emitter.tick_count(),
        failed_ticks: emitter.failed_tick_count(),
        stopwatches: stopwatches
            .iter()
            .map(|s| (s.name().to_string(), s.count()))
            .collect(),
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let conf = match build_config(std::env::args().collect()) {
        Ok(conf) => conf,
        Err(e) => {
            error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if conf.happy_exit {
        print!("{}", config_help());
        return;
    }

    trace!("{:#?}", conf);

    match run(&conf) {
        Ok(summary) => print!("{}", format_summary(&summary, conf.output)),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        Summary {
            ticks: 3,
            failed_ticks: 1,
            stopwatches: vec![("a".to_string(), 3), ("b".to_string(), 2)],
        }
    }

    #[test]
    fn text_summary_lists_stopwatches() {
        let text = format_summary(&summary(), OutputFormat::Text);
        assert!(text.starts_with("clock ticked 3 times (1 with failed callbacks)\n"));
        assert!(text.contains("  a: 3\n"));
        assert!(text.contains("  b: 2\n"));
    }

    #[test]
    fn json_summary_is_valid_json() {
        let text = format_summary(&summary(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).expect("invalid json");
        assert_eq!(value["ticks"], 3);
        assert_eq!(value["failed_ticks"], 1);
        assert_eq!(value["stopwatches"]["b"], 2);
    }

    #[test]
    fn runs_with_short_tick() {
        run_with_timeout(|| {
            let mut conf = MasterConfig::default();
            conf.emitter.tick = Duration::from_millis(20);
            conf.run_time = Some(Duration::from_millis(110));
            conf.stopwatches = 2;
            let summary = run(&conf).expect("run failed");
            assert!(summary.ticks >= 3);
            assert_eq!(summary.failed_ticks, 0);
            assert_eq!(summary.stopwatches.len(), 2);
            for (_, count) in &summary.stopwatches {
                assert_eq!(*count, summary.ticks);
            }
        });
    }
}
