use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Progress bar fed from the core's item counter by a background thread
pub struct ProgressReporter {
    bar: ProgressBar,
    done: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    pub fn start(total: usize, counter: Arc<AtomicUsize>) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{eta}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message("Computing fingerprints...");

        let done = Arc::new(AtomicBool::new(false));
        let start = Instant::now();

        let updater_bar = bar.clone();
        let updater_done = Arc::clone(&done);
        let handle = std::thread::Builder::new()
            .name("progress-updater".to_string())
            .spawn(move || {
                while !updater_done.load(Ordering::Relaxed) {
                    let current = counter.load(Ordering::Relaxed);
                    updater_bar.set_position(current as u64);

                    let elapsed_secs = start.elapsed().as_secs_f64();
                    if elapsed_secs > 0.0 {
                        updater_bar
                            .set_message(format!("{:.1} images/sec", current as f64 / elapsed_secs));
                    }

                    std::thread::sleep(Duration::from_millis(100));
                }
                updater_bar.set_position(counter.load(Ordering::Relaxed) as u64);
            })
            .ok();

        Self { bar, done, handle }
    }

    pub fn finish(mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Progress updater thread panicked");
            }
        }
        self.bar.finish_and_clear();
    }
}
