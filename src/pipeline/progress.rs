// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub pairs_extracted: usize,
    pub pairs_truncated: usize,
    pub duration_secs: u64,
    pub output_path: Option<PathBuf>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.files_attempted() as f64 / self.duration_secs as f64
    }

    pub fn files_attempted(&self) -> usize {
        self.files_processed + self.files_skipped + self.files_failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_processed + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_processed as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_discovered: usize,
    files_processed: AtomicUsize,
    files_skipped: AtomicUsize,
    files_failed: AtomicUsize,
    pairs_extracted: AtomicUsize,
    pairs_truncated: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    /// `visible = false` keeps counting but draws nothing.
    pub fn with_options(total_files: usize, visible: bool, colored: bool) -> Self {
        let multi_progress = if visible {
            MultiProgress::with_draw_target(ProgressDrawTarget::stderr())
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_discovered: total_files,
            files_processed: AtomicUsize::new(0),
            files_skipped: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            pairs_extracted: AtomicUsize::new(0),
            pairs_truncated: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_files_processed(&self, pairs: usize, truncated: usize) {
        self.files_processed.fetch_add(1, Ordering::SeqCst);
        self.pairs_extracted.fetch_add(pairs, Ordering::SeqCst);
        self.pairs_truncated.fetch_add(truncated, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_files_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Processing complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            files_discovered: self.files_discovered,
            files_processed: self.files_processed.load(Ordering::SeqCst),
            files_skipped: self.files_skipped.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            pairs_extracted: self.pairs_extracted.load(Ordering::SeqCst),
            pairs_truncated: self.pairs_truncated.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
            output_path: None,
        }
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "QA pairs: {} | Skipped: {} | Failed: {}",
            self.pairs_extracted.load(Ordering::SeqCst),
            self.files_skipped.load(Ordering::SeqCst),
            self.files_failed.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.finish();
        }
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}",
            "=>-",
        )
    };

    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars);
    bar.set_style(style);
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
