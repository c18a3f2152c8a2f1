use indicatif::{ProgressBar, ProgressStyle};

pub struct AuditProgressBar {
    bar: ProgressBar,
}

impl AuditProgressBar {
    pub fn new(num_windows: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(num_windows as u64);
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Auditing windows... {percent:>3}%")?,
        );
        Ok(Self { bar })
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

pub struct LoadProgressBar {
    bar: ProgressBar,
}

impl LoadProgressBar {
    pub fn new(num_batches: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(num_batches as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {pos}/{len} [{wide_bar:.cyan/blue}] {eta_precise} | {msg}")?,
        );
        Ok(Self { bar })
    }

    pub fn update(&self, loaded: usize, failed: usize) {
        self.bar
            .set_message(format!("samples: {}, failed batches: {}", loaded, failed));
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}
