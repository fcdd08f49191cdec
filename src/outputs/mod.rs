//! Report files written for each run.
//!
//! # Submodules
//!
//! - [`tables`]: posts and title-frequency spreadsheets (UTF-8 with BOM)
//! - [`issue`]: plain-text issue bundle
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── clien_yesterday_posts_261018.csv
//! ├── clien_yesterday_title_frequencies_261018.csv
//! ├── clien_yesterday_wordcloud_261018.png
//! ├── YESTERDAY_ISSUE_261018.txt
//! └── YESTERDAY_SUMMARY_261018.txt
//! ```

pub mod issue;
pub mod tables;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// File locations for one target day.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub posts_csv: PathBuf,
    pub frequencies_csv: PathBuf,
    pub issue_txt: PathBuf,
    pub summary_txt: PathBuf,
    pub wordcloud_png: PathBuf,
}

impl OutputPaths {
    /// Name every output after the target day as `YYMMDD`.
    pub fn new(dir: &Path, target: NaiveDate) -> Self {
        let suffix = date_suffix(target);
        Self {
            posts_csv: dir.join(format!("clien_yesterday_posts_{suffix}.csv")),
            frequencies_csv: dir.join(format!("clien_yesterday_title_frequencies_{suffix}.csv")),
            issue_txt: dir.join(format!("YESTERDAY_ISSUE_{suffix}.txt")),
            summary_txt: dir.join(format!("YESTERDAY_SUMMARY_{suffix}.txt")),
            wordcloud_png: dir.join(format!("clien_yesterday_wordcloud_{suffix}.png")),
        }
    }
}

/// `YYMMDD` label used in file names and captions.
pub fn date_suffix(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}
