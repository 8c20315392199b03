//! Last-used inputs, kept between runs in a three-line text file.

use std::fs;
use std::path::Path;

use log::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl Preferences {
    /// Missing or unreadable files yield empty preferences.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let mut lines = text.lines().map(|line| line.trim_end().to_string());
                Self {
                    from: lines.next().unwrap_or_default(),
                    to: lines.next().unwrap_or_default(),
                    amount: lines.next().unwrap_or_default(),
                }
            }
            Err(e) => {
                debug!("no preferences at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write failures are logged and otherwise ignored.
    pub fn save(&self, path: &Path) {
        let text = format!("{}\n{}\n{}", self.from, self.to, self.amount);
        if let Err(e) = fs::write(path, text) {
            warn!("cannot save preferences to {}: {e}", path.display());
        }
    }
}
