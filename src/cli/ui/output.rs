use console::style;

use crate::publish::{PublishAttemptResult, PublishMethod};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<10} {}", style(label).dim(), value);
    }

    /// Summary of a finished publish
    pub fn publish_result(&self, result: &PublishAttemptResult) {
        match result.method {
            PublishMethod::DirectCommit => self.success("Post published by direct commit"),
            PublishMethod::PullRequest => {
                self.warning("Direct commit failed; post submitted as a pull request")
            }
            PublishMethod::LocalSave => self.warning("Post saved locally"),
        }

        self.field("Title", &result.title);
        self.field("File", &result.file_path);
        self.field("Location", &result.location);
        if let Some(url) = &result.live_url {
            self.field("Live", url);
        }
        if let Some(error) = &result.error {
            self.field("Cause", error);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
