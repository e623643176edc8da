//! Per-invocation response accumulator
//!
//! Each tool call gets a fresh `Response`. The handler writes result text
//! and reproduction code into it; after the handler returns, the server
//! attaches the page-state capture if one was requested and renders the
//! whole thing into the MCP text payload.

use crate::driver::PageSnapshot;

#[derive(Debug, Default)]
pub struct Response {
    results: Vec<String>,
    code: Vec<String>,
    include_snapshot: bool,
    snapshot: Option<PageSnapshot>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, text: impl Into<String>) {
        self.results.push(text.into());
    }

    pub fn add_code(&mut self, snippet: impl Into<String>) {
        self.code.push(snippet.into());
    }

    /// Request a post-action page-state capture.
    pub fn set_include_snapshot(&mut self) {
        self.include_snapshot = true;
    }

    pub fn wants_snapshot(&self) -> bool {
        self.include_snapshot
    }

    pub fn attach_snapshot(&mut self, snapshot: PageSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Render the accumulated sections. Empty sections are omitted.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.results.is_empty() {
            out.push_str("### Result\n");
            for line in &self.results {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !self.code.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("### Code\n```\n");
            for line in &self.code {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("```\n");
        }

        if let Some(snapshot) = &self.snapshot {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("### Page state\n");
            out.push_str(&format!(
                "- url: {}\n",
                snapshot.url.as_deref().unwrap_or("about:blank")
            ));
            out.push_str(&format!(
                "- title: {}\n",
                snapshot.title.as_deref().unwrap_or("")
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_result_only() {
        let mut response = Response::new();
        response.add_result("hello");
        let text = response.render();
        assert!(text.starts_with("### Result\nhello\n"));
        assert!(!text.contains("### Code"));
        assert!(!text.contains("### Page state"));
    }

    #[test]
    fn test_render_code_and_snapshot() {
        let mut response = Response::new();
        response.add_code("page.goto(\"https://example.com\")");
        response.set_include_snapshot();
        assert!(response.wants_snapshot());

        response.attach_snapshot(PageSnapshot {
            url: Some("https://example.com/".to_string()),
            title: Some("Example Domain".to_string()),
        });

        let text = response.render();
        assert!(text.contains("### Code"));
        assert!(text.contains("page.goto(\"https://example.com\")"));
        assert!(text.contains("### Page state"));
        assert!(text.contains("- url: https://example.com/"));
        assert!(text.contains("- title: Example Domain"));
    }

    #[test]
    fn test_snapshot_not_rendered_unless_attached() {
        let mut response = Response::new();
        response.set_include_snapshot();
        assert!(!response.render().contains("### Page state"));
    }
}
