// Page navigation state, bounded by the page count the renderer reports.

#[derive(Debug)]
pub struct PaginationController {
    /// 1-indexed current page.
    current_page: u32,
    /// Unknown until the rendering engine has loaded the current artifact.
    page_count: Option<u32>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            page_count: None,
        }
    }

    /// Advance one page. A call at the last page is a no-op.
    pub fn next(&mut self) {
        if let Some(count) = self.page_count {
            if self.current_page < count {
                self.current_page += 1;
            }
        }
    }

    /// Go back one page. A call at page 1 is a no-op.
    pub fn previous(&mut self) {
        if self.page_count.is_some() && self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// A new artifact is being loaded; the page count is unknown until the
    /// renderer reports it, and navigation is disabled meanwhile.
    pub fn begin_load(&mut self) {
        self.page_count = None;
    }

    /// The renderer finished loading a replacement artifact: store the new
    /// count and reset to the first page.
    pub fn on_artifact_replaced(&mut self, page_count: u32) {
        self.page_count = Some(page_count.max(1));
        self.current_page = 1;
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Navigation controls are only enabled once a page count is known.
    pub fn can_navigate(&self) -> bool {
        self.page_count.is_some()
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}
