/// Result table display state
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
        }
    }
}

impl TableState {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = self.selected.map_or(0, |i| (i + 1).min(total - 1));
        self.select(i);
    }

    pub fn select_prev(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = self.selected.map_or(0, |i| i.saturating_sub(1).min(total - 1));
        self.select(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1);
        let i = self.selected.map_or(jump, |i| i + jump).min(total - 1);
        self.select(i);
    }

    pub fn page_up(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1);
        let i = self.selected.map_or(0, |i| i.saturating_sub(jump).min(total - 1));
        self.select(i);
    }

    pub fn select_first(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.select(0);
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.select(total - 1);
    }

    /// Start over on a fresh result list
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.ensure_visible(index);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}
