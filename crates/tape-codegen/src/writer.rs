//! Line-oriented text buffer with block indentation.

/// Accumulates generated Go source one line at a time.
#[derive(Debug, Clone)]
pub struct GoWriter {
    out: String,
    depth: usize,
    indent: String,
}

impl GoWriter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            indent: indent.into(),
        }
    }

    /// Current block depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(&self.indent);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write a line ending in `{` and indent what follows.
    ///
    /// An empty header opens a bare block.
    pub fn open(&mut self, header: impl AsRef<str>) {
        match header.as_ref() {
            "" => self.line("{"),
            header => self.line(format!("{header} {{")),
        }
        self.depth += 1;
    }

    /// Close the current block and open the next arm of the same
    /// statement on one line: `} else {`.
    pub fn branch(&mut self, header: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(format!("}} {} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Dedent and write the closing `}`.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub fn finish(self) -> String {
        self.out
    }
}
