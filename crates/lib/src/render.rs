use crate::config::OutputFormat;
use crate::types::Book;
use std::io::{self, Write};

/// Writes one line per book, in order.
pub fn render_books<W: Write>(out: &mut W, books: &[Book], format: OutputFormat) -> io::Result<()> {
    for book in books {
        match format {
            OutputFormat::Text => writeln!(out, "{book}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, book)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()
}
