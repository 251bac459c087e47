/// Fixed-width table rendering for the stream listing.

/// Column titles of the stream table, in render order.
pub const STREAM_TABLE_HEADER: [&str; 4] = ["#", "Size", "Format", "Bit Rate"];

/// Renders bordered rows of a fixed total width.
///
/// Column width is `(width - column_count) / column_count`; the integer
/// division can leave the row a few characters short of `width`, which is
/// observable output and kept as-is.
pub struct TableRenderer {
    width: usize,
}

impl TableRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn row(&self, columns: &[&str]) -> String {
        let column_width = (self.width - columns.len()) / columns.len();
        let mut row = String::from("|");

        for column in columns {
            row.push_str(&align_center(column, column_width));
            row.push('|');
        }

        row
    }

    pub fn divider(&self, draw_char: char) -> String {
        draw_char.to_string().repeat(self.width)
    }

    pub fn print_row(&self, columns: &[&str]) {
        println!("{}", self.row(columns));
    }

    pub fn print_divider(&self) {
        println!("{}", self.divider('-'));
    }
}

/// Centers `text` within `width` characters.
///
/// Over-long text is truncated to `width - 3` characters plus an ellipsis;
/// empty text becomes all spaces. Centering pads right then left, so with
/// an odd amount of padding the text sits one character left of true
/// center.
pub fn align_center(text: &str, width: usize) -> String {
    let truncated;
    let text = if text.chars().count() > width {
        truncated = format!(
            "{}...",
            text.chars()
                .take(width.saturating_sub(3))
                .collect::<String>()
        );
        truncated.as_str()
    } else {
        text
    };

    if text.is_empty() {
        return " ".repeat(width);
    }

    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let inner = width - (width - len) / 2;
    let padded = format!("{text:<inner$}");
    format!("{padded:>width$}")
}
