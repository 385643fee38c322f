use ansi_term::{Color, Style};
use anyhow::Result;
use similar::{ChangeTag, TextDiff};

use std::io::Write;

/// Diff styles for colored terminal output.
#[derive(Default, Clone)]
pub struct DiffStyles {
  pub insert: Style,
  pub delete: Style,
}

impl DiffStyles {
  pub fn colored() -> Self {
    Self {
      insert: Style::new().fg(Color::Green),
      delete: Style::new().fg(Color::Red),
    }
  }

  pub fn no_color() -> Self {
    Self::default()
  }
}

/// Prints a unified-ish line diff between `old` and `new` to `writer`.
pub fn print_diff(styles: &DiffStyles, path: &str, old: &str, new: &str, writer: &mut impl Write) -> Result<()> {
  writeln!(writer, "{}", Style::new().bold().paint(path))?;
  let diff = TextDiff::from_lines(old, new);
  for change in diff.iter_all_changes() {
    let (sign, style) = match change.tag() {
      ChangeTag::Delete => ("-", styles.delete),
      ChangeTag::Insert => ("+", styles.insert),
      ChangeTag::Equal => (" ", Style::new()),
    };
    write!(writer, "{}", style.paint(sign))?;
    write!(writer, "{}", style.paint(change.to_string()))?;
  }
  Ok(())
}
