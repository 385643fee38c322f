/*!
The canonical runestone rewrite rule pipeline: trim trailing whitespace,
normalize hex/octal/float literals, space infix
operators and assignments, tighten colon spacing, and rewrite `for`-loop
headers to use `in`. The engine core has no knowledge of any of these; each
rule is an ordinary implementation of its `Rule` trait.
*/

mod assignment_spacing;
mod colon_spacing;
mod float_literals;
mod for_in;
mod hex_literals;
mod octal_literals;
mod operator_spacing;
mod render;
mod trim_whitespace;

pub use assignment_spacing::SpacesAroundAssignments;
pub use colon_spacing::NoSpacesAroundColonAndSimilar;
pub use float_literals::NormalizeFloatLiterals;
pub use for_in::ForLoopUsesIn;
pub use hex_literals::NormalizeHexIntegerLiterals;
pub use octal_literals::NormalizeOctalIntegerLiterals;
pub use operator_spacing::SpacesAroundOperators;
pub use trim_whitespace::TrimTrailingWhitespace;

use runestone_core::RulePipeline;

/// The canonical pipeline order. The first rule to return a non-`Accepted`
/// outcome for a given node wins; callers may append further rules after
/// these eight without disturbing the required order.
pub fn canonical_pipeline() -> RulePipeline {
  vec![
    Box::new(TrimTrailingWhitespace),
    Box::new(NormalizeHexIntegerLiterals),
    Box::new(NormalizeOctalIntegerLiterals),
    Box::new(NormalizeFloatLiterals),
    Box::new(SpacesAroundOperators),
    Box::new(SpacesAroundAssignments),
    Box::new(NoSpacesAroundColonAndSimilar),
    Box::new(ForLoopUsesIn),
  ]
}

#[cfg(test)]
mod test {
  use super::*;
  use runestone_core::{format_string, ContextFlags};

  fn format(src: &str) -> String {
    format_string(
      src,
      |s| runestone_syntax::parse(s).expect("parse"),
      ContextFlags::default(),
      canonical_pipeline(),
    )
    .expect("format")
  }

  #[test]
  fn s1_empty_input_idempotent() {
    assert_eq!(format(""), "");
  }

  #[test]
  fn s2_interior_whitespace_preserved_trailing_trimmed() {
    assert_eq!(format("  x  \n"), "  x\n");
  }

  #[test]
  fn s3_hex_normalization() {
    assert_eq!(format("0xAb"), "0xab");
  }

  #[test]
  fn octal_normalization() {
    assert_eq!(format("0O17"), "0o17");
  }

  #[test]
  fn float_exponent_lowercased() {
    assert_eq!(format("1.5E-3"), "1.5e-3");
  }

  #[test]
  fn s4_operator_spacing() {
    assert_eq!(format("a+b"), "a + b");
  }

  #[test]
  fn assignment_spacing_applied() {
    assert_eq!(format("x=1"), "x = 1");
  }

  #[test]
  fn colon_spacing_tightened() {
    assert_eq!(format("1 : 3"), "1:3");
  }

  #[test]
  fn s5_for_loop_in_normalization() {
    assert_eq!(format("for i=1:3\nend"), "for i in 1:3\nend");
  }

  #[test]
  fn idempotent_on_previously_formatted_output() {
    let once = format("for i=1:3\n  y=a+b\nend");
    let twice = format(&once);
    assert_eq!(once, twice);
  }
}
