//! Quoting of untrusted text

// Imports
use core::fmt::{self, Write};

/// Quotes `text` for embedding within a message.
///
/// The result is surrounded by `"`. Quotes, backslashes and control characters
/// are escaped, everything else (including non-ascii text) is kept as-is, so
/// the delimiters can't be forged by the contents.
#[must_use]
pub const fn quote(text: &str) -> Quoted<'_> {
	Quoted(text)
}

/// Quoted display of a string. See [`quote`].
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_char('"')?;
		for ch in self.0.chars() {
			match ch {
				'"' => f.write_str(r#"\""#)?,
				'\\' => f.write_str(r"\\")?,
				'\n' => f.write_str(r"\n")?,
				'\r' => f.write_str(r"\r")?,
				'\t' => f.write_str(r"\t")?,
				ch if ch.is_control() => write!(f, r"\u{{{:x}}}", u32::from(ch))?,
				ch => f.write_char(ch)?,
			}
		}
		f.write_char('"')
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn plain() {
		assert_eq!(quote("missing.txt").to_string(), r#""missing.txt""#);
		assert_eq!(quote("").to_string(), r#""""#);
	}

	#[test]
	fn non_ascii() {
		assert_eq!(quote("données/日本語.txt").to_string(), "\"données/日本語.txt\"");
		assert_eq!(quote("🦀 crab").to_string(), "\"🦀 crab\"");
	}

	#[test]
	fn escapes() {
		assert_eq!(quote(r#"a"b"#).to_string(), r#""a\"b""#);
		assert_eq!(quote(r"C:\tmp").to_string(), r#""C:\\tmp""#);
		assert_eq!(quote("a\nb\tc").to_string(), r#""a\nb\tc""#);
		assert_eq!(quote("\u{7}bell").to_string(), r#""\u{7}bell""#);
	}
}
