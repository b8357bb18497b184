//! Verbose display

// Imports
use {
	crate::{AnyError, Inner, Stack},
	core::fmt,
	itertools::{Itertools, Position as ItertoolsPos},
	std::error::Error as StdError,
};

/// Verbose display for [`WrappedError`](crate::WrappedError).
///
/// Renders each message of the chain on its own line, as a tree, followed by the
/// stack captured nearest to the root, if any.
pub struct VerboseDisplay<'a> {
	/// Root error
	root: &'a Inner,
}

impl fmt::Debug for VerboseDisplay<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match f.alternate() {
			true => f.debug_struct("VerboseDisplay").field("root", self.root).finish(),
			false => write!(f, "{self}"),
		}
	}
}

impl<'a> VerboseDisplay<'a> {
	/// Creates a new verbose display
	pub(crate) const fn new(root: &'a Inner) -> Self {
		Self { root }
	}

	/// Formats a single message at `depth` within the tree
	fn fmt_msg(f: &mut fmt::Formatter<'_>, msg: &str, depth: usize) -> fmt::Result {
		// Note: We split on `\n` instead of using `lines` so empty messages still get their own line
		for (pos, line) in msg.split('\n').with_position() {
			match pos {
				ItertoolsPos::First | ItertoolsPos::Only =>
					if depth != 0 {
						f.write_str("\n")?;
						self::indent(f, depth - 1)?;
						f.write_str("└─")?;
					},
				ItertoolsPos::Middle | ItertoolsPos::Last => {
					f.write_str("\n")?;
					self::indent(f, depth)?;
				},
			}

			f.write_str(line)?;
		}

		Ok(())
	}
}

impl fmt::Display for VerboseDisplay<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Self::fmt_msg(f, self.root.msg(), 0)?;

		// Note: We only keep the stack nearest to the root, the ones above it are redundant
		let mut stack: Option<&Stack> = self.root.stack();
		let mut cur = self.root.cause();
		let mut depth = 1;
		loop {
			match cur {
				AnyError::Wrapped(err) => {
					Self::fmt_msg(f, err.message(), depth)?;
					if let Some(err_stack) = err.stack() {
						stack = Some(err_stack);
					}
					cur = err.cause();
					depth += 1;
				},

				// Foreign errors are the root, but may still have their own sources
				AnyError::Foreign(err) => {
					Self::fmt_msg(f, &crate::render_message(format_args!("{err}")), depth)?;

					let mut source = StdError::source(&**err);
					while let Some(err) = source {
						depth += 1;
						Self::fmt_msg(f, &crate::render_message(format_args!("{err}")), depth)?;
						source = err.source();
					}
					break;
				},
			}
		}

		if let Some(stack) = stack {
			write!(f, "\n{stack}")?;
		}

		Ok(())
	}
}

/// Writes the indentation for `depth`
fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
	for _ in 0..depth {
		f.write_str("  ")?;
	}

	Ok(())
}

#[cfg(test)]
mod test {
	use {
		crate::{FixedStack, Frame, WrappedError},
		std::io,
	};

	#[test]
	fn empty_message() {
		let err = WrappedError::with_message(io::Error::other("B"), "");
		assert_eq!(err.verbose().to_string(), "\n└─B");
	}

	#[test]
	fn stack_after_messages() {
		let stack = FixedStack::new([Frame::new("app::open", "src/app.rs", 3)]);
		let err = WrappedError::wrap_with_capture(io::Error::other("root\ncause"), "open failed", stack);
		let err = WrappedError::with_message(err, "A");

		assert_eq!(
			err.verbose().to_string(),
			"A
└─open failed
  └─root
    cause
stack backtrace:
   0: app::open
             at src/app.rs:3"
		);
	}

	#[test]
	fn debug() {
		let err = WrappedError::with_message(io::Error::other("B"), "A");
		assert_eq!(format!("{:?}", err.verbose()), err.verbose().to_string());
		assert!(format!("{:#?}", err.verbose()).starts_with("VerboseDisplay {\n    root: WrappedError {"));
	}
}
