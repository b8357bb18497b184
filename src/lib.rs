//! Error context
//!
//! This crate provides an error type, [`WrappedError`], that decorates an existing error
//! with a contextual message, building up a chain of causes as errors propagate upwards.
//!
//! It is [`Send`], [`Sync`], `'static`, and cheaply [`Clone`]-able.
//!
//! There are two ways of wrapping an error:
//! - [`wrap`] (and [`wrapf!`]), used nearest the failure, which also captures the call stack.
//! - [`with_message`], used at the layers above it, which only adds a message.
//!
//! Wrapping an absent error (`None`, or an `Ok` result) is a no-op.
//!
//! Any error within a chain is represented by [`AnyError`], which is either a wrapped
//! error, or a foreign error that isn't produced by this crate and is always the root.
//!
//! The short form (via [`Display`](fmt::Display)) renders the messages joined by `": "`,
//! while the verbose form (via [`WrappedError::verbose`] or [`Debug`](fmt::Debug)) renders
//! one message per line, followed by the stack captured nearest to the root.

// Modules
mod any;
pub mod fs;
mod quote;
pub mod stack;
mod verbose;

// Exports
pub use self::{
	any::{AnyError, Chain},
	quote::{Quoted, quote},
	stack::{Backtraced, CaptureStack, FixedStack, Frame, Stack},
	verbose::VerboseDisplay,
};

// Imports
use {
	core::fmt,
	std::{
		borrow::Cow,
		error::Error as StdError,
		hash::{Hash, Hasher},
		sync::Arc,
	},
};

/// Inner representation.
enum Inner {
	/// Wrap with a captured stack
	Stacked {
		/// Message
		msg: Cow<'static, str>,

		/// Cause
		cause: AnyError,

		/// Stack captured when wrapping
		stack: Stack,
	},

	/// Wrap with only a message
	Plain {
		/// Message
		msg: Cow<'static, str>,

		/// Cause
		cause: AnyError,
	},
}

impl Inner {
	/// Returns the message
	fn msg(&self) -> &str {
		match self {
			Self::Stacked { msg, .. } | Self::Plain { msg, .. } => &**msg,
		}
	}

	/// Returns the cause
	const fn cause(&self) -> &AnyError {
		match self {
			Self::Stacked { cause, .. } | Self::Plain { cause, .. } => cause,
		}
	}

	/// Returns the stack, if captured
	const fn stack(&self) -> Option<&Stack> {
		match self {
			Self::Stacked { stack, .. } => Some(stack),
			Self::Plain { .. } => None,
		}
	}
}

impl StdError for Inner {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		Some(self.cause().as_std_error())
	}
}

impl PartialEq for Inner {
	fn eq(&self, other: &Self) -> bool {
		// Note: Stacks are diagnostics only, they don't take part in equality
		match (self, other) {
			(
				Self::Stacked {
					msg: lhs_msg,
					cause: lhs_cause,
					..
				},
				Self::Stacked {
					msg: rhs_msg,
					cause: rhs_cause,
					..
				},
			) |
			(
				Self::Plain {
					msg: lhs_msg,
					cause: lhs_cause,
				},
				Self::Plain {
					msg: rhs_msg,
					cause: rhs_cause,
				},
			) => lhs_msg == rhs_msg && lhs_cause == rhs_cause,
			_ => false,
		}
	}
}

impl Hash for Inner {
	fn hash<H: Hasher>(&self, state: &mut H) {
		core::mem::discriminant(self).hash(state);
		self.msg().hash(state);
		self.cause().hash(state);
	}
}

impl fmt::Display for Inner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.msg())
	}
}

impl fmt::Debug for Inner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match f.alternate() {
			// With `:#?`, use a normal debug
			true => match self {
				Self::Stacked { msg, cause, stack } => f
					.debug_struct("WrappedError")
					.field("msg", msg)
					.field("cause", cause)
					.field("stack", stack)
					.finish(),
				Self::Plain { msg, cause } => f
					.debug_struct("WrappedError")
					.field("msg", msg)
					.field("cause", cause)
					.finish(),
			},

			// Otherwise, use the verbose form
			false => write!(f, "{}", VerboseDisplay::new(self)),
		}
	}
}

/// An error decorated with a contextual message.
///
/// Created with [`wrap`], [`wrapf!`] or [`with_message`], or through the [`Wrap`] trait.
pub struct WrappedError {
	/// Inner
	inner: Arc<Inner>,
}

impl WrappedError {
	/// Wraps `cause` with a message, capturing the current stack
	#[must_use]
	pub fn wrap<E, M>(cause: E, msg: M) -> Self
	where
		E: Into<AnyError>,
		M: Into<Cow<'static, str>>,
	{
		Self::wrap_with_capture(cause, msg, Backtraced::new())
	}

	/// Wraps `cause` with a message, capturing the stack with `capture`
	#[must_use]
	pub fn wrap_with_capture<E, M, C>(cause: E, msg: M, capture: C) -> Self
	where
		E: Into<AnyError>,
		M: Into<Cow<'static, str>>,
		C: CaptureStack,
	{
		Self {
			inner: Arc::new(Inner::Stacked {
				msg:   msg.into(),
				cause: cause.into(),
				stack: capture.capture(),
			}),
		}
	}

	/// Wraps `cause` with only a message
	#[must_use]
	pub fn with_message<E, M>(cause: E, msg: M) -> Self
	where
		E: Into<AnyError>,
		M: Into<Cow<'static, str>>,
	{
		Self {
			inner: Arc::new(Inner::Plain {
				msg:   msg.into(),
				cause: cause.into(),
			}),
		}
	}

	/// Returns the message of this layer only
	#[must_use]
	pub fn message(&self) -> &str {
		self.inner.msg()
	}

	/// Returns the immediate cause
	#[must_use]
	pub fn cause(&self) -> &AnyError {
		// Note: `Arc<Inner>` is also an `Error`, so method syntax would find `Error::cause`
		Inner::cause(&self.inner)
	}

	/// Returns the root of the chain
	#[must_use]
	pub fn root_cause(&self) -> &AnyError {
		self.cause().root_cause()
	}

	/// Returns an iterator over all causes, starting with the immediate one
	#[must_use]
	pub fn causes(&self) -> Chain<'_> {
		self.cause().chain()
	}

	/// Returns the stack captured by this layer, if any
	#[must_use]
	pub fn stack(&self) -> Option<&Stack> {
		self.inner.stack()
	}

	/// Returns the stack captured nearest to the root of the chain.
	///
	/// This is the stack shown in the verbose form.
	#[must_use]
	pub fn root_stack(&self) -> Option<&Stack> {
		self.causes()
			.filter_map(AnyError::as_wrapped)
			.filter_map(Self::stack)
			.last()
			.or_else(|| self.stack())
	}

	/// Returns an object that displays the verbose form of this error
	#[must_use]
	pub fn verbose(&self) -> VerboseDisplay<'_> {
		VerboseDisplay::new(&self.inner)
	}

	/// Returns this type as a [`std::error::Error`]
	#[must_use]
	pub fn as_std_error(&self) -> &(dyn StdError + 'static) {
		&*self.inner
	}

	/// Converts this type as into a [`std::error::Error`]
	#[must_use]
	pub fn into_std_error(self) -> Arc<dyn StdError + Send + Sync + 'static> {
		self.inner as Arc<_>
	}
}

impl Clone for WrappedError {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl PartialEq for WrappedError {
	fn eq(&self, other: &Self) -> bool {
		// If we're the same Arc, we're the same error
		if Arc::ptr_eq(&self.inner, &other.inner) {
			return true;
		}

		// Otherwise, perform a deep comparison
		self.inner == other.inner
	}
}

impl Eq for WrappedError {}

impl Hash for WrappedError {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.inner.hash(state);
	}
}

impl fmt::Display for WrappedError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.message(), self.cause())
	}
}

impl fmt::Debug for WrappedError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.inner, f)
	}
}

/// Wraps `cause` with a message, capturing the current stack.
///
/// Returns `None` if there's no cause.
pub fn wrap<E, M>(cause: Option<E>, msg: M) -> Option<WrappedError>
where
	E: Into<AnyError>,
	M: Into<Cow<'static, str>>,
{
	cause.wrap(msg)
}

/// Wraps `cause` with only a message.
///
/// Returns `None` if there's no cause.
pub fn with_message<E, M>(cause: Option<E>, msg: M) -> Option<WrappedError>
where
	E: Into<AnyError>,
	M: Into<Cow<'static, str>>,
{
	cause.with_message(msg)
}

/// Returns the immediate cause of `err`, if it has one
#[must_use]
pub fn unwrap(err: &AnyError) -> Option<&AnyError> {
	err.unwrap()
}

/// Returns the root of the chain of `err`
#[must_use]
pub fn cause(err: &AnyError) -> &AnyError {
	err.root_cause()
}

/// Renders a message from format arguments.
///
/// Never panics: If any argument fails to format, the partial output is kept and
/// a marker is appended.
#[must_use]
pub fn render_message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
	if let Some(msg) = args.as_str() {
		return Cow::Borrowed(msg);
	}

	let mut msg = String::new();
	if fmt::write(&mut msg, args).is_err() {
		msg.push_str(" <formatting failed>");
	}

	Cow::Owned(msg)
}

/// Wrapping for `Result`-like types
pub trait Wrap {
	type Output;

	/// Wraps the error with a message, capturing the current stack
	fn wrap<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>;

	/// Wraps the error with a lazily-created message, capturing the current stack
	fn wrap_with<F, M>(self, with_msg: F) -> Self::Output
	where
		F: FnOnce() -> M,
		M: fmt::Display;

	/// Wraps the error with only a message
	fn with_message<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>;
}

impl<T, E> Wrap for Result<T, E>
where
	E: Into<AnyError>,
{
	type Output = Result<T, WrappedError>;

	fn wrap<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>,
	{
		self.map_err(|err| WrappedError::wrap(err, msg))
	}

	fn wrap_with<F, M>(self, with_msg: F) -> Self::Output
	where
		F: FnOnce() -> M,
		M: fmt::Display,
	{
		self.map_err(|err| WrappedError::wrap(err, self::render_message(format_args!("{}", with_msg()))))
	}

	fn with_message<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>,
	{
		self.map_err(|err| WrappedError::with_message(err, msg))
	}
}

/// Wraps an optional error, where `None` means there's no error
impl<E> Wrap for Option<E>
where
	E: Into<AnyError>,
{
	type Output = Option<WrappedError>;

	fn wrap<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>,
	{
		self.map(|err| WrappedError::wrap(err, msg))
	}

	fn wrap_with<F, M>(self, with_msg: F) -> Self::Output
	where
		F: FnOnce() -> M,
		M: fmt::Display,
	{
		self.map(|err| WrappedError::wrap(err, self::render_message(format_args!("{}", with_msg()))))
	}

	fn with_message<M>(self, msg: M) -> Self::Output
	where
		M: Into<Cow<'static, str>>,
	{
		self.map(|err| WrappedError::with_message(err, msg))
	}
}

/// Wraps an optional error with a formatted message, capturing the current stack.
///
/// Returns `None` if there's no cause. Untrusted text should be embedded with [`quote`].
#[macro_export]
macro_rules! wrapf {
	($cause:expr, $($fmt:tt)+) => {
		$crate::wrap($cause, $crate::render_message(::core::format_args!($($fmt)+)))
	};
}
