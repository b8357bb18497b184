//! Wrapped and foreign errors

// Imports
use {
	crate::WrappedError,
	core::fmt,
	std::{
		error::Error as StdError,
		hash::{Hash, Hasher},
		sync::Arc,
	},
};

/// Any error within a cause chain.
///
/// Either an error produced by this crate, which has a cause, or a foreign
/// error, which is always the root of the chain.
#[derive(Clone)]
pub enum AnyError {
	/// Error produced by wrapping
	Wrapped(WrappedError),

	/// Foreign error
	Foreign(Arc<dyn StdError + Send + Sync + 'static>),
}

impl AnyError {
	/// Creates a foreign error
	pub fn foreign<E>(err: E) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		Self::Foreign(Arc::new(err))
	}

	/// Creates a foreign error from a boxed error
	#[must_use]
	pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
		Self::Foreign(Arc::from(err))
	}

	/// Returns the immediate cause of this error.
	///
	/// Foreign errors are roots, so they have no cause.
	#[must_use]
	pub fn unwrap(&self) -> Option<&Self> {
		match self {
			Self::Wrapped(err) => Some(err.cause()),
			Self::Foreign(_) => None,
		}
	}

	/// Returns the root of the chain.
	///
	/// A foreign error is returned as-is.
	#[must_use]
	pub fn root_cause(&self) -> &Self {
		let mut cur = self;
		while let Some(next) = cur.unwrap() {
			cur = next;
		}

		cur
	}

	/// Returns an iterator over the chain, starting with this error
	#[must_use]
	pub const fn chain(&self) -> Chain<'_> {
		Chain { next: Some(self) }
	}

	/// Finds the first error in the chain matching `pred`
	pub fn find<P>(&self, mut pred: P) -> Option<&Self>
	where
		P: FnMut(&Self) -> bool,
	{
		self.chain().find(|err| pred(err))
	}

	/// Finds the first foreign error in the chain of type `E`
	#[must_use]
	pub fn downcast_ref<E>(&self) -> Option<&E>
	where
		E: StdError + 'static,
	{
		self.chain().find_map(|err| err.as_foreign()?.downcast_ref::<E>())
	}

	/// Returns this error as a wrapped error, if it is one
	#[must_use]
	pub const fn as_wrapped(&self) -> Option<&WrappedError> {
		match self {
			Self::Wrapped(err) => Some(err),
			Self::Foreign(_) => None,
		}
	}

	/// Returns this error as a foreign error, if it is one
	#[must_use]
	pub fn as_foreign(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
		match self {
			Self::Wrapped(_) => None,
			Self::Foreign(err) => Some(&**err),
		}
	}

	/// Returns this type as a [`std::error::Error`]
	#[must_use]
	pub fn as_std_error(&self) -> &(dyn StdError + 'static) {
		match self {
			Self::Wrapped(err) => err.as_std_error(),
			Self::Foreign(err) => &**err,
		}
	}
}

impl<E> From<E> for AnyError
where
	E: StdError + Send + Sync + 'static,
{
	fn from(err: E) -> Self {
		Self::foreign(err)
	}
}

impl From<WrappedError> for AnyError {
	fn from(err: WrappedError) -> Self {
		Self::Wrapped(err)
	}
}

impl PartialEq for AnyError {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Wrapped(lhs), Self::Wrapped(rhs)) => lhs == rhs,
			// Note: Foreign errors can't be compared, so we only check if they're the same error.
			(Self::Foreign(lhs), Self::Foreign(rhs)) => Arc::ptr_eq(lhs, rhs),
			_ => false,
		}
	}
}

impl Eq for AnyError {}

impl Hash for AnyError {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match self {
			Self::Wrapped(err) => err.hash(state),
			Self::Foreign(err) => Arc::as_ptr(err).cast::<()>().hash(state),
		}
	}
}

impl fmt::Display for AnyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Wrapped(err) => fmt::Display::fmt(err, f),
			Self::Foreign(err) => fmt::Display::fmt(err, f),
		}
	}
}

impl fmt::Debug for AnyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Wrapped(err) => fmt::Debug::fmt(err, f),
			Self::Foreign(err) => fmt::Debug::fmt(err, f),
		}
	}
}

/// Iterator over a cause chain, outermost error first.
#[derive(Clone, Debug)]
pub struct Chain<'a> {
	/// Next error
	next: Option<&'a AnyError>,
}

impl<'a> Iterator for Chain<'a> {
	type Item = &'a AnyError;

	fn next(&mut self) -> Option<Self::Item> {
		let cur = self.next?;
		self.next = cur.unwrap();
		Some(cur)
	}
}
