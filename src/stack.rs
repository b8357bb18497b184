//! Stack capture

// Imports
use {core::fmt, std::sync::Arc};

/// Default maximum number of frames captured per stack
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Maximum number of leading frames walked before giving up on finding the caller
const MAX_SKIPPED_FRAMES: usize = 32;

/// Path prefixes of the stack walker itself
const WALKER_PREFIXES: &[&str] = &["backtrace::", "_Unwind"];

/// Functions of the capture machinery, as `(owner, method)`.
///
/// The owner is the trait for trait methods, the type for inherent methods and
/// the module for free functions. Leading frames matching these are skipped, so
/// the first recorded frame is the function that wrapped the error.
const INTERNAL_FUNCTIONS: &[(&str, &str)] = &[
	("CaptureStack", "capture"),
	("CaptureStack", "capture_frames"),
	("WrappedError", "wrap"),
	("WrappedError", "wrap_with_capture"),
	("Wrap", "wrap"),
	("Wrap", "wrap_with"),
	("error_context", "wrap"),
	("Result", "map_err"),
	("Option", "map"),
];

/// A single call-site frame
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct Frame {
	/// Function name
	pub function: String,

	/// Source file
	pub file: Option<String>,

	/// Line within `file`
	pub line: Option<u32>,
}

impl Frame {
	/// Creates a new frame
	pub fn new<F, P>(function: F, file: P, line: u32) -> Self
	where
		F: Into<String>,
		P: Into<String>,
	{
		Self {
			function: function.into(),
			file:     Some(file.into()),
			line:     Some(line),
		}
	}

	/// Creates a frame with only a function name
	pub fn function<F>(function: F) -> Self
	where
		F: Into<String>,
	{
		Self {
			function: function.into(),
			file:     None,
			line:     None,
		}
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.function)?;
		match (&self.file, self.line) {
			(Some(file), Some(line)) => write!(f, "\n             at {file}:{line}"),
			(Some(file), None) => write!(f, "\n             at {file}"),
			(None, _) => Ok(()),
		}
	}
}

/// A captured call stack.
///
/// Cheap to clone, and immutable once captured.
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct Stack {
	/// Frames, innermost call first
	frames: Arc<[Frame]>,
}

impl Stack {
	/// Creates a stack from frames
	pub fn from_frames<I>(frames: I) -> Self
	where
		I: IntoIterator<Item = Frame>,
	{
		Self {
			frames: frames.into_iter().collect(),
		}
	}

	/// Returns all frames, innermost call first
	#[must_use]
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns the number of frames
	#[must_use]
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns if no frames were captured
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

impl fmt::Display for Stack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "stack backtrace:")?;
		for (idx, frame) in self.frames.iter().enumerate() {
			write!(f, "\n{idx:>4}: {frame}")?;
		}

		Ok(())
	}
}

/// Capability to capture the current call stack.
///
/// Implementations must be bounded: at most `max_depth()` frames are kept.
pub trait CaptureStack {
	/// Maximum number of frames to keep
	fn max_depth(&self) -> usize {
		DEFAULT_MAX_DEPTH
	}

	/// Captures the frames of the current thread, innermost call first
	fn capture_frames(&self) -> Vec<Frame>;

	/// Captures a bounded stack
	fn capture(&self) -> Stack {
		let max_depth = self.max_depth();
		Stack::from_frames(self.capture_frames().into_iter().take(max_depth))
	}
}

impl<C> CaptureStack for &C
where
	C: ?Sized + CaptureStack,
{
	fn max_depth(&self) -> usize {
		(**self).max_depth()
	}

	fn capture_frames(&self) -> Vec<Frame> {
		(**self).capture_frames()
	}
}

/// Captures the real stack of the current thread through [`backtrace`]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Backtraced {
	/// Maximum depth
	max_depth: usize,
}

impl Backtraced {
	/// Creates a capturer with the default depth
	#[must_use]
	pub const fn new() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Sets the maximum depth
	#[must_use]
	pub const fn with_max_depth(self, max_depth: usize) -> Self {
		Self { max_depth }
	}
}

impl Default for Backtraced {
	fn default() -> Self {
		Self::new()
	}
}

impl CaptureStack for Backtraced {
	fn max_depth(&self) -> usize {
		self.max_depth
	}

	fn capture_frames(&self) -> Vec<Frame> {
		let mut collector = Collector::new(self.max_depth);
		if self.max_depth == 0 {
			return collector.frames;
		}

		// Note: Frames are only resolved as they're walked, so stopping early bounds the cost too
		backtrace::trace(|raw_frame| {
			let mut symbols = vec![];
			backtrace::resolve_frame(raw_frame, |symbol| {
				symbols.push(Frame {
					function: symbol
						.name()
						.map_or_else(|| "<unknown>".to_owned(), |name| format!("{name:#}")),
					file:     symbol.filename().map(|file| file.display().to_string()),
					line:     symbol.lineno(),
				});
			});

			collector.push(symbols)
		});

		collector.frames
	}
}

/// Serves a fixed set of frames, regardless of the caller.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FixedStack {
	/// Frames
	frames: Vec<Frame>,
}

impl FixedStack {
	/// Creates a new fixed stack
	pub fn new<I>(frames: I) -> Self
	where
		I: IntoIterator<Item = Frame>,
	{
		Self {
			frames: frames.into_iter().collect(),
		}
	}
}

impl CaptureStack for FixedStack {
	fn capture_frames(&self) -> Vec<Frame> {
		self.frames.clone()
	}
}

/// Collects frames while walking the stack
#[derive(Debug)]
struct Collector {
	/// Frames kept so far
	frames: Vec<Frame>,

	/// Maximum depth
	max_depth: usize,

	/// Whether we're still skipping the capture machinery
	skipping: bool,

	/// Physical frames walked
	walked: usize,
}

impl Collector {
	/// Creates a new collector
	const fn new(max_depth: usize) -> Self {
		Self {
			frames: vec![],
			max_depth,
			skipping: true,
			walked: 0,
		}
	}

	/// Adds the symbols of a physical frame, innermost first.
	///
	/// A physical frame has multiple symbols when functions were inlined into it.
	/// Returns whether the walk should continue.
	fn push<I>(&mut self, symbols: I) -> bool
	where
		I: IntoIterator<Item = Frame>,
	{
		self.walked += 1;
		for frame in symbols {
			if self.skipping && self::is_internal(&frame.function) {
				continue;
			}
			self.skipping = false;

			if self.frames.len() >= self.max_depth {
				break;
			}
			self.frames.push(frame);
		}

		self.frames.len() < self.max_depth && self.walked < self.max_depth + MAX_SKIPPED_FRAMES
	}
}

/// Returns whether a function belongs to the capture machinery
fn is_internal(function: &str) -> bool {
	if WALKER_PREFIXES.iter().any(|prefix| function.starts_with(prefix)) {
		return true;
	}

	let path = self::strip_generics(function);
	self::owner_and_method(&path).is_some_and(|key| INTERNAL_FUNCTIONS.contains(&key))
}

/// Removes all generic arguments from a function path.
///
/// A leading `<` starts a qualified path (`<Type as Trait>::method`) and is kept.
fn strip_generics(function: &str) -> String {
	let mut path = String::with_capacity(function.len());
	let mut depth = 0_usize;
	let mut prev = None;
	for (idx, ch) in function.char_indices() {
		match ch {
			'<' if idx == 0 => path.push(ch),
			'<' => {
				// Turbofish, `f::<T>`
				if depth == 0 && path.ends_with("::") {
					path.truncate(path.len() - 2);
				}
				depth += 1;
			},
			// Note: `->` within a function pointer type doesn't close anything
			'>' if depth > 0 && prev != Some('-') => depth -= 1,
			_ if depth > 0 => (),
			_ => path.push(ch),
		}
		prev = Some(ch);
	}

	path
}

/// Returns the owner and method of a function path without generics.
///
/// Closures are attributed to the function they're defined in.
fn owner_and_method(path: &str) -> Option<(&str, &str)> {
	let mut path = path;
	loop {
		match path.rsplit_once("::") {
			Some((parent, last)) if last.starts_with('{') => path = parent,
			_ => break,
		}
	}

	let (owner_path, method) = match path.strip_prefix('<') {
		// `<Type as Trait>::method` or `<Type>::method`
		Some(qualified) => {
			let (inner, method) = qualified.rsplit_once(">::")?;
			let owner_path = inner.split_once(" as ").map_or(inner, |(_, trait_path)| trait_path);
			(owner_path, method)
		},
		None => path.rsplit_once("::")?,
	};
	let owner = owner_path.rsplit("::").next().unwrap_or(owner_path);

	Some((owner, method))
}
