//! Opening a missing file, end to end

// Imports
use {
	error_context::{AnyError, Wrap, WrappedError, fs, quote, wrapf},
	std::io,
};

#[test]
fn missing_file() {
	let dir = tempfile::tempdir().expect("Unable to create temporary directory");

	let err = fs::open_and_read(dir.path().join("missing.txt")).expect_err("File shouldn't exist");
	assert_eq!(err.kind(), io::ErrorKind::NotFound);
	let foreign_msg = err.to_string();
	let foreign = AnyError::from(err);

	let err = wrapf!(Some(foreign.clone()), "failed to open {}", quote("missing.txt")).expect("Cause was present");
	assert_eq!(err.to_string(), format!(r#"failed to open "missing.txt": {foreign_msg}"#));
	let stack = err.stack().expect("Stacked wraps have a stack");
	assert!(
		stack.frames()[0].function.contains("missing_file"),
		"Stack should start at the wrap site, found {stack}"
	);

	// The root is the very same foreign error
	let err = AnyError::from(err);
	assert_eq!(error_context::cause(&err), &foreign);
	assert_eq!(
		error_context::cause(&err).downcast_ref::<io::Error>().map(io::Error::kind),
		Some(io::ErrorKind::NotFound)
	);
}

#[test]
fn layered_context() {
	fn load(dir: &std::path::Path) -> Result<Vec<u8>, WrappedError> {
		fs::read_config_in(dir).with_message("unable to load settings")
	}

	let dir = tempfile::tempdir().expect("Unable to create temporary directory");
	let err = load(dir.path()).expect_err("Config shouldn't exist");

	let messages = err
		.causes()
		.filter_map(AnyError::as_wrapped)
		.map(WrappedError::message)
		.collect::<Vec<_>>();
	assert_eq!(messages, ["could not read config", "open failed"]);

	// Only the wrap nearest to the failure captured a stack
	let verbose = err.verbose().to_string();
	assert_eq!(verbose.matches("stack backtrace:").count(), 1);
	let stack_pos = verbose.find("stack backtrace:").expect("Stack should be displayed");
	let root_pos = verbose.find(&err.root_cause().to_string()).expect("Root should be displayed");
	assert!(root_pos < stack_pos);
}
