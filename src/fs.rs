//! File helpers

// Imports
use {
	crate::{Wrap, WrappedError},
	std::{
		env,
		fs::File,
		io::{self, Read},
		path::{Path, PathBuf},
	},
};

/// Opens and reads a file.
///
/// Errors are returned as-is, without any context.
pub fn open_and_read<P>(path: P) -> io::Result<Vec<u8>>
where
	P: AsRef<Path>,
{
	let mut file = File::open(path)?;
	let mut buf = vec![];
	let _: usize = file.read_to_end(&mut buf)?;

	Ok(buf)
}

/// Reads a file, wrapping any error with the failed step
pub fn read_file<P>(path: P) -> Result<Vec<u8>, WrappedError>
where
	P: AsRef<Path>,
{
	let mut file = File::open(path).wrap("open failed")?;
	let mut buf = vec![];
	let _: usize = file.read_to_end(&mut buf).wrap("read failed")?;

	Ok(buf)
}

/// Reads the `.yaml` config within `dir`
pub fn read_config_in<P>(dir: P) -> Result<Vec<u8>, WrappedError>
where
	P: AsRef<Path>,
{
	self::read_file(dir.as_ref().join(".yaml")).with_message("could not read config")
}

/// Reads the `.yaml` config within the home directory
pub fn read_config() -> Result<Vec<u8>, WrappedError> {
	let home = env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
	self::read_config_in(home)
}
