use error_context::fs;

fn main() {
	let err = fs::read_config().expect_err("Will return an error, unless `~/.yaml` exists");

	// Short form:
	// ```
	// could not read config: open failed: No such file or directory (os error 2)
	// ```
	println!("{err}");

	// Verbose form:
	// ```
	// could not read config
	// └─open failed
	//   └─No such file or directory (os error 2)
	// stack backtrace:
	//    0: error_context::fs::read_file
	//              at src/fs.rs:33
	//    1: error_context::fs::read_config_in
	// ...
	// ```
	println!("{err:?}");
}
