use std::fmt::Display;
use std::process;

/// Write a line to standard error.
#[macro_export]
macro_rules! stderr {
    ($($arg:tt)*) => ({
        use std::io::Write;
        writeln!(&mut ::std::io::stderr(), $($arg)*).expect("Failed writing to stderr")
    })
}

/// Unwrap a result or exit the program with an error message.
pub trait OrExit<T> {
    fn or_exit(self) -> T;
}

impl<T, E> OrExit<T> for Result<T, E>
where
    E: Display,
{
    fn or_exit(self) -> T {
        match self {
            Ok(val) => val,
            Err(err) => {
                stderr!("Error: {}", err);
                process::exit(1)
            }
        }
    }
}
