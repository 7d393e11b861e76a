//! Assertion helper for test bodies

/// Compare two expressions and end the test process on mismatch
///
/// On inequality prints the source text of both expressions and exits with
/// status 1. Only meaningful inside a test body, which runs in its own
/// process.
#[macro_export]
macro_rules! tecco_assert_eq {
    ($expected:expr, $got:expr $(,)?) => {
        if $expected != $got {
            println!("Assertion failed");
            println!("╰ EXPECTED\t{}", stringify!($expected));
            println!("╰ GOT     \t{}", stringify!($got));
            let _ = ::std::io::Write::flush(&mut ::std::io::stdout());
            ::std::process::exit(1);
        }
    };
}
