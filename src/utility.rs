/// Install the `env_logger` backend used by every binary.
///
/// Logs at `info` by default; `RUST_LOG` still takes precedence.
pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_nanos()
        .init();
}

/// Render a program and its arguments the way a shell user would type them.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(AsRef::as_ref))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_command_line() {
    let line = command_line("da3", &["images", "/data/images"]);
    assert_eq!(line, "da3 images /data/images");
    assert_eq!(command_line::<&str>("true", &[]), "true");
}
