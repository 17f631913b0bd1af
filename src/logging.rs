use tracing_subscriber::EnvFilter;

fn filter_for(level: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("shared_context={level}").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("Ignoring invalid log level '{level}': {e}");
            filter
        }
    }
}

/// Install a global `fmt` subscriber filtered to `shared_context=<level>`.
///
/// `RUST_LOG` directives are honoured as well. Calling this more than once
/// (e.g. from several tests) is harmless: later calls leave the first
/// subscriber in place.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .try_init();
}

/// Same as [`init`] but emits JSON lines.
pub fn init_json(level: &str) {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_for(level))
        .try_init();
}
