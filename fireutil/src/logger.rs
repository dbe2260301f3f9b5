/// Intercept messages using the `log` crate and print them to STDERR. The default filter is
/// `info`, but `RUST_LOG` overrides it. `hyper` is chatty at `debug`, so it's capped at `info`
/// unless explicitly requested.
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info,hyper=info")).init();
}

/// Like `setup`, but safe to call many times. Tests use this.
pub fn setup_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
