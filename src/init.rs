use env_logger::Env;

/// Sets up diagnostic logging on stderr. `RUST_LOG` overrides the default.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
}
