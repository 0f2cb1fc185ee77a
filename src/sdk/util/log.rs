use env_logger::{Builder, Env};

/// Installs the global logger. `RUST_LOG` wins over `verbosity`, which maps
/// 0 to info, 1 to debug and anything higher to trace. HTTP internals stay at
/// warn unless asked for explicitly.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default = format!("{level},reqwest=warn,hyper=warn");
    Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
