/// Build-time override (`FLEETWATCH_VERSION`, e.g. a git describe from CI),
/// falling back to the crate version.
const fn version_or_cargo(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

pub const VERSION: &str = version_or_cargo(option_env!("FLEETWATCH_VERSION"));
