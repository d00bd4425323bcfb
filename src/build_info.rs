//! Build-time information generated by `built`

#[allow(dead_code, missing_docs)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Crate version
pub fn version() -> &'static str {
    built_info::PKG_VERSION
}

/// Build timestamp (UTC)
pub fn built_time() -> &'static str {
    built_info::BUILT_TIME_UTC
}

/// Target triple the binary was built for
pub fn target() -> &'static str {
    built_info::TARGET
}

/// One-line description used by the banner
pub fn long_version() -> String {
    format!("{} ({}, built {})", version(), target(), built_time())
}
