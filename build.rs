fn main() {
    // Rebuild when the build script changes
    println!("cargo:rerun-if-changed=build.rs");

    // Version, target and build time for --version and the banner
    built::write_built_file()
        .expect("Failed to acquire build-time information");
}
