pub mod built_info {
    use lazy_static::lazy_static;
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    /// The package version, suffixed with the abbreviated git commit hash and a `-dirty` marker
    /// when that information was available at build time.
    fn software_version() -> String {
        let mut version = PKG_VERSION.to_string();
        if let Some(hash) = GIT_COMMIT_HASH.and_then(|h| h.get(0..8)) {
            version.push('-');
            version.push_str(hash);
        }
        if GIT_DIRTY == Some(true) {
            version.push_str("-dirty");
        }
        version
    }

    lazy_static! {
        pub static ref VERSION: String = software_version();
    }
}
