use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=data/topology.json");

    if let Ok(raw_hint) = env::var("CARGO_MANIFEST_DIR") {
        let candidate = PathBuf::from(raw_hint);
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!(
            "cargo:rustc-env=CATALOG_ROOT_HINT={}",
            canonical.display()
        );
    }
}
