//! Build script: fingerprints main.css so the stylesheet URL changes with its
//! content and can be served with an immutable cache policy.

use std::path::Path;
use std::{env, fs};

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    match fingerprint_css(&css_path) {
        Some(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        None => {
            // Tolerate a missing stylesheet so `cargo check` works in a bare
            // checkout; the templates then link main..css, which 404s loudly.
            println!("cargo:warning=static/css/main.css not found, CSS_HASH left empty");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Hashes the stylesheet and drops a copy at
/// `static/css/derived/main.<hash>.css`, returning the short hash.
fn fingerprint_css(css_path: &Path) -> Option<String> {
    let content = fs::read(css_path).ok()?;

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest[..8].to_string();

    let derived_dir = css_path.parent()?.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::copy(css_path, derived_dir.join(format!("main.{short_hash}.css")))
        .expect("Failed to copy CSS into derived directory");

    Some(short_hash)
}
