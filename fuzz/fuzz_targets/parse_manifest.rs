#![no_main]

use std::path::Path;

use kiln_core::manifest::Manifest;
use kiln_core::plan::validate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(manifest) = Manifest::from_toml_str(text, Path::new("fuzz.toml")) {
        let graph = manifest.graph();
        assert_eq!(graph.len(), manifest.artifact_names().count());
        let _ = validate(&graph);
    }
});
