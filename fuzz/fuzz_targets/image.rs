#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate flashfs_core;

use flashfs_core::ImageSrc;

fuzz_target!(|data: &[u8]| {
    let mut src = data;
    if let Ok(entries) = src.entries() {
        for entry in entries {
            let _result = src.load_entry(&entry);
        }
    }
});
