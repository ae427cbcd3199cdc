#![no_main]

use libfuzzer_sys::fuzz_target;
use repro_sigma::grid::{decode_grid, encode_grid, GridCleaner};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let cleaner = GridCleaner::default();
        // Decoding must never panic; whatever decodes must re-encode
        if let Ok(grid) = decode_grid(input, &cleaner) {
            let _ = encode_grid(&grid, &cleaner, 4);
        }
    }
});
