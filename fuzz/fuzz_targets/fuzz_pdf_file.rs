//! Fuzz target for two-column PDF file parsing.
//!
//! Any text either fails to parse or yields a table whose inverse CDF stays
//! inside the support.

#![no_main]

use libfuzzer_sys::fuzz_target;
use riser_core::pdf_file::parse_pdf;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(pdf) = parse_pdf(text) {
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let x = pdf.invert(p);
            assert!(x >= pdf.min() && x <= pdf.max());
        }
    }
});
