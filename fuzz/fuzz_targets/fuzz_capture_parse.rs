#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for capture text parsing
//!
//! Tests:
//! - CaptureParser::parse on arbitrary (lossily decoded) text
//! - NumberFormat::parse on arbitrary tokens, both locales
//! - Every extracted value is a non-negative number

use libfuzzer_sys::fuzz_target;
use rcuperf_capture::{CaptureParser, NumberFormat};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let text = String::from_utf8_lossy(data);

    for format in [NumberFormat::ENGLISH, NumberFormat::EUROPEAN] {
        let parser = CaptureParser::standard(format).expect("standard rules compile");
        let capture = parser.parse(&text);

        // === Contract: only digits and separators are accepted ===
        for &(_, value) in capture.observations() {
            assert!(value >= 0.0);
        }

        if let Some(value) = format.parse(&text) {
            assert!(value >= 0.0);
        }
    }
});
