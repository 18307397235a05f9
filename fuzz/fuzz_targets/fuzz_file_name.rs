#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for capture file name decoding
//!
//! Tests:
//! - parse_file_name on arbitrary input, both layouts
//! - Every decoded key encodes back to a name that decodes to the same key

use libfuzzer_sys::fuzz_target;
use rcuperf_core::{KeyCodec, KeyLayout};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    for layout in [KeyLayout::Basic, KeyLayout::WithReadKind] {
        let codec = KeyCodec::new(layout);
        // Errors are fine, panics are not
        let Ok(key) = codec.parse_file_name(name) else {
            continue;
        };

        // === Contract: decoded keys survive a round trip ===
        let encoded = codec
            .file_name(&key, 0)
            .expect("decoded key must encode under the same layout");
        let decoded = codec
            .parse_file_name(&encoded)
            .expect("encoded name must decode");
        assert_eq!(decoded, key);
    }
});
