#![no_main]

use libfuzzer_sys::fuzz_target;
use scopeview::vartree::qname::parse_qualified_name;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to a string (if valid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // The parser must reject or accept, never panic
        let _ = parse_qualified_name(s);
    }
});
