#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expr) = rangel_syntax::parse(s) {
            // A pretty-printed expression must reparse
            let printed = rangel_syntax::pretty_print_expr(&expr);
            let _ = rangel_syntax::parse(&printed).unwrap();
        }
    }
});
