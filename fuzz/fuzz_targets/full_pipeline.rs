#![no_main]
use libfuzzer_sys::fuzz_target;
use rangel_eval::{range, scan_integers, Available};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (expr, spec) = match s.split_once('\n') {
            Some((expr, spec)) => (expr, spec),
            None => (s, "[0,64]"),
        };

        // Keep synthetic domains small so iteration stays bounded
        let literals: Vec<i64> = scan_integers(spec)
            .into_iter()
            .chain(scan_integers(expr))
            .collect();
        let lo = literals.iter().min().copied().unwrap_or(0);
        let hi = literals.iter().max().copied().unwrap_or(0);
        if hi.saturating_sub(lo) > 10_000 {
            return;
        }

        let _ = range(expr, Available::Spec(spec.to_string()));
    }
});
