#![no_main]
use libfuzzer_sys::fuzz_target;
use zenfit::{DecodeRequest, ImageFormat, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_source_pixels: Some(1 << 22),
        ..Limits::default()
    };

    // Sniffed and forced formats must never panic
    if let Ok(request) = DecodeRequest::sniff(data) {
        let _ = request.with_limits(&limits).decode(enough::Unstoppable);
    }
    for format in [ImageFormat::Png, ImageFormat::Jpeg] {
        let _ = DecodeRequest::new(data, format)
            .with_limits(&limits)
            .decode(enough::Unstoppable);
    }
});
