#![no_main]
use libfuzzer_sys::fuzz_target;
use zenfit::*;

fuzz_target!(|input: (u8, u8, &[u8])| {
    let (w, h, data) = input;
    let bbox = BoundingBox::new(u32::from(w) + 1, u32::from(h) + 1);
    let limits = Limits {
        max_source_pixels: Some(1 << 22),
        ..Limits::default()
    };

    let Ok(first) = FitRequest::sniffed(data)
        .bounding_box(bbox)
        .with_limits(&limits)
        .fit_image(enough::Unstoppable)
    else {
        return;
    };

    let (sw, sh) = first.scaled;
    assert!(sw >= 1 && sh >= 1 && sw <= bbox.width && sh <= bbox.height);
    assert!(sw == bbox.width || sh == bbox.height, "neither axis touches the box");

    // Fitting the canvas again must reproduce it
    let png = first.to_png(enough::Unstoppable).expect("canvas encodes");
    let second = FitRequest::with_format(&png, ImageFormat::Png)
        .bounding_box(bbox)
        .fit_image(enough::Unstoppable)
        .expect("canvas refits");
    assert_eq!(first.canvas.buf(), second.canvas.buf(), "refit changed pixels");
});
