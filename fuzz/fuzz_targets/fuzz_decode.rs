#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Auto-detect by magic bytes; must never panic
    let _ = tilecanvas::decode_bytes(data);

    // Each decoder explicitly; must never panic
    let _ = tilecanvas::decode_xyz(data);
    let _ = tilecanvas::decode_bmp(data);
    let _ = tilecanvas::decode_png(data);
    let _ = tilecanvas::ImageInfo::from_bytes(data);
});
