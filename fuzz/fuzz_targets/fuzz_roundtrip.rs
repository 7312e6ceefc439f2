#![no_main]
use libfuzzer_sys::fuzz_target;
use tilecanvas::*;

fuzz_target!(|data: &[u8]| {
    // Keep allocations bounded for hostile headers
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data).with_limits(&limits).decode() else {
        return;
    };

    // Re-encoding as PNG and decoding again must keep every opaque pixel
    // and the whole opacity mask
    let encoded = encode_png_to_vec(&decoded).expect("decoded canvas must encode");
    let Ok(decoded2) = decode_png(&encoded) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    assert_eq!(decoded.opacity(), decoded2.opacity(), "opacity mismatch");
    for (i, &opaque) in decoded.opacity().iter().enumerate() {
        if opaque {
            assert_eq!(
                decoded.pixels()[i * 3..i * 3 + 3],
                decoded2.pixels()[i * 3..i * 3 + 3],
                "pixel {i} mismatch"
            );
        }
    }

    // Blitting a canvas onto a blank copy of itself reproduces its opaque pixels
    let mut target = blank_canvas(decoded.width(), decoded.height());
    blit(&mut target, 0, 0, &decoded, 0, 0, decoded.width(), decoded.height())
        .expect("full-canvas blit is in range");
    assert_eq!(target.opacity(), decoded.opacity());
});
