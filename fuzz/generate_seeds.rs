#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs
//!
//! The XYZ seed uses a stored (uncompressed) deflate block so no zlib
//! dependency is needed here.

fn adler32(data: &[u8]) -> u32 {
    let (mut a, mut b) = (1u32, 0u32);
    for &byte in data {
        a = (a + u32::from(byte)) % 65521;
        b = (b + a) % 65521;
    }
    (b << 16) | a
}

fn stored_zlib(data: &[u8]) -> Vec<u8> {
    let len = data.len() as u16;
    let mut out = vec![0x78, 0x01, 0x01];
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // XYZ 2x1: palette entry 1 red, indices [1, 0]
    let mut payload = vec![0u8; 256 * 3];
    payload[3] = 0xff;
    payload.extend_from_slice(&[1, 0]);
    let mut xyz = b"XYZ1\x02\x00\x01\x00".to_vec();
    xyz.extend_from_slice(&stored_zlib(&payload));
    fs::write(format!("{dir}/xyz_2x1.xyz"), xyz).unwrap();

    // Minimal 8-bit BMP 1x1 with a 2-entry palette
    let mut bmp = vec![0u8; 66]; // 54 header + 8 palette + 4 pixel row
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&66u32.to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&62u32.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&1i32.to_le_bytes()); // width
    bmp[22..26].copy_from_slice(&1i32.to_le_bytes()); // height
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&8u16.to_le_bytes()); // bpp
    bmp[46..50].copy_from_slice(&2u32.to_le_bytes()); // palette entries
    bmp[58..62].copy_from_slice(&[0x00, 0x00, 0xff, 0x00]); // entry 1: red (BGRX)
    bmp[62] = 1;
    fs::write(format!("{dir}/bmp8_1x1.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/xyz_header_only.bin"), b"XYZ1\x01\x00\x01\x00").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/png_sig_only.bin"), b"\x89PNG\r\n\x1a\n").unwrap();

    println!("Generated seed corpus in {dir}/");
}
