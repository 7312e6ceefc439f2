//! Sub-byte sample unpacking.
//!
//! Adapted from the BMP bit expansion in zune-bmp 0.5.2 by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib).

/// Expand 1, 2 or 4-bit packed samples (MSB first) to one byte each.
///
/// With `indexed` the values are kept as raw palette indices; otherwise they
/// are scaled to 0–255. `out.len()` is the number of samples to produce, so
/// row padding bits in `input` are ignored. Depth 8 is a plain copy.
pub(crate) fn expand_bits_to_byte(depth: u8, indexed: bool, input: &[u8], out: &mut [u8]) {
    let scale: u8 = if indexed {
        1
    } else {
        match depth {
            1 => 0xFF,
            2 => 0x55,
            4 => 0x11,
            _ => 1,
        }
    };

    match depth {
        1 | 2 | 4 => {
            let per_byte = usize::from(8 / depth);
            let mask = (1u8 << depth) - 1;
            for (out_vals, &in_val) in out.chunks_mut(per_byte).zip(input) {
                for (pos, out_val) in out_vals.iter_mut().enumerate() {
                    let shift = 8 - depth * (pos as u8 + 1);
                    *out_val = scale.wrapping_mul((in_val >> shift) & mask);
                }
            }
        }
        _ => {
            let n = out.len().min(input.len());
            out[..n].copy_from_slice(&input[..n]);
        }
    }
}
