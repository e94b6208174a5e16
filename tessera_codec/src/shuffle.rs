//! Byte and bit shuffle pre-filters.
//!
//! Both filters view a buffer as a sequence of elements of `element_width` bytes.
//! Trailing bytes that do not form a whole element (or, for the bit shuffle, a whole block of 8 elements) are copied unchanged to the end of the output.

use std::num::NonZeroUsize;

/// Byte shuffle `decoded`: the `i`th bytes of every element are grouped together.
#[must_use]
pub fn byte_shuffle(decoded: &[u8], element_width: NonZeroUsize) -> Vec<u8> {
    let width = element_width.get();
    let elements = decoded.len() / width;
    let shuffled_len = elements * width;
    let mut encoded = vec![0; decoded.len()];
    for (element_index, element) in decoded[..shuffled_len].chunks_exact(width).enumerate() {
        for (byte_index, &byte) in element.iter().enumerate() {
            encoded[byte_index * elements + element_index] = byte;
        }
    }
    encoded[shuffled_len..].copy_from_slice(&decoded[shuffled_len..]);
    encoded
}

/// Reverse [`byte_shuffle`].
#[must_use]
pub fn byte_unshuffle(encoded: &[u8], element_width: NonZeroUsize) -> Vec<u8> {
    let width = element_width.get();
    let elements = encoded.len() / width;
    let shuffled_len = elements * width;
    let mut decoded = vec![0; encoded.len()];
    for (element_index, element) in decoded[..shuffled_len].chunks_exact_mut(width).enumerate() {
        for (byte_index, byte) in element.iter_mut().enumerate() {
            *byte = encoded[byte_index * elements + element_index];
        }
    }
    decoded[shuffled_len..].copy_from_slice(&encoded[shuffled_len..]);
    decoded
}

/// Return the number of elements and bytes covered by the bit shuffle.
fn bit_shuffle_extent(len: usize, width: usize) -> (usize, usize) {
    let elements = len / width;
    let elements = elements - elements % 8;
    (elements, elements * width)
}

/// Bit shuffle `decoded`: bit `k` of every element is grouped together, for each `k` in `0..8 * element_width`.
///
/// Shuffling operates on a multiple of 8 elements, so that every bit plane fills whole bytes.
#[must_use]
pub fn bit_shuffle(decoded: &[u8], element_width: NonZeroUsize) -> Vec<u8> {
    let width = element_width.get();
    let (elements, shuffled_len) = bit_shuffle_extent(decoded.len(), width);
    let mut encoded = vec![0; decoded.len()];
    for (element_index, element) in decoded[..shuffled_len].chunks_exact(width).enumerate() {
        for (byte_index, &byte) in element.iter().enumerate() {
            for bit in 0..8 {
                let position = (byte_index * 8 + bit) * elements + element_index;
                encoded[position / 8] |= ((byte >> bit) & 1) << (position % 8);
            }
        }
    }
    encoded[shuffled_len..].copy_from_slice(&decoded[shuffled_len..]);
    encoded
}

/// Reverse [`bit_shuffle`].
#[must_use]
pub fn bit_unshuffle(encoded: &[u8], element_width: NonZeroUsize) -> Vec<u8> {
    let width = element_width.get();
    let (elements, shuffled_len) = bit_shuffle_extent(encoded.len(), width);
    let mut decoded = vec![0; encoded.len()];
    for (element_index, element) in decoded[..shuffled_len].chunks_exact_mut(width).enumerate() {
        for (byte_index, byte) in element.iter_mut().enumerate() {
            for bit in 0..8 {
                let position = (byte_index * 8 + bit) * elements + element_index;
                *byte |= ((encoded[position / 8] >> (position % 8)) & 1) << bit;
            }
        }
    }
    decoded[shuffled_len..].copy_from_slice(&encoded[shuffled_len..]);
    decoded
}
