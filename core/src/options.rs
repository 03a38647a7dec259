//! Configuration options for the codec.

/// Options controlling how strictly encoded input is validated.
///
/// A `bool` outside a composite occupies a whole byte, but only its most
/// significant bit is read: `0x80` and `0xFF` both decode to `true`, `0x7F`
/// to `false`. No option changes this. Packed bools read one bit each in
/// every mode.
///
/// # Example
///
/// ```
/// use arc4_core::{Codec, CodecOptions};
///
/// let codec = Codec::new(CodecOptions {
///     strict_offsets: true,
///     ..CodecOptions::default()
/// });
/// assert!(codec.options().strict_offsets);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Require tail regions to be exactly contiguous: the first offset must
    /// equal the head length and each dynamic member must end where the next
    /// one starts.
    ///
    /// When off, offsets only need to stay inside the enclosing region and be
    /// non-decreasing.
    ///
    /// Default: false
    pub strict_offsets: bool,

    /// Accept input with bytes left over after a complete top-level value.
    ///
    /// Default: false
    pub allow_trailing_bytes: bool,

    /// Number of bytes stripped from the front of log-sourced input before
    /// decoding.
    ///
    /// Default: 4
    pub log_prefix_len: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict_offsets: false,
            allow_trailing_bytes: false,
            log_prefix_len: 4,
        }
    }
}
